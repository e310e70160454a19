use crate::models::psychometric::Answers;

/// Renders questionnaire answers as a Q/A transcript, in question-id order.
pub fn build_answer_context(answers: &Answers) -> String {
    answers
        .iter()
        .map(|(question, answer)| format!("Q: {question}\nA: {answer}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
