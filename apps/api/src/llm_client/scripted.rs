//! Canned completion provider for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{Completion, CompletionProvider, CompletionRequest, LlmError};

pub const SCRIPTED_MODEL: &str = "scripted-model";

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    NoContent,
    Fail(String),
}

/// Pops one reply per call; the last reply repeats once the script runs out.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Reply>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(vec![Reply::Text(body.into())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<Completion, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.to_string());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            if replies.len() > 1 {
                replies.pop_front()
            } else {
                replies.front().cloned()
            }
        };

        match reply.unwrap_or(Reply::NoContent) {
            Reply::Text(text) => Ok(Completion {
                text: Some(text),
                model: SCRIPTED_MODEL.to_string(),
            }),
            Reply::NoContent => Ok(Completion {
                text: None,
                model: SCRIPTED_MODEL.to_string(),
            }),
            Reply::Fail(message) => Err(LlmError::Api {
                status: 500,
                message,
            }),
        }
    }
}
