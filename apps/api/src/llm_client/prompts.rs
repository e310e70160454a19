// Shared sampling settings.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// Sampling temperature used for every guidance call.
pub const GUIDANCE_TEMPERATURE: f32 = 0.2;
