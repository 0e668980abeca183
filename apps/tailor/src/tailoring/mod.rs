// Resume tailoring: upload handling, job detail resolution, prompt, and the AI step.
// All AI calls go through llm_client.

pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod upload;
