// Resume Generation: prompt building, fallback template, orchestration.
// All LLM calls go through llm_client; all rendering goes through render.

pub mod fallback;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;
