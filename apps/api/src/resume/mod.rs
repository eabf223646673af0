// Resume pipeline: form → prompt → model → JSON extraction → repair → render.
// All model calls go through llm_client::ResumeModel.

pub mod extract;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod repair;
pub mod pages;
