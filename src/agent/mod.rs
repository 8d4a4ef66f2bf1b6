//! Language-model client and the analysis workflow built on it.

pub mod llm;
pub mod workflow;

pub use llm::{ChatClient, LanguageModel};
pub use workflow::run_workflow;
