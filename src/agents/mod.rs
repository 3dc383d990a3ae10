//! Generation and review agents
//!
//! Each agent makes exactly one structured LLM call per invocation and owns
//! the prompt and output contract for its stage.

pub mod generator;
pub mod reviewer;

pub use generator::Generator;
pub use reviewer::Reviewer;
