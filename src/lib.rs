//! edugen - grade-appropriate lesson generation with automated review
//!
//! A two-stage pipeline: a generator agent drafts an explanation plus
//! exactly 3 MCQs for a `{grade, topic}` request, then a reviewer agent
//! evaluates the draft for age-appropriateness, correctness, and clarity,
//! producing a pass/fail verdict with feedback.

pub mod agents;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod schema;

pub use error::{EdugenError, Result};
pub use pipeline::{LessonOutput, Pipeline, PipelineState, Request, Stage};
