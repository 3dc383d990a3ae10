//! Pipeline controller
//!
//! Wires the generator and reviewer into a fixed linear sequence:
//! Start -> Generating -> Reviewing -> Done, with Failed as the terminal
//! state for any component error. The controller only sequences calls and
//! merges each stage's output into the state record; it performs no business
//! validation of the content itself.

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};

use crate::agents::{Generator, Reviewer};
use crate::content::{GenerationResult, McqItem, ReviewResult, ReviewStatus};
use crate::error::{EdugenError, Result};
use crate::llm::LlmClient;

/// One lesson request: the immutable caller input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    pub grade: u8,
    pub topic: String,
}

impl Request {
    pub fn new(grade: u8, topic: impl Into<String>) -> Self {
        Self {
            grade,
            topic: topic.into(),
        }
    }

    /// Fail fast on input that would waste a backend call. Grade bounds are
    /// the caller's responsibility (the CLI enforces 1-12).
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(EdugenError::InvalidInput(
                "topic must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Start,
    Generating,
    Reviewing,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

/// The single mutable record threaded through one pipeline run.
///
/// Request fields are always present; stage outputs are None until the
/// owning stage writes them. Each run gets its own instance; nothing is
/// shared across concurrent runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    pub grade: u8,
    pub topic: String,
    pub stage: Stage,
    pub explanation: Option<String>,
    pub mcq_questions: Option<Vec<McqItem>>,
    pub status: Option<ReviewStatus>,
    pub feedback: Option<Vec<String>>,
}

impl PipelineState {
    /// Entry state: request fields only
    pub fn new(request: &Request) -> Self {
        Self {
            grade: request.grade,
            topic: request.topic.clone(),
            stage: Stage::Start,
            explanation: None,
            mcq_questions: None,
            status: None,
            feedback: None,
        }
    }

    /// Merge the generator's output into the state
    fn apply_generation(&mut self, generated: GenerationResult) {
        self.explanation = Some(generated.explanation);
        self.mcq_questions = Some(generated.mcq_questions);
    }

    /// Merge the reviewer's output into the state
    fn apply_review(&mut self, review: ReviewResult) {
        self.status = Some(review.status);
        self.feedback = Some(review.feedback);
    }

    /// Convert a completed run into the external output mapping.
    ///
    /// Only a Done state converts; anything else means a stage never ran or
    /// failed, and no partial content may be surfaced as complete.
    pub fn into_output(self) -> Result<LessonOutput> {
        if self.stage != Stage::Done {
            return Err(EdugenError::InvalidInput(format!(
                "pipeline did not complete (stage: {:?})",
                self.stage
            )));
        }

        match (self.explanation, self.mcq_questions, self.status, self.feedback) {
            (Some(explanation), Some(mcq_questions), Some(status), Some(feedback)) => {
                Ok(LessonOutput {
                    explanation,
                    mcq_questions,
                    status,
                    feedback,
                })
            }
            _ => Err(EdugenError::InvalidInput(
                "pipeline state is missing stage outputs".to_string(),
            )),
        }
    }
}

/// The external result mapping returned to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonOutput {
    pub explanation: String,
    pub mcq_questions: Vec<McqItem>,
    pub status: ReviewStatus,
    pub feedback: Vec<String>,
}

/// Sequences the generate and review stages for one request at a time
pub struct Pipeline {
    generator: Generator,
    reviewer: Reviewer,
}

impl Pipeline {
    /// Build a pipeline from already-constructed agents
    pub fn new(generator: Generator, reviewer: Reviewer) -> Self {
        Self { generator, reviewer }
    }

    /// Build a pipeline where both agents share one client
    pub fn with_client(client: Arc<dyn LlmClient>) -> Self {
        Self {
            generator: Generator::new(client.clone()),
            reviewer: Reviewer::new(client),
        }
    }

    /// Run the full generate-then-review sequence for one request.
    ///
    /// The review stage is causally dependent on the generation stage, so the
    /// two calls are strictly sequential. Any stage failure aborts the run
    /// and propagates; no partially-filled state is returned.
    pub async fn run(&self, request: Request) -> Result<PipelineState> {
        request.validate()?;

        let mut state = PipelineState::new(&request);
        info!(
            "pipeline start: grade {} topic '{}'",
            state.grade, state.topic
        );

        state.stage = Stage::Generating;
        let generated = match self.generator.generate(state.grade, &state.topic).await {
            Ok(generated) => generated,
            Err(e) => {
                state.stage = Stage::Failed;
                return Err(e);
            }
        };
        state.apply_generation(generated);

        state.stage = Stage::Reviewing;
        let explanation = state.explanation.as_deref().unwrap_or_default();
        let mcqs = state.mcq_questions.as_deref().unwrap_or_default();
        let review = match self
            .reviewer
            .review(state.grade, &state.topic, explanation, mcqs)
            .await
        {
            Ok(review) => review,
            Err(e) => {
                state.stage = Stage::Failed;
                return Err(e);
            }
        };
        state.apply_review(review);

        state.stage = Stage::Done;
        info!(
            "pipeline done: verdict {}",
            state.status.map(|s| s.to_string()).unwrap_or_default()
        );
        Ok(state)
    }
}
