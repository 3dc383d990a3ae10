//! Domain data model: MCQs, generated lessons, and review verdicts
//!
//! These are the structured-output contracts for both agents. Every type
//! validates its own shape invariants; the generator and reviewer never hand
//! out an unvalidated value.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{EdugenError, Result};
use crate::schema::StructuredOutput;

/// Label of one MCQ option
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKey {
    A,
    B,
    C,
    D,
}

impl OptionKey {
    /// All four labels in display order
    pub const ALL: [OptionKey; 4] = [OptionKey::A, OptionKey::B, OptionKey::C, OptionKey::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKey::A => "A",
            OptionKey::B => "B",
            OptionKey::C => "C",
            OptionKey::D => "D",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One multiple-choice question: four labeled options, one correct answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqItem {
    pub question: String,
    pub options: BTreeMap<OptionKey, String>,
    pub answer: OptionKey,
}

impl McqItem {
    /// Check the option-set invariants: all four labels present, answer
    /// among them.
    pub fn validate(&self) -> Result<()> {
        for key in OptionKey::ALL {
            if !self.options.contains_key(&key) {
                return Err(EdugenError::SchemaViolation(format!(
                    "MCQ '{}' is missing option {}",
                    self.question, key
                )));
            }
        }

        if !self.options.contains_key(&self.answer) {
            return Err(EdugenError::SchemaViolation(format!(
                "MCQ '{}' marks answer {} which is not among its options",
                self.question, self.answer
            )));
        }

        Ok(())
    }
}

/// Number of MCQs a lesson always contains
pub const MCQ_COUNT: usize = 3;

/// Output of the generator: explanation plus exactly 3 MCQs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub explanation: String,
    pub mcq_questions: Vec<McqItem>,
}

impl StructuredOutput for GenerationResult {
    fn response_schema() -> Value {
        let option_schema = json!({
            "type": "object",
            "properties": {
                "A": { "type": "string" },
                "B": { "type": "string" },
                "C": { "type": "string" },
                "D": { "type": "string" }
            },
            "required": ["A", "B", "C", "D"]
        });

        json!({
            "type": "object",
            "properties": {
                "explanation": { "type": "string" },
                "mcq_questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": { "type": "string" },
                            "options": option_schema,
                            "answer": { "type": "string", "enum": ["A", "B", "C", "D"] }
                        },
                        "required": ["question", "options", "answer"]
                    }
                }
            },
            "required": ["explanation", "mcq_questions"]
        })
    }

    fn validate(&self) -> Result<()> {
        if self.explanation.trim().is_empty() {
            return Err(EdugenError::SchemaViolation(
                "explanation is empty".to_string(),
            ));
        }

        if self.mcq_questions.len() != MCQ_COUNT {
            return Err(EdugenError::SchemaViolation(format!(
                "expected exactly {} MCQs, got {}",
                MCQ_COUNT,
                self.mcq_questions.len()
            )));
        }

        for mcq in &self.mcq_questions {
            mcq.validate()?;
        }

        Ok(())
    }
}

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pass,
    Fail,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Pass => f.write_str("pass"),
            ReviewStatus::Fail => f.write_str("fail"),
        }
    }
}

/// Output of the reviewer: verdict plus issue list
///
/// Invariant: pass carries no feedback; fail carries at least one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub status: ReviewStatus,
    pub feedback: Vec<String>,
}

impl ReviewResult {
    /// Drop any feedback the model emitted alongside a passing verdict.
    /// The pass/fail decision itself is never changed here.
    pub fn normalize(&mut self) {
        if self.status == ReviewStatus::Pass {
            self.feedback.clear();
        }
    }
}

impl StructuredOutput for ReviewResult {
    fn response_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "status": { "type": "string", "enum": ["pass", "fail"] },
                "feedback": {
                    "type": "array",
                    "items": { "type": "string" }
                }
            },
            "required": ["status", "feedback"]
        })
    }

    fn validate(&self) -> Result<()> {
        if self.status == ReviewStatus::Fail && self.feedback.is_empty() {
            return Err(EdugenError::SchemaViolation(
                "fail verdict carried no feedback".to_string(),
            ));
        }
        Ok(())
    }
}
