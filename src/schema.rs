//! Structured-output contract
//!
//! Model responses are coerced into typed values in two explicit steps:
//! decode (strip fences, parse JSON) and validate (type-specific shape
//! checks). Any failure in either step is a SchemaViolation; callers never
//! see half-validated values.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{EdugenError, Result};

/// A type that can be extracted from a model response.
///
/// `response_schema` is handed to the backend so it can constrain generation;
/// `validate` re-checks the invariants locally, independent of what the
/// backend enforced.
pub trait StructuredOutput: DeserializeOwned {
    /// JSON schema describing this type, in the shape the backend expects
    fn response_schema() -> Value;

    /// Check invariants that the JSON type system cannot express
    fn validate(&self) -> Result<()>;
}

/// Decode and validate a raw model response into `T`.
///
/// Tolerates a markdown code fence around the JSON, since models sometimes
/// emit one even in JSON mode.
pub fn parse_structured<T: StructuredOutput>(raw: &str) -> Result<T> {
    let json_text = strip_code_fence(raw);

    let value: T = serde_json::from_str(json_text).map_err(|e| {
        EdugenError::SchemaViolation(format!(
            "response is not valid JSON for the expected shape: {}",
            e
        ))
    })?;

    value.validate()?;
    Ok(value)
}

/// Strip a surrounding ``` or ```json fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the language tag on the opening fence line
    let rest = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };

    rest.strip_suffix("```").unwrap_or(rest).trim()
}
