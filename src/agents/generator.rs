//! Generator agent
//!
//! Produces a grade-appropriate explanation and exactly 3 MCQs for a topic.
//! One structured LLM call per invocation; no state retained between calls.
//! Output text is intentionally non-deterministic (non-zero temperature), so
//! callers and tests should rely on the structural contract only.

use std::sync::Arc;

use log::info;

use crate::content::{GenerationResult, MCQ_COUNT};
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::schema::{StructuredOutput, parse_structured};

const GENERATOR_SYSTEM_PROMPT: &str =
    "You are an expert elementary school teacher and curriculum designer. \
     You produce high-quality educational content and respond only with valid JSON.";

/// Generates lesson content via a structured LLM call
pub struct Generator {
    client: Arc<dyn LlmClient>,
}

impl Generator {
    /// Create a generator backed by the given client
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Generate an explanation and exactly 3 MCQs for the grade and topic.
    ///
    /// Grade is passed through unvalidated; the caller is responsible for
    /// bounding it to a sane range.
    pub async fn generate(&self, grade: u8, topic: &str) -> Result<GenerationResult> {
        info!("generating content for grade {} topic '{}'", grade, topic);

        let request = CompletionRequest::new(GENERATOR_SYSTEM_PROMPT)
            .with_user_message(build_generation_prompt(grade, topic))
            .with_response_schema(GenerationResult::response_schema());

        let response = self.client.complete(request).await?;
        let result: GenerationResult = parse_structured(&response.content)?;

        info!(
            "generated {} chars of explanation and {} MCQs",
            result.explanation.len(),
            result.mcq_questions.len()
        );
        Ok(result)
    }
}

/// Build the generation instruction prompt
fn build_generation_prompt(grade: u8, topic: &str) -> String {
    format!(
        r#"Generate educational content for the given student grade and topic.

INPUT
Grade: {grade}
Topic: {topic}

CONTENT RULES
- Language MUST strictly match the student's grade level.
- The explanation must be clear, simple, conceptually correct, and engaging
  with easy examples.
- Do NOT include concepts beyond the syllabus for this grade.
- Generate EXACTLY {count} multiple-choice questions (MCQs).
- Each MCQ must test understanding of the explanation, contain exactly four
  options labeled A, B, C, D, and have ONLY ONE correct answer.
- MCQs must be directly derived from the explanation.
- Avoid difficult vocabulary and ambiguity.

OUTPUT RULES (STRICT)
- Return ONLY valid JSON matching the required schema.
- Do NOT include markdown, comments, or any text outside the JSON.

RETURN FORMAT
{{
  "explanation": "string",
  "mcq_questions": [
    {{
      "question": "string",
      "options": {{ "A": "string", "B": "string", "C": "string", "D": "string" }},
      "answer": "A | B | C | D"
    }}
  ]
}}"#,
        grade = grade,
        topic = topic,
        count = MCQ_COUNT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::OptionKey;
    use crate::error::EdugenError;
    use crate::llm::MockLlmClient;

    const VALID_GENERATION: &str = r#"{
        "explanation": "An angle is made when two rays meet at a point. A right angle looks like the corner of a book and measures 90 degrees. An acute angle is smaller than a right angle, and an obtuse angle is bigger.",
        "mcq_questions": [
            {
                "question": "What does a right angle measure?",
                "options": {"A": "45 degrees", "B": "90 degrees", "C": "120 degrees", "D": "180 degrees"},
                "answer": "B"
            },
            {
                "question": "An angle smaller than a right angle is called?",
                "options": {"A": "Acute", "B": "Obtuse", "C": "Straight", "D": "Reflex"},
                "answer": "A"
            },
            {
                "question": "Which everyday object shows a right angle?",
                "options": {"A": "A ball", "B": "A banana", "C": "The corner of a book", "D": "A coin"},
                "answer": "C"
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_generate_structural_contract() {
        let mock = Arc::new(MockLlmClient::with_text(VALID_GENERATION));
        let generator = Generator::new(mock);

        let result = generator.generate(4, "Types of Angles").await.unwrap();

        assert_eq!(result.mcq_questions.len(), 3);
        for mcq in &result.mcq_questions {
            assert_eq!(mcq.options.len(), 4);
            for key in OptionKey::ALL {
                assert!(mcq.options.contains_key(&key));
            }
            assert!(mcq.options.contains_key(&mcq.answer));
        }
        assert!(result.explanation.contains("angle"));
    }

    #[tokio::test]
    async fn test_generate_sends_schema_and_prompt() {
        let mock = Arc::new(MockLlmClient::with_text(VALID_GENERATION));
        let generator = Generator::new(mock.clone());

        generator.generate(4, "Types of Angles").await.unwrap();

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        assert!(request.response_schema.is_some());
        assert!(request.system.contains("teacher"));

        let prompt = &request.messages[0].content;
        assert!(prompt.contains("Grade: 4"));
        assert!(prompt.contains("Topic: Types of Angles"));
        assert!(prompt.contains("EXACTLY 3 multiple-choice questions"));
    }

    #[tokio::test]
    async fn test_generate_rejects_wrong_mcq_count() {
        let two_mcqs = r#"{
            "explanation": "text",
            "mcq_questions": [
                {"question": "q1", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer": "A"},
                {"question": "q2", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer": "B"}
            ]
        }"#;
        let mock = Arc::new(MockLlmClient::with_text(two_mcqs));
        let generator = Generator::new(mock);

        let result = generator.generate(4, "Fractions").await;
        assert!(matches!(result, Err(EdugenError::SchemaViolation(_))));
    }

    #[tokio::test]
    async fn test_generate_rejects_missing_option_key() {
        let missing_d = r#"{
            "explanation": "text",
            "mcq_questions": [
                {"question": "q1", "options": {"A": "1", "B": "2", "C": "3"}, "answer": "A"},
                {"question": "q2", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer": "B"},
                {"question": "q3", "options": {"A": "1", "B": "2", "C": "3", "D": "4"}, "answer": "C"}
            ]
        }"#;
        let mock = Arc::new(MockLlmClient::with_text(missing_d));
        let generator = Generator::new(mock);

        let result = generator.generate(4, "Fractions").await;
        assert!(matches!(result, Err(EdugenError::SchemaViolation(_))));
    }

    #[tokio::test]
    async fn test_generate_rejects_non_json() {
        let mock = Arc::new(MockLlmClient::with_text("Here is your lesson: ..."));
        let generator = Generator::new(mock);

        let result = generator.generate(4, "Fractions").await;
        assert!(matches!(result, Err(EdugenError::SchemaViolation(_))));
    }

    #[tokio::test]
    async fn test_generate_propagates_transport_error() {
        let mock = Arc::new(MockLlmClient::new());
        mock.push_transport_error("connection reset");
        let generator = Generator::new(mock);

        let result = generator.generate(4, "Fractions").await;
        assert!(matches!(result, Err(EdugenError::Transport(_))));
    }
}
