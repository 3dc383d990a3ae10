//! Reviewer agent
//!
//! Evaluates generated content against fixed criteria (age appropriateness,
//! conceptual correctness, clarity) and returns a pass/fail verdict with
//! feedback. Purely evaluative: the content itself is never altered, and only
//! `{status, feedback}` is extracted from the model response.

use std::sync::Arc;

use log::info;

use crate::content::{McqItem, ReviewResult, ReviewStatus};
use crate::error::Result;
use crate::llm::{CompletionRequest, LlmClient};
use crate::schema::{StructuredOutput, parse_structured};

const REVIEWER_SYSTEM_PROMPT: &str =
    "You are an expert school curriculum reviewer and child education specialist. \
     You strictly evaluate AI-generated educational content and respond only with valid JSON.";

/// Reviews generated lesson content via a structured LLM call
pub struct Reviewer {
    client: Arc<dyn LlmClient>,
}

impl Reviewer {
    /// Create a reviewer backed by the given client
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    /// Evaluate the explanation and MCQs for the given grade and topic.
    ///
    /// A passing verdict always carries empty feedback; a failing verdict
    /// without feedback, or an uncoercible response, is a SchemaViolation.
    /// The reviewer never silently defaults to pass.
    pub async fn review(
        &self,
        grade: u8,
        topic: &str,
        explanation: &str,
        mcq_questions: &[McqItem],
    ) -> Result<ReviewResult> {
        info!("reviewing content for grade {} topic '{}'", grade, topic);

        let mcqs_json = serde_json::to_string_pretty(mcq_questions)?;
        let request = CompletionRequest::new(REVIEWER_SYSTEM_PROMPT)
            .with_user_message(build_review_prompt(grade, topic, explanation, &mcqs_json))
            .with_response_schema(ReviewResult::response_schema());

        let response = self.client.complete(request).await?;

        let mut review: ReviewResult = parse_structured(&response.content)?;
        review.normalize();
        review.validate()?;

        info!(
            "review verdict: {} ({} feedback items)",
            review.status,
            review.feedback.len()
        );
        Ok(review)
    }
}

/// Build the evaluation instruction prompt
fn build_review_prompt(grade: u8, topic: &str, explanation: &str, mcqs_json: &str) -> String {
    format!(
        r#"Strictly evaluate the following AI-generated educational content.
You must NOT rewrite, improve, or regenerate the content. You only analyze
it and return a structured judgment.

INPUT
Grade: {grade}
Topic: {topic}
Explanation: {explanation}
MCQs: {mcqs_json}

EVALUATION CRITERIA
1. Age Appropriateness
   - Vocabulary must match the given grade.
   - Sentences must not be too complex.
   - No concepts beyond the grade syllabus.
2. Conceptual Correctness
   - The explanation must be factually correct.
   - Each MCQ's marked answer must truly be correct.
   - Questions must directly relate to the explanation.
3. Clarity
   - The explanation should be easy to understand.
   - MCQs must be unambiguous and clearly worded.

DECISION RULE
- If ANY issue is found anywhere, status = "fail".
- Only if the content is fully correct and appropriate, status = "pass".
- Be strict and objective like an academic reviewer.

OUTPUT FORMAT (STRICT)
Return ONLY valid JSON:
{{
  "status": "pass" | "fail",
  "feedback": ["short clear issue 1", "short clear issue 2"]
}}

- Do NOT include any text outside the JSON.
- If status = "pass", feedback must be an empty list [].
- On "fail", list one concise, specific entry per issue found."#,
        grade = grade,
        topic = topic,
        explanation = explanation,
        mcqs_json = mcqs_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::OptionKey;
    use crate::error::EdugenError;
    use crate::llm::MockLlmClient;
    use std::collections::BTreeMap;

    fn sample_mcqs() -> Vec<McqItem> {
        vec![McqItem {
            question: "What does a right angle measure?".to_string(),
            options: BTreeMap::from([
                (OptionKey::A, "45 degrees".to_string()),
                (OptionKey::B, "90 degrees".to_string()),
                (OptionKey::C, "120 degrees".to_string()),
                (OptionKey::D, "180 degrees".to_string()),
            ]),
            answer: OptionKey::B,
        }]
    }

    #[tokio::test]
    async fn test_review_pass() {
        let mock = Arc::new(MockLlmClient::with_text(r#"{"status": "pass", "feedback": []}"#));
        let reviewer = Reviewer::new(mock);

        let review = reviewer
            .review(4, "Types of Angles", "Angles are everywhere.", &sample_mcqs())
            .await
            .unwrap();

        assert_eq!(review.status, ReviewStatus::Pass);
        assert!(review.feedback.is_empty());
    }

    #[tokio::test]
    async fn test_review_pass_clears_stray_feedback() {
        let mock = Arc::new(MockLlmClient::with_text(
            r#"{"status": "pass", "feedback": ["nice work overall"]}"#,
        ));
        let reviewer = Reviewer::new(mock);

        let review = reviewer
            .review(4, "Types of Angles", "Angles are everywhere.", &sample_mcqs())
            .await
            .unwrap();

        assert_eq!(review.status, ReviewStatus::Pass);
        assert!(review.feedback.is_empty());
    }

    #[tokio::test]
    async fn test_review_fail_with_feedback() {
        let mock = Arc::new(MockLlmClient::with_text(
            r#"{"status": "fail", "feedback": ["vocabulary far beyond grade 1", "concept not in grade 1 syllabus"]}"#,
        ));
        let reviewer = Reviewer::new(mock);

        let review = reviewer
            .review(1, "Quantum Entanglement", "Particles share states.", &sample_mcqs())
            .await
            .unwrap();

        assert_eq!(review.status, ReviewStatus::Fail);
        assert_eq!(review.feedback.len(), 2);
        assert!(review.feedback[0].contains("grade 1"));
    }

    #[tokio::test]
    async fn test_review_fail_without_feedback_is_schema_violation() {
        let mock = Arc::new(MockLlmClient::with_text(r#"{"status": "fail", "feedback": []}"#));
        let reviewer = Reviewer::new(mock);

        let result = reviewer
            .review(4, "Fractions", "Fractions are parts.", &sample_mcqs())
            .await;
        assert!(matches!(result, Err(EdugenError::SchemaViolation(_))));
    }

    #[tokio::test]
    async fn test_review_never_defaults_to_pass_on_garbage() {
        let mock = Arc::new(MockLlmClient::with_text("The content looks fine to me."));
        let reviewer = Reviewer::new(mock);

        let result = reviewer
            .review(4, "Fractions", "Fractions are parts.", &sample_mcqs())
            .await;
        assert!(matches!(result, Err(EdugenError::SchemaViolation(_))));
    }

    #[tokio::test]
    async fn test_review_sends_content_and_schema() {
        let mock = Arc::new(MockLlmClient::with_text(r#"{"status": "pass", "feedback": []}"#));
        let reviewer = Reviewer::new(mock.clone());

        reviewer
            .review(4, "Types of Angles", "Angles are everywhere.", &sample_mcqs())
            .await
            .unwrap();

        let requests = mock.recorded_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];

        assert!(request.response_schema.is_some());
        assert!(request.system.contains("reviewer"));

        let prompt = &request.messages[0].content;
        assert!(prompt.contains("Grade: 4"));
        assert!(prompt.contains("Angles are everywhere."));
        assert!(prompt.contains("right angle measure"));
        assert!(prompt.contains("NOT rewrite"));
    }

    #[tokio::test]
    async fn test_review_propagates_transport_error() {
        let mock = Arc::new(MockLlmClient::new());
        mock.push_transport_error("rate limited");
        let reviewer = Reviewer::new(mock);

        let result = reviewer
            .review(4, "Fractions", "Fractions are parts.", &sample_mcqs())
            .await;
        assert!(matches!(result, Err(EdugenError::Transport(_))));
    }
}
