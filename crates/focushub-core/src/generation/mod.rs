//! Generation service contract.
//!
//! Four stateless request/response operations backed by an external
//! text/JSON generation model. Every response is validated against its
//! schema at the boundary; partial or malformed payloads are errors.

pub mod credentials;
mod gemini;
mod prompts;
mod schema;

pub use gemini::GeminiClient;
pub use schema::SchemaPayload;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::ledger::ActivityRow;
use crate::settings::{Difficulty, PersonalityType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArithmeticProblem {
    pub question: String,
    pub answer: String,
    pub explanation: String,
}

impl ArithmeticProblem {
    /// Whether `candidate` matches the expected answer.
    ///
    /// Surrounding whitespace is ignored. Otherwise the strings must match
    /// exactly, or both must parse as the same number (`"12"` == `"12.0"`).
    pub fn accepts(&self, candidate: &str) -> bool {
        let candidate = candidate.trim();
        let expected = self.answer.trim();
        if candidate == expected {
            return true;
        }
        match (candidate.parse::<f64>(), expected.parse::<f64>()) {
            (Ok(a), Ok(b)) => a.is_finite() && a == b,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingPrompt {
    pub prompt: String,
    pub guidance: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentVerdict {
    pub is_valid: bool,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityAnalysis {
    pub summary: String,
    pub time_wasted_minutes: f64,
    pub time_saved_minutes: f64,
    pub recommendations: Vec<String>,
    /// 0-100.
    pub productivity_score: f64,
}

/// The external generation backend.
///
/// Implementations must surface every failure as an error; they never
/// substitute locally fabricated content.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_arithmetic_problem(
        &self,
        difficulty: Difficulty,
    ) -> Result<ArithmeticProblem, GenerationError>;

    async fn generate_grounding_prompt(&self) -> Result<GroundingPrompt, GenerationError>;

    async fn validate_intent(
        &self,
        intent: &str,
        goal: &str,
        tone: PersonalityType,
    ) -> Result<IntentVerdict, GenerationError>;

    async fn analyze_activity_log(
        &self,
        rows: &[ActivityRow],
        goal: &str,
        tone: PersonalityType,
    ) -> Result<ActivityAnalysis, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(answer: &str) -> ArithmeticProblem {
        ArithmeticProblem {
            question: "?".into(),
            answer: answer.into(),
            explanation: String::new(),
        }
    }

    #[test]
    fn accepts_exact_and_numeric_matches() {
        assert!(problem("42").accepts("42"));
        assert!(problem("42").accepts(" 42 "));
        assert!(problem("42").accepts("42.0"));
        assert!(problem("x = 7").accepts("x = 7"));
    }

    #[test]
    fn rejects_everything_else() {
        assert!(!problem("42").accepts("41"));
        assert!(!problem("42").accepts(""));
        assert!(!problem("x = 7").accepts("7"));
        assert!(!problem("1/2").accepts("0.5"));
    }
}
