//! Response schemas and boundary validation.
//!
//! Each payload type declares the schema sent to the backend and the
//! semantic checks applied after deserialization.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::{ActivityAnalysis, ArithmeticProblem, GroundingPrompt, IntentVerdict};
use crate::error::GenerationError;

pub trait SchemaPayload: DeserializeOwned {
    /// Operation name used in errors and logs.
    const OPERATION: &'static str;

    /// JSON schema passed as the backend's `responseSchema`.
    fn response_schema() -> Value;

    /// Semantic checks beyond field presence and type.
    fn check(&self) -> Result<(), String>;

    /// Parse and validate a raw JSON payload.
    fn parse(text: &str) -> Result<Self, GenerationError> {
        let value: Self = serde_json::from_str(text.trim()).map_err(|e| GenerationError::Schema {
            operation: Self::OPERATION,
            message: e.to_string(),
        })?;
        value.check().map_err(|message| GenerationError::Schema {
            operation: Self::OPERATION,
            message,
        })?;
        Ok(value)
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("'{field}' must not be empty"))
    } else {
        Ok(())
    }
}

fn minutes(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("'{field}' must be a non-negative number, got {value}"))
    }
}

impl SchemaPayload for ArithmeticProblem {
    const OPERATION: &'static str = "arithmetic problem";

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "answer": { "type": "STRING" },
                "explanation": { "type": "STRING" }
            },
            "required": ["question", "answer", "explanation"]
        })
    }

    fn check(&self) -> Result<(), String> {
        non_empty("question", &self.question)?;
        non_empty("answer", &self.answer)
    }
}

impl SchemaPayload for GroundingPrompt {
    const OPERATION: &'static str = "grounding prompt";

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "prompt": { "type": "STRING" },
                "guidance": { "type": "STRING" }
            },
            "required": ["prompt", "guidance"]
        })
    }

    fn check(&self) -> Result<(), String> {
        non_empty("prompt", &self.prompt)
    }
}

impl SchemaPayload for IntentVerdict {
    const OPERATION: &'static str = "intent validation";

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "isValid": { "type": "BOOLEAN" },
                "feedback": { "type": "STRING" }
            },
            "required": ["isValid", "feedback"]
        })
    }

    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl SchemaPayload for ActivityAnalysis {
    const OPERATION: &'static str = "activity analysis";

    fn response_schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": { "type": "STRING" },
                "timeWastedMinutes": { "type": "NUMBER" },
                "timeSavedMinutes": { "type": "NUMBER" },
                "recommendations": { "type": "ARRAY", "items": { "type": "STRING" } },
                "productivityScore": { "type": "NUMBER" }
            },
            "required": [
                "summary",
                "timeWastedMinutes",
                "timeSavedMinutes",
                "recommendations",
                "productivityScore"
            ]
        })
    }

    fn check(&self) -> Result<(), String> {
        minutes("timeWastedMinutes", self.time_wasted_minutes)?;
        minutes("timeSavedMinutes", self.time_saved_minutes)?;
        if !(0.0..=100.0).contains(&self.productivity_score) {
            return Err(format!(
                "'productivityScore' must be within 0-100, got {}",
                self.productivity_score
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_problem() {
        let p = ArithmeticProblem::parse(
            r#"{"question":"7 * 8","answer":"56","explanation":"times table"}"#,
        )
        .unwrap();
        assert_eq!(p.answer, "56");
    }

    #[test]
    fn rejects_missing_field() {
        let err = ArithmeticProblem::parse(r#"{"question":"7 * 8","answer":"56"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Schema { operation: "arithmetic problem", .. }));
    }

    #[test]
    fn rejects_wrong_type() {
        assert!(IntentVerdict::parse(r#"{"isValid":"yes","feedback":"sure"}"#).is_err());
        assert!(IntentVerdict::parse(r#"{"isValid":null,"feedback":"sure"}"#).is_err());
    }

    #[test]
    fn rejects_blank_answer() {
        assert!(ArithmeticProblem::parse(r#"{"question":"1+1","answer":" ","explanation":""}"#)
            .is_err());
    }

    #[test]
    fn rejects_out_of_range_score() {
        let text = r#"{"summary":"s","timeWastedMinutes":5,"timeSavedMinutes":10,
            "recommendations":["walk"],"productivityScore":140}"#;
        assert!(ActivityAnalysis::parse(text).is_err());
    }

    #[test]
    fn rejects_negative_minutes() {
        let text = r#"{"summary":"s","timeWastedMinutes":-5,"timeSavedMinutes":10,
            "recommendations":[],"productivityScore":40}"#;
        assert!(ActivityAnalysis::parse(text).is_err());
    }

    #[test]
    fn accepts_valid_analysis() {
        let text = r#"{"summary":"s","timeWastedMinutes":5,"timeSavedMinutes":10.5,
            "recommendations":["walk","log off"],"productivityScore":72}"#;
        let a = ActivityAnalysis::parse(text).unwrap();
        assert_eq!(a.recommendations.len(), 2);
        assert_eq!(a.productivity_score, 72.0);
    }

    #[test]
    fn rejects_non_json() {
        assert!(GroundingPrompt::parse("Take a deep breath.").is_err());
    }
}
