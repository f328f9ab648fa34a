//! User-editable challenge settings: rigidity and personality.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Strictness of the challenge. Ordered `Soft < Standard < Locked`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum RigidityLevel {
    Soft,
    #[default]
    Standard,
    Locked,
}

impl RigidityLevel {
    pub const ALL: [RigidityLevel; 3] = [Self::Soft, Self::Standard, Self::Locked];

    /// Difficulty of generated arithmetic problems at this level.
    pub fn difficulty(self) -> Difficulty {
        match self {
            Self::Soft => Difficulty::Easy,
            Self::Standard => Difficulty::Medium,
            Self::Locked => Difficulty::Hard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soft => "Soft",
            Self::Standard => "Standard",
            Self::Locked => "Locked",
        }
    }
}

impl fmt::Display for RigidityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RigidityLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "rigidity".into(),
                message: format!("expected one of Soft, Standard, Locked; got '{s}'"),
            })
    }
}

/// Tone of generated feedback. Never affects control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PersonalityType {
    #[default]
    Supportive,
    Savage,
}

impl PersonalityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supportive => "Supportive",
            Self::Savage => "Savage",
        }
    }
}

impl fmt::Display for PersonalityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PersonalityType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supportive" => Ok(Self::Supportive),
            "savage" => Ok(Self::Savage),
            _ => Err(ValidationError::InvalidValue {
                field: "personality".into(),
                message: format!("expected Supportive or Savage; got '{s}'"),
            }),
        }
    }
}

/// Arithmetic problem difficulty sent to the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rigidity_is_totally_ordered() {
        assert!(RigidityLevel::Soft < RigidityLevel::Standard);
        assert!(RigidityLevel::Standard < RigidityLevel::Locked);
    }

    #[test]
    fn difficulty_follows_rigidity() {
        assert_eq!(RigidityLevel::Soft.difficulty(), Difficulty::Easy);
        assert_eq!(RigidityLevel::Standard.difficulty(), Difficulty::Medium);
        assert_eq!(RigidityLevel::Locked.difficulty(), Difficulty::Hard);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("locked".parse::<RigidityLevel>().unwrap(), RigidityLevel::Locked);
        assert_eq!(" SAVAGE ".parse::<PersonalityType>().unwrap(), PersonalityType::Savage);
        assert!("strict".parse::<RigidityLevel>().is_err());
    }

    #[test]
    fn serializes_with_original_names() {
        assert_eq!(serde_json::to_string(&RigidityLevel::Soft).unwrap(), "\"Soft\"");
        assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
    }
}
