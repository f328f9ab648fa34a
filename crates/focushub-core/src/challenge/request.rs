//! Generation requests issued by a challenge session.
//!
//! Every request carries a [`Ticket`] naming the session and the request
//! sequence number. A result is only applied if its ticket still matches
//! the session's outstanding request.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::generation::{ArithmeticProblem, GenerationService, GroundingPrompt, IntentVerdict};
use crate::settings::{Difficulty, PersonalityType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub session: SessionId,
    pub seq: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeRequest {
    ValidateIntent {
        intent: String,
        goal: String,
        tone: PersonalityType,
    },
    ArithmeticProblem {
        difficulty: Difficulty,
    },
    GroundingPrompt,
}

impl ChallengeRequest {
    pub fn describe(&self) -> &'static str {
        match self {
            Self::ValidateIntent { .. } => "validating intent",
            Self::ArithmeticProblem { .. } => "loading arithmetic problem",
            Self::GroundingPrompt => "loading grounding exercise",
        }
    }
}

/// A request waiting to be executed by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: ChallengeRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeResponse {
    Intent(IntentVerdict),
    Arithmetic(ArithmeticProblem),
    Grounding(GroundingPrompt),
}

/// Execute a challenge request against the generation service.
pub async fn dispatch(
    service: &dyn GenerationService,
    request: &ChallengeRequest,
) -> Result<ChallengeResponse, GenerationError> {
    match request {
        ChallengeRequest::ValidateIntent { intent, goal, tone } => service
            .validate_intent(intent, goal, *tone)
            .await
            .map(ChallengeResponse::Intent),
        ChallengeRequest::ArithmeticProblem { difficulty } => service
            .generate_arithmetic_problem(*difficulty)
            .await
            .map(ChallengeResponse::Arithmetic),
        ChallengeRequest::GroundingPrompt => service
            .generate_grounding_prompt()
            .await
            .map(ChallengeResponse::Grounding),
    }
}
