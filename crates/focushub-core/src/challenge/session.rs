//! Challenge session state machine.
//!
//! A session is created when a blocked entry is intercepted and walks the
//! phase sequence for the rigidity captured at creation. It performs no I/O:
//! phases that need generated content hand back a [`PendingRequest`], and
//! the caller feeds the outcome to [`ChallengeSession::resolve`].
//!
//! ## Transitions
//!
//! ```text
//! Soft:     Arithmetic -> Completed
//! Standard: Arithmetic -> Physical -> Completed
//! Locked:   Intent -> Arithmetic -> Physical -> Grounding -> Completed
//! ```
//!
//! Phases are never revisited. Cancellation is handled by the owner
//! dropping the session.

use serde::{Deserialize, Serialize};

use super::phase::{self, ChallengePhase, PhysicalTask};
use super::request::{
    ChallengeRequest, ChallengeResponse, PendingRequest, SessionId, Ticket,
};
use crate::blocklist::BlockEntry;
use crate::error::{ChallengeError, GenerationError};
use crate::generation::{ArithmeticProblem, GroundingPrompt};
use crate::settings::{PersonalityType, RigidityLevel};

pub const INCORRECT_ANSWER: &str = "Incorrect. Focus.";
pub const EMPTY_INTENT: &str = "Explain how opening this serves your goal first.";

/// Per-phase payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseData {
    Intent {
        /// Last submitted justification, kept for retry.
        submitted: Option<String>,
        feedback: Option<String>,
    },
    Arithmetic {
        /// Fixed for the lifetime of the phase once loaded.
        problem: Option<ArithmeticProblem>,
        failed_attempts: u32,
    },
    Physical {
        task: PhysicalTask,
    },
    Grounding {
        prompt: Option<GroundingPrompt>,
    },
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    /// Rejected input. Cleared by the next user action.
    Validation,
    /// Failed generation call. Stays until a retry is issued.
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// How a resolved request affected the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The ticket no longer matches the outstanding request; nothing changed.
    Stale,
    /// Phase content (problem or grounding prompt) is ready.
    ContentReady,
    /// The intent was judged insufficient; the session stays on Intent.
    IntentRejected,
    /// The intent was accepted and the session moved on.
    Advanced { followup: Option<PendingRequest> },
    /// The generation call failed; retry or cancel.
    Failed,
}

/// One in-flight intervention.
#[derive(Debug, Clone)]
pub struct ChallengeSession {
    id: SessionId,
    target: BlockEntry,
    goal: String,
    rigidity: RigidityLevel,
    tone: PersonalityType,
    phase: ChallengePhase,
    data: PhaseData,
    pending: Option<PendingRequest>,
    /// Request to repeat on retry after a service failure.
    failed: Option<ChallengeRequest>,
    notice: Option<Notice>,
    next_seq: u64,
}

impl ChallengeSession {
    /// Start a session. Goal, rigidity and tone are captured here and never
    /// re-read. Returns the first phase's fetch, if it has one.
    pub fn start(
        target: BlockEntry,
        goal: impl Into<String>,
        rigidity: RigidityLevel,
        tone: PersonalityType,
    ) -> (Self, Option<PendingRequest>) {
        let first = phase::first_phase(rigidity);
        let mut session = Self {
            id: SessionId::new(),
            target,
            goal: goal.into(),
            rigidity,
            tone,
            phase: first,
            data: PhaseData::Completed,
            pending: None,
            failed: None,
            notice: None,
            next_seq: 0,
        };
        tracing::info!(
            session = %session.id,
            app = %session.target.display_name,
            %rigidity,
            "challenge started"
        );
        let request = session.enter(first);
        (session, request)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn target(&self) -> &BlockEntry {
        &self.target
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    pub fn rigidity(&self) -> RigidityLevel {
        self.rigidity
    }

    pub fn tone(&self) -> PersonalityType {
        self.tone
    }

    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    pub fn data(&self) -> &PhaseData {
        &self.data
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The request currently awaiting a result.
    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_completed(&self) -> bool {
        self.phase.is_terminal()
    }

    /// A failed request can be retried.
    pub fn can_retry(&self) -> bool {
        self.failed.is_some() && self.pending.is_none()
    }

    pub fn progress_pct(&self) -> u8 {
        phase::progress_pct(self.rigidity, self.phase)
    }

    pub fn problem(&self) -> Option<&ArithmeticProblem> {
        match &self.data {
            PhaseData::Arithmetic { problem, .. } => problem.as_ref(),
            _ => None,
        }
    }

    pub fn grounding(&self) -> Option<&GroundingPrompt> {
        match &self.data {
            PhaseData::Grounding { prompt } => prompt.as_ref(),
            _ => None,
        }
    }

    pub fn intent_feedback(&self) -> Option<&str> {
        match &self.data {
            PhaseData::Intent { feedback, .. } => feedback.as_deref(),
            _ => None,
        }
    }

    pub fn physical_task(&self) -> Option<&PhysicalTask> {
        match &self.data {
            PhaseData::Physical { task } => Some(task),
            _ => None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Submit the justification for the Intent phase.
    ///
    /// Blank input is rejected without a request.
    pub fn submit_intent(&mut self, text: &str) -> Result<PendingRequest, ChallengeError> {
        self.expect_phase(ChallengePhase::Intent, "submit intent")?;
        self.ensure_idle()?;
        self.clear_validation_notice();

        let text = text.trim();
        if text.is_empty() {
            return Err(self.reject(EMPTY_INTENT));
        }
        if let PhaseData::Intent { submitted, .. } = &mut self.data {
            *submitted = Some(text.to_string());
        }
        Ok(self.issue(ChallengeRequest::ValidateIntent {
            intent: text.to_string(),
            goal: self.goal.clone(),
            tone: self.tone,
        }))
    }

    /// Submit an answer to the arithmetic problem.
    ///
    /// A wrong answer keeps the same problem; no new one is fetched.
    pub fn submit_answer(&mut self, answer: &str) -> Result<ChallengePhase, ChallengeError> {
        self.expect_phase(ChallengePhase::Arithmetic, "submit answer")?;
        self.ensure_idle()?;
        self.clear_validation_notice();

        let correct = match &mut self.data {
            PhaseData::Arithmetic {
                problem: Some(problem),
                failed_attempts,
            } => {
                let ok = problem.accepts(answer);
                if !ok {
                    *failed_attempts += 1;
                }
                ok
            }
            _ => return Err(ChallengeError::ContentMissing),
        };

        if !correct {
            tracing::debug!(session = %self.id, "incorrect answer");
            return Err(self.reject(INCORRECT_ANSWER));
        }
        // Arithmetic is never followed by a phase that fetches on entry.
        let request = self.advance();
        debug_assert!(request.is_none());
        Ok(self.phase)
    }

    /// Confirm the Physical or Grounding phase. Returns the next phase's
    /// fetch, if any.
    pub fn confirm(&mut self) -> Result<Option<PendingRequest>, ChallengeError> {
        match self.phase {
            ChallengePhase::Physical => {}
            ChallengePhase::Grounding => {
                self.ensure_idle()?;
                if self.grounding().is_none() {
                    return Err(ChallengeError::ContentMissing);
                }
            }
            other => {
                return Err(ChallengeError::WrongPhase {
                    action: "confirm",
                    phase: other.as_str(),
                })
            }
        }
        self.clear_validation_notice();
        Ok(self.advance())
    }

    /// Repeat the request that last failed.
    pub fn retry(&mut self) -> Result<PendingRequest, ChallengeError> {
        self.ensure_idle()?;
        let request = self.failed.take().ok_or(ChallengeError::NothingToRetry)?;
        self.notice = None;
        tracing::debug!(session = %self.id, phase = %self.phase, "retrying request");
        Ok(self.issue(request))
    }

    /// Hide a validation notice. Service notices stay until retried.
    pub fn dismiss_notice(&mut self) {
        self.clear_validation_notice();
    }

    /// Apply the outcome of a previously issued request.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<ChallengeResponse, GenerationError>,
    ) -> Resolution {
        let matches = self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket == ticket);
        if !matches {
            tracing::warn!(session = %self.id, ?ticket, "discarding stale generation result");
            return Resolution::Stale;
        }
        let Some(pending) = self.pending.take() else {
            return Resolution::Stale;
        };

        let response = match outcome {
            Ok(response) => response,
            Err(e) => return self.fail(pending.request, e.to_string()),
        };

        match response {
            ChallengeResponse::Intent(verdict) if self.phase == ChallengePhase::Intent => {
                let accepted = verdict.is_valid;
                if let PhaseData::Intent { feedback, .. } = &mut self.data {
                    *feedback = Some(verdict.feedback);
                }
                if accepted {
                    let followup = self.advance();
                    Resolution::Advanced { followup }
                } else {
                    tracing::debug!(session = %self.id, "intent rejected");
                    Resolution::IntentRejected
                }
            }
            ChallengeResponse::Arithmetic(loaded) if self.phase == ChallengePhase::Arithmetic => {
                if let PhaseData::Arithmetic { problem, .. } = &mut self.data {
                    *problem = Some(loaded);
                }
                Resolution::ContentReady
            }
            ChallengeResponse::Grounding(loaded) if self.phase == ChallengePhase::Grounding => {
                if let PhaseData::Grounding { prompt } = &mut self.data {
                    *prompt = Some(loaded);
                }
                Resolution::ContentReady
            }
            _ => self.fail(
                pending.request,
                "response does not match the current phase".into(),
            ),
        }
    }

    /// Consume a completed session.
    pub fn finish(self) -> Result<CompletedChallenge, (Self, ChallengeError)> {
        if !self.is_completed() {
            return Err((self, ChallengeError::NotCompleted));
        }
        tracing::info!(session = %self.id, app = %self.target.display_name, "challenge completed");
        Ok(CompletedChallenge {
            session: self.id,
            target: self.target,
            rigidity: self.rigidity,
        })
    }

    // ── Internals ────────────────────────────────────────────────────

    fn expect_phase(
        &self,
        expected: ChallengePhase,
        action: &'static str,
    ) -> Result<(), ChallengeError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(ChallengeError::WrongPhase {
                action,
                phase: self.phase.as_str(),
            })
        }
    }

    fn ensure_idle(&self) -> Result<(), ChallengeError> {
        if self.pending.is_some() {
            Err(ChallengeError::Busy)
        } else {
            Ok(())
        }
    }

    fn clear_validation_notice(&mut self) {
        if matches!(&self.notice, Some(n) if n.kind == NoticeKind::Validation) {
            self.notice = None;
        }
    }

    fn reject(&mut self, message: &str) -> ChallengeError {
        self.notice = Some(Notice {
            kind: NoticeKind::Validation,
            message: message.to_string(),
        });
        ChallengeError::Validation(message.to_string())
    }

    fn fail(&mut self, request: ChallengeRequest, message: String) -> Resolution {
        tracing::warn!(
            session = %self.id,
            phase = %self.phase,
            error = %message,
            "generation request failed"
        );
        self.notice = Some(Notice {
            kind: NoticeKind::Service,
            message,
        });
        self.failed = Some(request);
        Resolution::Failed
    }

    fn issue(&mut self, request: ChallengeRequest) -> PendingRequest {
        self.next_seq += 1;
        let pending = PendingRequest {
            ticket: Ticket {
                session: self.id,
                seq: self.next_seq,
            },
            request,
        };
        tracing::debug!(
            session = %self.id,
            seq = self.next_seq,
            what = pending.request.describe(),
            "issuing generation request"
        );
        self.failed = None;
        self.notice = None;
        self.pending = Some(pending.clone());
        pending
    }

    fn advance(&mut self) -> Option<PendingRequest> {
        let next = phase::next_phase(self.rigidity, self.phase)?;
        tracing::debug!(session = %self.id, from = %self.phase, to = %next, "phase advanced");
        self.phase = next;
        self.notice = None;
        self.failed = None;
        self.enter(next)
    }

    fn enter(&mut self, phase: ChallengePhase) -> Option<PendingRequest> {
        match phase {
            ChallengePhase::Intent => {
                self.data = PhaseData::Intent {
                    submitted: None,
                    feedback: None,
                };
                None
            }
            ChallengePhase::Arithmetic => {
                self.data = PhaseData::Arithmetic {
                    problem: None,
                    failed_attempts: 0,
                };
                Some(self.issue(ChallengeRequest::ArithmeticProblem {
                    difficulty: self.rigidity.difficulty(),
                }))
            }
            ChallengePhase::Physical => {
                self.data = PhaseData::Physical {
                    task: PhysicalTask::for_rigidity(self.rigidity),
                };
                None
            }
            ChallengePhase::Grounding => {
                self.data = PhaseData::Grounding { prompt: None };
                Some(self.issue(ChallengeRequest::GroundingPrompt))
            }
            ChallengePhase::Completed => {
                self.data = PhaseData::Completed;
                None
            }
        }
    }
}

/// Proof that a session reached `Completed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedChallenge {
    pub session: SessionId,
    pub target: BlockEntry,
    pub rigidity: RigidityLevel,
}
