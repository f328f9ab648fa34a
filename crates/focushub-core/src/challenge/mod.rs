//! Challenge engine: the friction sequence between a click on a blocked
//! entry and access to it.

pub mod phase;
mod request;
mod session;

pub use phase::{ChallengePhase, PhysicalTask};
pub use request::{
    dispatch, ChallengeRequest, ChallengeResponse, PendingRequest, SessionId, Ticket,
};
pub use session::{
    ChallengeSession, CompletedChallenge, Notice, NoticeKind, PhaseData, Resolution,
    EMPTY_INTENT, INCORRECT_ANSWER,
};
