//! # FocusHub Core Library
//!
//! Core logic for FocusHub, an app blocker that puts a challenge between a
//! click on a distracting app and access to it. Every operation is available
//! through the `focushub` CLI, which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Challenge Engine**: A pure state machine over the phase sequence
//!   selected by the rigidity level. It never performs I/O itself; phases that
//!   need generated content hand back a request for the caller to execute
//! - **Generation**: Async client contract for the external model, with a
//!   Gemini REST implementation and schema validation of every response
//! - **Storage**: SQLite key-value store for user state and TOML-based
//!   configuration
//! - **Shell**: Routes clicks, owns the active session and applies statistics
//!   and access on completion
//!
//! ## Key Components
//!
//! - [`ChallengeSession`]: One in-flight intervention
//! - [`Shell`]: Click routing, session ownership and write-through settings
//! - [`GenerationService`]: Trait for the generation backend
//! - [`Store`]: Persisted user state
//! - [`Config`]: Application configuration management

pub mod blocklist;
pub mod challenge;
pub mod error;
pub mod generation;
pub mod ledger;
pub mod settings;
pub mod shell;
pub mod stats;
pub mod storage;

pub use blocklist::{BlockEntry, Blocklist, Category};
pub use challenge::{
    dispatch, ChallengePhase, ChallengeRequest, ChallengeResponse, ChallengeSession,
    PendingRequest, Resolution, Ticket,
};
pub use error::{
    ChallengeError, ConfigError, CoreError, GenerationError, ShellError, StoreError,
    ValidationError,
};
pub use generation::{
    ActivityAnalysis, ArithmeticProblem, GeminiClient, GenerationService, GroundingPrompt,
    IntentVerdict,
};
pub use ledger::{ActivityCategory, ActivityRow, Ledger, RowUpdate};
pub use settings::{Difficulty, PersonalityType, RigidityLevel};
pub use shell::{AccessLauncher, BrowserLauncher, ClickOutcome, Shell};
pub use stats::{FocusLevel, WellbeingStats, WellbeingSummary};
pub use storage::{Config, Store};
