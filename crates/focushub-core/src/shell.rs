//! Application shell.
//!
//! Owns the persisted state and the single optional challenge session.
//! Clicks on blocklist entries are routed here; granted challenges update
//! the wellbeing statistics and trigger the access side effect.
//!
//! The shell never awaits. Generation requests come back to the caller as
//! [`PendingRequest`]s, are executed with [`dispatch`](crate::challenge::dispatch),
//! and their outcomes are fed to [`Shell::resolve`]. Cancelling in between
//! is always possible; a late result for a closed session is discarded.

use crate::blocklist::{BlockEntry, Blocklist, Category};
use crate::challenge::{
    ChallengePhase, ChallengeResponse, ChallengeSession, PendingRequest, Resolution, Ticket,
};
use crate::error::{ChallengeError, GenerationError, Result, ShellError, ValidationError};
use crate::generation::{ActivityAnalysis, GenerationService};
use crate::ledger::{self, ActivityRow, AnalysisError, Ledger, RowUpdate};
use crate::settings::{PersonalityType, RigidityLevel};
use crate::stats::WellbeingStats;
use crate::storage::{AccessConfig, Config, Store, StoreKey};

/// The "access" side effect performed when an entry may be opened.
pub trait AccessLauncher {
    fn launch(&self, entry: &BlockEntry) -> std::io::Result<()>;
}

/// Opens the configured placeholder link in the default browser.
#[derive(Debug, Clone)]
pub struct BrowserLauncher {
    url: String,
    open_browser: bool,
}

impl BrowserLauncher {
    pub fn new(access: &AccessConfig) -> Self {
        Self {
            url: access.url.clone(),
            open_browser: access.open_browser,
        }
    }
}

impl AccessLauncher for BrowserLauncher {
    fn launch(&self, entry: &BlockEntry) -> std::io::Result<()> {
        tracing::info!(app = %entry.display_name, url = %self.url, "opening access link");
        if self.open_browser {
            open::that(&self.url)?;
        }
        Ok(())
    }
}

/// Result of clicking a blocklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The entry is not blocked and was opened.
    Opened(BlockEntry),
    /// The entry is blocked but no goal is set. The user must set one first.
    GoalRequired,
    /// A challenge started. Carries the first phase's fetch, if any.
    Intercepted { request: Option<PendingRequest> },
}

pub struct Shell<L: AccessLauncher = BrowserLauncher> {
    store: Store,
    time_saved_minutes: u64,
    focus_history_len: usize,
    launcher: L,
    session: Option<ChallengeSession>,
}

impl Shell<BrowserLauncher> {
    /// Shell with the browser launcher described by `config`.
    pub fn with_browser(store: Store, config: &Config) -> Self {
        Self::new(store, config, BrowserLauncher::new(&config.access))
    }
}

impl<L: AccessLauncher> Shell<L> {
    pub fn new(store: Store, config: &Config, launcher: L) -> Self {
        Self {
            store,
            time_saved_minutes: config.access.time_saved_minutes,
            focus_history_len: config.stats.focus_history_len,
            launcher,
            session: None,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn session(&self) -> Option<&ChallengeSession> {
        self.session.as_ref()
    }

    // ── Settings ─────────────────────────────────────────────────────

    pub fn goal(&self) -> String {
        self.store.goal()
    }

    pub fn set_goal(&self, goal: &str) -> Result<()> {
        self.store.set(StoreKey::Goal, goal.trim())?;
        Ok(())
    }

    pub fn rigidity(&self) -> RigidityLevel {
        self.store.rigidity()
    }

    /// Applies to the next challenge; a running one keeps its snapshot.
    pub fn set_rigidity(&self, rigidity: RigidityLevel) -> Result<()> {
        self.store.set(StoreKey::Rigidity, &rigidity)?;
        Ok(())
    }

    pub fn personality(&self) -> PersonalityType {
        self.store.personality()
    }

    pub fn set_personality(&self, personality: PersonalityType) -> Result<()> {
        self.store.set(StoreKey::Personality, &personality)?;
        Ok(())
    }

    pub fn stats(&self) -> WellbeingStats {
        self.store.stats()
    }

    pub fn record_focus_score(&self, score: u8) -> Result<WellbeingStats> {
        let mut stats = self.store.stats();
        stats.record_focus_score(score, self.focus_history_len);
        self.store.set(StoreKey::Stats, &stats)?;
        Ok(stats)
    }

    // ── Blocklist ────────────────────────────────────────────────────

    pub fn blocklist(&self) -> Blocklist {
        self.store.blocklist()
    }

    pub fn toggle_entry(&self, id: &str) -> Result<bool> {
        let mut list = self.store.blocklist();
        let blocked = list
            .toggle(id)
            .ok_or_else(|| ShellError::UnknownEntry(id.to_string()))?;
        self.store.set(StoreKey::Blocklist, &list)?;
        Ok(blocked)
    }

    pub fn add_entry(
        &self,
        name: &str,
        icon: Option<&str>,
        category: Option<Category>,
    ) -> Result<BlockEntry> {
        let mut list = self.store.blocklist();
        let entry = list.add(name, icon, category)?.clone();
        self.store.set(StoreKey::Blocklist, &list)?;
        Ok(entry)
    }

    pub fn remove_entry(&self, id: &str) -> Result<BlockEntry> {
        let mut list = self.store.blocklist();
        let entry = list
            .remove(id)
            .ok_or_else(|| ShellError::UnknownEntry(id.to_string()))?;
        self.store.set(StoreKey::Blocklist, &list)?;
        Ok(entry)
    }

    // ── Ledger ───────────────────────────────────────────────────────

    pub fn ledger(&self) -> Ledger {
        self.store.ledger()
    }

    pub fn add_row(&self, row: ActivityRow) -> Result<ActivityRow> {
        let mut ledger = self.store.ledger();
        let row = ledger.add(row).clone();
        self.store.set(StoreKey::Ledger, &ledger)?;
        Ok(row)
    }

    pub fn update_row(&self, id: &str, update: RowUpdate) -> Result<ActivityRow> {
        let mut ledger = self.store.ledger();
        let row = ledger
            .update(id, update)
            .cloned()
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "id".into(),
                message: format!("no ledger row '{id}'"),
            })?;
        self.store.set(StoreKey::Ledger, &ledger)?;
        Ok(row)
    }

    pub fn remove_row(&self, id: &str) -> Result<ActivityRow> {
        let mut ledger = self.store.ledger();
        let row = ledger.remove(id).ok_or_else(|| ValidationError::InvalidValue {
            field: "id".into(),
            message: format!("no ledger row '{id}'"),
        })?;
        self.store.set(StoreKey::Ledger, &ledger)?;
        Ok(row)
    }

    /// Analyze the ledger against the current goal and tone.
    pub async fn analyze_ledger(
        &self,
        service: &dyn GenerationService,
    ) -> std::result::Result<ActivityAnalysis, AnalysisError> {
        let ledger = self.store.ledger();
        let goal = self.store.goal();
        ledger::analyze(service, &ledger, &goal, self.store.personality()).await
    }

    // ── Interception ─────────────────────────────────────────────────

    /// Route a click on a blocklist entry.
    pub fn click(&mut self, id: &str) -> Result<ClickOutcome> {
        if let Some(active) = &self.session {
            return Err(ShellError::SessionActive(active.target().display_name.clone()).into());
        }
        let entry = self
            .store
            .blocklist()
            .find(id)
            .cloned()
            .ok_or_else(|| ShellError::UnknownEntry(id.to_string()))?;

        if !entry.is_blocked {
            self.launch(&entry);
            return Ok(ClickOutcome::Opened(entry));
        }

        let goal = self.store.goal();
        if goal.trim().is_empty() {
            tracing::info!(app = %entry.display_name, "interception needs a goal first");
            return Ok(ClickOutcome::GoalRequired);
        }

        // Attempts are counted whether or not the challenge is completed.
        let mut stats = self.store.stats();
        stats.record_interception();
        self.store.set(StoreKey::Stats, &stats)?;

        let (session, request) =
            ChallengeSession::start(entry, goal, self.store.rigidity(), self.store.personality());
        self.session = Some(session);
        Ok(ClickOutcome::Intercepted { request })
    }

    fn active(&mut self) -> Result<&mut ChallengeSession> {
        Ok(self.session.as_mut().ok_or(ShellError::NoActiveSession)?)
    }

    pub fn submit_intent(&mut self, text: &str) -> Result<PendingRequest> {
        Ok(self.active()?.submit_intent(text)?)
    }

    pub fn submit_answer(&mut self, answer: &str) -> Result<ChallengePhase> {
        Ok(self.active()?.submit_answer(answer)?)
    }

    pub fn confirm(&mut self) -> Result<Option<PendingRequest>> {
        Ok(self.active()?.confirm()?)
    }

    pub fn retry(&mut self) -> Result<PendingRequest> {
        Ok(self.active()?.retry()?)
    }

    /// Feed back the outcome of a request. Results for a session that is no
    /// longer active are discarded.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: std::result::Result<ChallengeResponse, GenerationError>,
    ) -> Resolution {
        match self.session.as_mut() {
            Some(session) if session.id() == ticket.session => session.resolve(ticket, outcome),
            _ => {
                tracing::warn!(?ticket, "discarding result for a closed session");
                Resolution::Stale
            }
        }
    }

    /// Abandon the active challenge. No statistics change and nothing opens.
    pub fn cancel(&mut self) -> Option<BlockEntry> {
        let session = self.session.take()?;
        tracing::info!(
            session = %session.id(),
            app = %session.target().display_name,
            phase = %session.phase(),
            "challenge cancelled"
        );
        Some(session.target().clone())
    }

    /// Grant access after a completed challenge.
    ///
    /// The session stays open until the statistics are persisted.
    pub fn proceed(&mut self) -> Result<BlockEntry> {
        let session = self.session.as_ref().ok_or(ShellError::NoActiveSession)?;
        if !session.is_completed() {
            return Err(ChallengeError::NotCompleted.into());
        }

        let mut stats = self.store.stats();
        stats.record_allowed_session(self.time_saved_minutes);
        self.store.set(StoreKey::Stats, &stats)?;

        let session = self.session.take().ok_or(ShellError::NoActiveSession)?;
        let completed = match session.finish() {
            Ok(completed) => completed,
            Err((session, err)) => {
                self.session = Some(session);
                return Err(err.into());
            }
        };
        self.launch(&completed.target);
        Ok(completed.target)
    }

    fn launch(&self, entry: &BlockEntry) {
        if let Err(e) = self.launcher.launch(entry) {
            tracing::warn!(app = %entry.display_name, error = %e, "failed to open access link");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::generation::ArithmeticProblem;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        opened: RefCell<Vec<String>>,
    }

    impl AccessLauncher for Recorder {
        fn launch(&self, entry: &BlockEntry) -> std::io::Result<()> {
            self.opened.borrow_mut().push(entry.display_name.clone());
            Ok(())
        }
    }

    fn completed_soft_challenge() -> Shell<Recorder> {
        let store = Store::open_memory().unwrap();
        let mut shell = Shell::new(store, &Config::default(), Recorder::default());
        shell.set_goal("Finish report").unwrap();
        shell.set_rigidity(RigidityLevel::Soft).unwrap();

        let outcome = shell.click("4").unwrap();
        let ClickOutcome::Intercepted { request: Some(pending) } = outcome else {
            panic!("expected an arithmetic fetch");
        };
        let problem = ArithmeticProblem {
            question: "6 * 7".into(),
            answer: "42".into(),
            explanation: "multiply".into(),
        };
        shell.resolve(pending.ticket, Ok(ChallengeResponse::Arithmetic(problem)));
        assert_eq!(shell.submit_answer("42").unwrap(), ChallengePhase::Completed);
        shell
    }

    #[test]
    fn failed_stats_write_keeps_completed_session() {
        let mut shell = completed_soft_challenge();
        let before = shell.stats();

        shell.store().set_read_only(true).unwrap();
        assert!(matches!(shell.proceed(), Err(CoreError::Store(_))));
        assert!(shell.session().unwrap().is_completed());
        assert!(shell.launcher().opened.borrow().is_empty());

        shell.store().set_read_only(false).unwrap();
        assert_eq!(shell.proceed().unwrap().display_name, "TikTok");
        assert!(shell.session().is_none());
        assert_eq!(shell.stats().allowed_sessions, before.allowed_sessions + 1);
        assert_eq!(*shell.launcher().opened.borrow(), vec!["TikTok".to_string()]);
    }

    #[test]
    fn proceed_before_completion_changes_nothing() {
        let store = Store::open_memory().unwrap();
        let mut shell = Shell::new(store, &Config::default(), Recorder::default());
        shell.set_goal("Finish report").unwrap();
        shell.click("4").unwrap();
        let before = shell.stats();

        assert!(matches!(
            shell.proceed(),
            Err(CoreError::Challenge(ChallengeError::NotCompleted))
        ));
        assert!(shell.session().is_some());
        assert_eq!(shell.stats(), before);
    }
}
