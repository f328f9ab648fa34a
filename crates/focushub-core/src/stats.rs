//! Wellbeing statistics and the summary shown on the vital-signs view.
//!
//! Counters only move forward; `focus_history` is a rolling window of
//! recent daily focus scores (0-100).

use serde::{Deserialize, Serialize};

pub const DEFAULT_FOCUS_HISTORY_LEN: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellbeingStats {
    pub interceptions: u64,
    pub allowed_sessions: u64,
    pub total_time_saved_minutes: u64,
    pub focus_history: Vec<u8>,
    pub streak: u64,
}

impl Default for WellbeingStats {
    fn default() -> Self {
        Self {
            interceptions: 14,
            allowed_sessions: 3,
            total_time_saved_minutes: 125,
            focus_history: vec![40, 65, 30, 80, 55, 90, 75],
            streak: 5,
        }
    }
}

impl WellbeingStats {
    /// A blocked entry was intercepted. Counts attempts, not outcomes.
    pub fn record_interception(&mut self) {
        self.interceptions = self.interceptions.saturating_add(1);
    }

    /// A challenge was completed and access granted.
    pub fn record_allowed_session(&mut self, time_saved_minutes: u64) {
        self.allowed_sessions = self.allowed_sessions.saturating_add(1);
        self.total_time_saved_minutes = self
            .total_time_saved_minutes
            .saturating_add(time_saved_minutes);
    }

    /// Push a daily focus score, keeping at most `window` entries.
    pub fn record_focus_score(&mut self, score: u8, window: usize) {
        self.focus_history.push(score.min(100));
        let window = window.max(1);
        if self.focus_history.len() > window {
            let excess = self.focus_history.len() - window;
            self.focus_history.drain(..excess);
        }
    }

    pub fn summary(&self) -> WellbeingSummary {
        let average_focus = if self.focus_history.is_empty() {
            0.0
        } else {
            self.focus_history.iter().map(|&s| f64::from(s)).sum::<f64>()
                / self.focus_history.len() as f64
        };
        let peak_focus = self.focus_history.iter().copied().max().unwrap_or(0);
        let resistance_rate = if self.interceptions == 0 {
            0.0
        } else {
            (1.0 - self.allowed_sessions as f64 / self.interceptions as f64).clamp(0.0, 1.0)
        };

        WellbeingSummary {
            interceptions: self.interceptions,
            unlocks: self.allowed_sessions,
            time_saved_minutes: self.total_time_saved_minutes,
            streak: self.streak,
            average_focus,
            peak_focus,
            resistance_rate,
            focus_level: FocusLevel::from_average(average_focus),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusLevel {
    Peak,
    Steady,
    Recovering,
}

impl FocusLevel {
    fn from_average(avg: f64) -> Self {
        if avg >= 75.0 {
            Self::Peak
        } else if avg >= 50.0 {
            Self::Steady
        } else {
            Self::Recovering
        }
    }
}

/// Derived figures for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellbeingSummary {
    pub interceptions: u64,
    pub unlocks: u64,
    pub time_saved_minutes: u64,
    pub streak: u64,
    pub average_focus: f64,
    pub peak_focus: u8,
    /// Share of interceptions that did not end in an unlock.
    pub resistance_rate: f64,
    pub focus_level: FocusLevel,
}
