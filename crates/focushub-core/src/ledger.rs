//! Manual time ledger and its AI analysis.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{GenerationError, ValidationError};
use crate::generation::{ActivityAnalysis, GenerationService};
use crate::settings::PersonalityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityCategory {
    Work,
    Leisure,
    Errand,
    Distraction,
}

impl ActivityCategory {
    pub const ALL: [ActivityCategory; 4] =
        [Self::Work, Self::Leisure, Self::Errand, Self::Distraction];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Leisure => "Leisure",
            Self::Errand => "Errand",
            Self::Distraction => "Distraction",
        }
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ActivityCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("expected Work, Leisure, Errand or Distraction; got '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub id: String,
    pub time: String,
    pub activity: String,
    pub category: ActivityCategory,
    pub duration_minutes: u32,
}

impl ActivityRow {
    /// A blank row stamped with the current local time.
    pub fn blank() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            time: Local::now().format("%H:%M").to_string(),
            activity: String::new(),
            category: ActivityCategory::Work,
            duration_minutes: 30,
        }
    }
}

/// Partial update for a ledger row. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct RowUpdate {
    pub time: Option<String>,
    pub activity: Option<String>,
    pub category: Option<ActivityCategory>,
    pub duration_minutes: Option<u32>,
}

/// Rows in display order, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    rows: Vec<ActivityRow>,
}

impl Ledger {
    pub fn new(rows: Vec<ActivityRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ActivityRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Insert a row at the top of the ledger.
    pub fn add(&mut self, row: ActivityRow) -> &ActivityRow {
        self.rows.insert(0, row);
        &self.rows[0]
    }

    /// Apply an update. Returns the updated row, or `None` if the id is unknown.
    pub fn update(&mut self, id: &str, update: RowUpdate) -> Option<&ActivityRow> {
        let row = self.rows.iter_mut().find(|r| r.id == id)?;
        if let Some(time) = update.time {
            row.time = time;
        }
        if let Some(activity) = update.activity {
            row.activity = activity;
        }
        if let Some(category) = update.category {
            row.category = category;
        }
        if let Some(minutes) = update.duration_minutes {
            row.duration_minutes = minutes;
        }
        Some(row)
    }

    pub fn remove(&mut self, id: &str) -> Option<ActivityRow> {
        let idx = self.rows.iter().position(|r| r.id == id)?;
        Some(self.rows.remove(idx))
    }

    pub fn minutes_by_category(&self) -> BTreeMap<ActivityCategory, u64> {
        let mut totals = BTreeMap::new();
        for row in &self.rows {
            *totals.entry(row.category).or_insert(0) += u64::from(row.duration_minutes);
        }
        totals
    }

    pub fn total_minutes(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.duration_minutes)).sum()
    }
}

/// Why a ledger analysis did not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] GenerationError),
}

/// Ask the generation service to analyze the ledger. An empty ledger is
/// rejected without a service call.
pub async fn analyze(
    service: &dyn GenerationService,
    ledger: &Ledger,
    goal: &str,
    tone: PersonalityType,
) -> Result<ActivityAnalysis, AnalysisError> {
    if ledger.is_empty() {
        return Err(ValidationError::EmptyCollection("ledger has no rows to analyze".into()).into());
    }
    tracing::debug!(rows = ledger.rows.len(), %tone, "requesting ledger analysis");
    Ok(service.analyze_activity_log(ledger.rows(), goal, tone).await?)
}

/// Shareable one-line summary of an analysis.
pub fn share_report(analysis: &ActivityAnalysis, goal: &str) -> String {
    format!(
        "Focus Report: Today I saved {}m using Focus Hub! Mission: {}. Score: {}%",
        analysis.time_saved_minutes, goal, analysis.productivity_score
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, category: ActivityCategory, minutes: u32) -> ActivityRow {
        ActivityRow {
            id: id.into(),
            time: "09:00".into(),
            activity: format!("activity {id}"),
            category,
            duration_minutes: minutes,
        }
    }

    #[test]
    fn blank_row_defaults() {
        let r = ActivityRow::blank();
        assert_eq!(r.category, ActivityCategory::Work);
        assert_eq!(r.duration_minutes, 30);
        assert!(r.activity.is_empty());
        assert_eq!(r.time.len(), 5);
    }

    #[test]
    fn add_inserts_at_front() {
        let mut ledger = Ledger::default();
        ledger.add(row("a", ActivityCategory::Work, 30));
        ledger.add(row("b", ActivityCategory::Leisure, 10));
        let ids: Vec<_> = ledger.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn update_changes_only_given_fields() {
        let mut ledger = Ledger::new(vec![row("a", ActivityCategory::Work, 30)]);
        let updated = ledger
            .update(
                "a",
                RowUpdate {
                    category: Some(ActivityCategory::Distraction),
                    duration_minutes: Some(45),
                    ..Default::default()
                },
            )
            .unwrap()
            .clone();
        assert_eq!(updated.category, ActivityCategory::Distraction);
        assert_eq!(updated.duration_minutes, 45);
        assert_eq!(updated.time, "09:00");
        assert!(ledger.update("zzz", RowUpdate::default()).is_none());
    }

    #[test]
    fn totals_by_category() {
        let ledger = Ledger::new(vec![
            row("a", ActivityCategory::Work, 30),
            row("b", ActivityCategory::Work, 15),
            row("c", ActivityCategory::Distraction, 20),
        ]);
        let totals = ledger.minutes_by_category();
        assert_eq!(totals[&ActivityCategory::Work], 45);
        assert_eq!(totals[&ActivityCategory::Distraction], 20);
        assert!(!totals.contains_key(&ActivityCategory::Errand));
        assert_eq!(ledger.total_minutes(), 65);
    }

    #[test]
    fn share_report_format() {
        let analysis = ActivityAnalysis {
            summary: "ok".into(),
            time_wasted_minutes: 10.0,
            time_saved_minutes: 40.0,
            recommendations: vec![],
            productivity_score: 82.0,
        };
        assert_eq!(
            share_report(&analysis, "Finish report"),
            "Focus Report: Today I saved 40m using Focus Hub! Mission: Finish report. Score: 82%"
        );
    }
}
