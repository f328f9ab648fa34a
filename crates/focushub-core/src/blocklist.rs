//! Tracked distraction apps and their blocked flag.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Social,
    Entertainment,
    Work,
    Utility,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Self::Social,
        Self::Entertainment,
        Self::Work,
        Self::Utility,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Social => "Social",
            Self::Entertainment => "Entertainment",
            Self::Work => "Work",
            Self::Utility => "Utility",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{s}'"),
            })
    }
}

/// A tracked application or site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockEntry {
    pub id: String,
    #[serde(alias = "name")]
    pub display_name: String,
    pub icon: String,
    pub category: Category,
    pub is_blocked: bool,
}

impl BlockEntry {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        icon: impl Into<String>,
        category: Category,
        is_blocked: bool,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            icon: icon.into(),
            category,
            is_blocked,
        }
    }
}

pub const DEFAULT_ICON: &str = "📱";

/// Ordered list of tracked entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Blocklist {
    entries: Vec<BlockEntry>,
}

impl Default for Blocklist {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Blocklist {
    pub fn new(entries: Vec<BlockEntry>) -> Self {
        Self { entries }
    }

    /// The list a fresh install starts with.
    pub fn seeded() -> Self {
        Self::new(vec![
            BlockEntry::new("1", "Instagram", "📸", Category::Social, true),
            BlockEntry::new("2", "YouTube", "🎬", Category::Entertainment, true),
            BlockEntry::new("3", "Twitter / X", "🐦", Category::Social, true),
            BlockEntry::new("4", "TikTok", "🎵", Category::Entertainment, true),
            BlockEntry::new("5", "Reddit", "🤖", Category::Social, false),
            BlockEntry::new("6", "LinkedIn", "💼", Category::Work, false),
        ])
    }

    pub fn entries(&self) -> &[BlockEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&BlockEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Look up by id first, then by case-insensitive display name.
    pub fn lookup(&self, id_or_name: &str) -> Option<&BlockEntry> {
        self.find(id_or_name).or_else(|| {
            self.entries
                .iter()
                .find(|e| e.display_name.eq_ignore_ascii_case(id_or_name.trim()))
        })
    }

    /// Flip the blocked flag. Returns the new state, or `None` if the id is unknown.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        entry.is_blocked = !entry.is_blocked;
        Some(entry.is_blocked)
    }

    /// Append a user-defined entry. New entries start blocked.
    pub fn add(
        &mut self,
        display_name: &str,
        icon: Option<&str>,
        category: Option<Category>,
    ) -> Result<&BlockEntry, ValidationError> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "app name must not be empty".into(),
            });
        }
        let icon = icon
            .map(str::trim)
            .filter(|i| !i.is_empty())
            .unwrap_or(DEFAULT_ICON);
        let entry = BlockEntry::new(
            uuid::Uuid::new_v4().to_string(),
            name,
            icon,
            category.unwrap_or(Category::Other),
            true,
        );
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Remove an entry. Returns the removed entry, if any.
    pub fn remove(&mut self, id: &str) -> Option<BlockEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }
}
