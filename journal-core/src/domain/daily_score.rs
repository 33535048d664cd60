//! Daily discipline checklist and its dated score history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The standard routine items, as (key, label) pairs.
pub const STANDARD_ITEMS: [(&str, &str); 6] = [
    ("meditation", "Meditation Completion"),
    ("planExecution", "Plan Execution"),
    ("dataCollection", "Data Collection"),
    ("narrated", "Narrated Out Loud"),
    ("screenTime", "Minimized Screen Time"),
    ("eodCollection", "End of Day Data Collection"),
];

/// A saved checklist for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyScore {
    pub score_date: NaiveDate,
    #[serde(default)]
    pub scores: BTreeMap<String, bool>,
}

impl DailyScore {
    /// Share of checked items as a percentage; 0 for an empty checklist.
    pub fn percentage(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        let checked = self.scores.values().filter(|&&v| v).count();
        checked as f64 / self.scores.len() as f64 * 100.0
    }

    pub fn has_checklist(&self) -> bool {
        !self.scores.is_empty()
    }
}

/// Today's in-progress checklist over the standard items.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyChecklist {
    items: BTreeMap<String, bool>,
}

impl Default for DailyChecklist {
    fn default() -> Self {
        Self {
            items: STANDARD_ITEMS
                .iter()
                .map(|(key, _)| (key.to_string(), false))
                .collect(),
        }
    }
}

impl DailyChecklist {
    /// Flip one item. Unknown keys are ignored.
    pub fn toggle(&mut self, key: &str) {
        if let Some(checked) = self.items.get_mut(key) {
            *checked = !*checked;
        }
    }

    pub fn is_checked(&self, key: &str) -> bool {
        self.items.get(key).copied().unwrap_or(false)
    }

    /// Rounded integer percentage of checked items.
    pub fn score(&self) -> u32 {
        if self.items.is_empty() {
            return 0;
        }
        let checked = self.items.values().filter(|&&v| v).count();
        (checked as f64 / self.items.len() as f64 * 100.0).round() as u32
    }

    /// Freeze the checklist into a dated score entry.
    pub fn into_score(self, date: NaiveDate) -> DailyScore {
        DailyScore {
            score_date: date,
            scores: self.items,
        }
    }
}
