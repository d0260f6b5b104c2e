//! Action-item data model — items, enums, and invariant checks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What part of onboarding a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Onboarding,
    Scheduling,
    Engagement,
    Data,
    Documentation,
}

/// Render-order priority. High surfaces first on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Current lifecycle status. The three states are mutually exclusive and
/// each carries its own metadata fields on `ActionItem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Completed,
    Paused,
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Completed => write!(f, "completed"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// How long a pause defers an item. The dashboard offers exactly these
/// three choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseDuration {
    OneWeek,
    TwoWeeks,
    FourWeeks,
}

impl PauseDuration {
    /// Number of weeks deferred.
    pub fn weeks(self) -> i64 {
        match self {
            Self::OneWeek => 1,
            Self::TwoWeeks => 2,
            Self::FourWeeks => 4,
        }
    }

    /// Days until resurfacing.
    pub fn days(self) -> i64 {
        self.weeks() * 7
    }

    /// The tag stored as `pausedReason`, e.g. "2_weeks".
    pub fn reason_label(self) -> &'static str {
        match self {
            Self::OneWeek => "1_week",
            Self::TwoWeeks => "2_weeks",
            Self::FourWeeks => "4_weeks",
        }
    }

    /// Parse a week count from the UI. Only 1, 2, and 4 are offered.
    pub fn from_weeks(weeks: u8) -> Option<Self> {
        match weeks {
            1 => Some(Self::OneWeek),
            2 => Some(Self::TwoWeeks),
            4 => Some(Self::FourWeeks),
            _ => None,
        }
    }
}

/// A single onboarding task tracked per partnership.
///
/// Items are provisioned out-of-band and never deleted here; the engine
/// only moves them between statuses. Field names match the store's wire
/// shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// Opaque store-assigned identifier.
    pub id: String,
    /// Short task title.
    pub title: String,
    /// Longer explanation shown on the card.
    pub description: String,
    /// Onboarding area.
    pub category: Category,
    /// Priority bucket.
    pub priority: Priority,
    /// Stable ordering within a priority bucket.
    pub sort_order: i32,
    /// Lifecycle status.
    pub status: ItemStatus,
    /// Set only when the item is completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Set together with `resurface_at` while paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    /// Duration tag such as "2_weeks"; set while paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_reason: Option<String>,
    /// When a paused item returns to pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resurface_at: Option<DateTime<Utc>>,
    /// Present when completion was evidenced by an uploaded document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence_file_path: Option<String>,
}

impl ActionItem {
    /// Create a pending item. Used by tests and embedders; production
    /// items arrive from the store already populated.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category,
            priority,
            sort_order: 0,
            status: ItemStatus::Pending,
            completed_at: None,
            paused_at: None,
            paused_reason: None,
            resurface_at: None,
            evidence_file_path: None,
        }
    }

    /// Builder: set description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: set sort order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Whether this pause has run its course.
    ///
    /// The boundary is inclusive: an item whose `resurface_at` equals
    /// `now` is due.
    pub fn is_pause_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == ItemStatus::Paused
            && self.resurface_at.is_some_and(|at| at <= now)
    }

    /// Check the status/metadata exclusivity invariant.
    ///
    /// Exactly one of {completed_at set, paused_at+resurface_at set,
    /// neither} must hold, matching the status.
    pub fn check_invariants(&self) -> Result<(), String> {
        let pause_fields = [
            self.paused_at.is_some(),
            self.paused_reason.is_some(),
            self.resurface_at.is_some(),
        ];

        match self.status {
            ItemStatus::Pending => {
                if self.completed_at.is_some() {
                    return Err(format!("pending item {} has completed_at", self.id));
                }
                if pause_fields.iter().any(|set| *set) {
                    return Err(format!("pending item {} has pause metadata", self.id));
                }
            }
            ItemStatus::Completed => {
                if self.completed_at.is_none() {
                    return Err(format!("completed item {} missing completed_at", self.id));
                }
                if pause_fields.iter().any(|set| *set) {
                    return Err(format!("completed item {} has pause metadata", self.id));
                }
            }
            ItemStatus::Paused => {
                if self.completed_at.is_some() {
                    return Err(format!("paused item {} has completed_at", self.id));
                }
                if pause_fields.iter().any(|set| !*set) {
                    return Err(format!("paused item {} missing pause metadata", self.id));
                }
            }
        }

        Ok(())
    }
}
