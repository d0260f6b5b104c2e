//! Resurfacing sweep — promotes expired pauses back to pending.
//!
//! Runs on dashboard load only; there is no background scheduler. A
//! paused item nobody revisits simply waits for the next visit — the
//! worst failure mode is a reminder that arrives late, which is the
//! documented contract for this checklist.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::items::lifecycle;
use crate::items::model::ActionItem;

/// How long a freshly-resurfaced item keeps its "back on your list"
/// badge.
pub const HIGHLIGHT_WINDOW_SECS: i64 = 5;

/// Promote every paused item whose `resurface_at` has arrived
/// (`resurface_at <= now`, boundary inclusive) back to pending.
///
/// Returns the ids that were promoted, in scan order. Items already
/// pending are untouched — re-running the sweep from a second open tab
/// is a no-op.
pub fn sweep<'a, I>(items: I, now: DateTime<Utc>) -> Vec<String>
where
    I: IntoIterator<Item = &'a mut ActionItem>,
{
    let mut resumed = Vec::new();

    for item in items {
        if !item.is_pause_expired(now) {
            continue;
        }
        match lifecycle::resume(item) {
            Ok(lifecycle::TransitionOutcome::Applied) => resumed.push(item.id.clone()),
            Ok(lifecycle::TransitionOutcome::Noop) => {}
            Err(e) => {
                tracing::warn!(item_id = %item.id, error = %e, "Sweep could not resume item");
            }
        }
    }

    resumed
}

/// Ids recently returned to the list, each visible for a fixed window so
/// the UI can show its "↩ back on your list" badge.
#[derive(Debug, Default)]
pub struct ResurfacedSet {
    shown_until: HashMap<String, DateTime<Utc>>,
}

impl ResurfacedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag an id as recently resurfaced, starting its display window.
    pub fn insert(&mut self, id: impl Into<String>, now: DateTime<Utc>) {
        self.shown_until
            .insert(id.into(), now + Duration::seconds(HIGHLIGHT_WINDOW_SECS));
    }

    /// Whether the badge is still showing for this id. The window is
    /// half-open: exactly at the 5-second mark the badge is gone.
    pub fn contains(&self, id: &str, now: DateTime<Utc>) -> bool {
        self.shown_until.get(id).is_some_and(|until| now < *until)
    }

    /// Drop entries whose window has elapsed.
    pub fn purge(&mut self, now: DateTime<Utc>) {
        self.shown_until.retain(|_, until| now < *until);
    }

    /// Ids still inside their display window.
    pub fn active_ids(&self, now: DateTime<Utc>) -> Vec<String> {
        self.shown_until
            .iter()
            .filter(|(_, until)| now < **until)
            .map(|(id, _)| id.clone())
            .collect()
    }
}
