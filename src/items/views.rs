//! Derived views of the item set for the presentation layer.
//!
//! Pure projections — nothing here mutates items or talks to the store.

use crate::datefmt::format_resurface_date;
use crate::items::model::{ActionItem, ItemStatus, Priority};

/// Section heading for a priority bucket.
pub fn bucket_title(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "Get Started",
        Priority::Medium => "Build Your Foundation",
        Priority::Low => "When You're Ready",
    }
}

/// One rendered group of pending items.
#[derive(Debug, Clone)]
pub struct PriorityBucket {
    pub priority: Priority,
    pub title: &'static str,
    pub items: Vec<ActionItem>,
}

/// A paused item with its human-readable return date.
#[derive(Debug, Clone)]
pub struct PausedEntry {
    pub item: ActionItem,
    /// e.g. "March 3rd".
    pub resurfaces_on: String,
}

/// Group pending items into the three priority buckets, high first, each
/// sorted by `sort_order` ascending. Empty buckets are included so the
/// shell renders consistent sections.
pub fn pending_buckets<'a, I>(items: I) -> Vec<PriorityBucket>
where
    I: IntoIterator<Item = &'a ActionItem>,
{
    let mut pending: Vec<&ActionItem> = items
        .into_iter()
        .filter(|i| i.status == ItemStatus::Pending)
        .collect();
    pending.sort_by_key(|i| i.sort_order);

    [Priority::High, Priority::Medium, Priority::Low]
        .into_iter()
        .map(|priority| PriorityBucket {
            priority,
            title: bucket_title(priority),
            items: pending
                .iter()
                .filter(|i| i.priority == priority)
                .map(|i| (*i).clone())
                .collect(),
        })
        .collect()
}

/// Paused items with their formatted resurface dates, soonest first.
pub fn paused_entries<'a, I>(items: I) -> Vec<PausedEntry>
where
    I: IntoIterator<Item = &'a ActionItem>,
{
    let mut entries: Vec<PausedEntry> = items
        .into_iter()
        .filter(|i| i.status == ItemStatus::Paused)
        .map(|i| PausedEntry {
            resurfaces_on: i
                .resurface_at
                .map(format_resurface_date)
                .unwrap_or_default(),
            item: i.clone(),
        })
        .collect();

    entries.sort_by_key(|e| e.item.resurface_at);
    entries
}

/// Scalar "needs attention" count — pending items only.
pub fn needs_attention<'a, I>(items: I) -> usize
where
    I: IntoIterator<Item = &'a ActionItem>,
{
    items
        .into_iter()
        .filter(|i| i.status == ItemStatus::Pending)
        .count()
}
