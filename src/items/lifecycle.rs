//! Lifecycle transitions — complete, pause, resume.
//!
//! Pure functions over a single `ActionItem`; the session layer supplies
//! wall-clock time and persists the result. Each command trusts the
//! item's current (server-confirmed) status before applying, so replayed
//! commands from stale clients degrade to no-ops instead of corrupting
//! state.

use chrono::{DateTime, Duration, Utc};

use crate::datefmt::format_resurface_date;
use crate::error::LifecycleError;
use crate::items::model::{ActionItem, ItemStatus, PauseDuration};

/// Whether a command changed the item or found it already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied,
    Noop,
}

/// Mark an item completed. Valid from pending or paused; completing an
/// already-completed item is a no-op.
pub fn complete(
    item: &mut ActionItem,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, LifecycleError> {
    if item.status == ItemStatus::Completed {
        return Ok(TransitionOutcome::Noop);
    }

    item.status = ItemStatus::Completed;
    item.completed_at = Some(now);
    clear_pause_metadata(item);

    Ok(TransitionOutcome::Applied)
}

/// Mark an item completed via an uploaded document.
///
/// Same transition as [`complete`], additionally recording where the
/// evidence landed. A replay against an already-completed item leaves
/// the original evidence pointer untouched.
pub fn complete_with_evidence(
    item: &mut ActionItem,
    file_path: impl Into<String>,
    now: DateTime<Utc>,
) -> Result<TransitionOutcome, LifecycleError> {
    let outcome = complete(item, now)?;
    if outcome == TransitionOutcome::Applied {
        item.evidence_file_path = Some(file_path.into());
    }
    Ok(outcome)
}

/// Defer an item for the chosen duration. Valid from pending only.
///
/// Returns the user-facing confirmation naming the resurface date, e.g.
/// "We'll bring this back on March 3rd."
pub fn pause(
    item: &mut ActionItem,
    duration: PauseDuration,
    now: DateTime<Utc>,
) -> Result<String, LifecycleError> {
    if item.status != ItemStatus::Pending {
        return Err(LifecycleError::InvalidTransition {
            id: item.id.clone(),
            from: item.status.to_string(),
            command: "pause".into(),
        });
    }

    let resurface_at = now + Duration::days(duration.days());

    item.status = ItemStatus::Paused;
    item.paused_at = Some(now);
    item.paused_reason = Some(duration.reason_label().to_string());
    item.resurface_at = Some(resurface_at);

    Ok(format!(
        "We'll bring this back on {}.",
        format_resurface_date(resurface_at)
    ))
}

/// Return a paused item to pending, clearing its pause metadata.
///
/// Invoked by the user ahead of schedule or by the resurfacing sweep at
/// expiry. Resuming an already-pending item is a no-op, which is what
/// makes concurrent sweeps from two open tabs safe.
pub fn resume(item: &mut ActionItem) -> Result<TransitionOutcome, LifecycleError> {
    match item.status {
        ItemStatus::Pending => Ok(TransitionOutcome::Noop),
        ItemStatus::Paused => {
            item.status = ItemStatus::Pending;
            clear_pause_metadata(item);
            Ok(TransitionOutcome::Applied)
        }
        ItemStatus::Completed => Err(LifecycleError::InvalidTransition {
            id: item.id.clone(),
            from: item.status.to_string(),
            command: "resume".into(),
        }),
    }
}

fn clear_pause_metadata(item: &mut ActionItem) {
    item.paused_at = None;
    item.paused_reason = None;
    item.resurface_at = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::model::{Category, Priority};
    use chrono::TimeZone;

    fn item() -> ActionItem {
        ActionItem::new("x1", "Name a champion", Category::Onboarding, Priority::High)
    }

    fn at(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, 10, 30, 0).unwrap()
    }

    #[test]
    fn complete_from_pending() {
        let mut it = item();
        let now = at(2025, 3, 1);

        let outcome = complete(&mut it, now).unwrap();
        assert_eq!(outcome, TransitionOutcome::Applied);
        assert_eq!(it.status, ItemStatus::Completed);
        assert_eq!(it.completed_at, Some(now));
        assert!(it.check_invariants().is_ok());
    }

    #[test]
    fn complete_from_paused_clears_all_pause_fields() {
        let mut it = item();
        pause(&mut it, PauseDuration::TwoWeeks, at(2025, 3, 1)).unwrap();

        let outcome = complete(&mut it, at(2025, 3, 5)).unwrap();
        assert_eq!(outcome, TransitionOutcome::Applied);
        assert_eq!(it.status, ItemStatus::Completed);
        assert!(it.paused_at.is_none());
        assert!(it.paused_reason.is_none());
        assert!(it.resurface_at.is_none());
        assert!(it.check_invariants().is_ok());
    }

    #[test]
    fn complete_twice_is_noop() {
        let mut it = item();
        let first = at(2025, 3, 1);
        complete(&mut it, first).unwrap();

        let outcome = complete(&mut it, at(2025, 3, 2)).unwrap();
        assert_eq!(outcome, TransitionOutcome::Noop);
        // Original completion timestamp stands.
        assert_eq!(it.completed_at, Some(first));
    }

    #[test]
    fn complete_with_evidence_records_path() {
        let mut it = item();
        let outcome =
            complete_with_evidence(&mut it, "partnerships/p1/roster.pdf", at(2025, 3, 1)).unwrap();
        assert_eq!(outcome, TransitionOutcome::Applied);
        assert_eq!(it.evidence_file_path.as_deref(), Some("partnerships/p1/roster.pdf"));
        assert!(it.check_invariants().is_ok());
    }

    #[test]
    fn evidence_replay_keeps_original_path() {
        let mut it = item();
        complete_with_evidence(&mut it, "first.pdf", at(2025, 3, 1)).unwrap();
        let outcome = complete_with_evidence(&mut it, "second.pdf", at(2025, 3, 2)).unwrap();
        assert_eq!(outcome, TransitionOutcome::Noop);
        assert_eq!(it.evidence_file_path.as_deref(), Some("first.pdf"));
    }

    #[test]
    fn pause_computes_exact_resurface_timestamp() {
        let mut it = item();
        let now = at(2025, 2, 17);
        pause(&mut it, PauseDuration::TwoWeeks, now).unwrap();

        assert_eq!(it.status, ItemStatus::Paused);
        assert_eq!(it.paused_at, Some(now));
        assert_eq!(it.paused_reason.as_deref(), Some("2_weeks"));
        // To the second: paused_at + weeks * 7 * 24h.
        assert_eq!(it.resurface_at, Some(now + Duration::days(14)));
        assert!(it.check_invariants().is_ok());
    }

    #[test]
    fn pause_confirmation_names_ordinal_date() {
        let mut it = item();
        // 2025-02-17 + 14 days = 2025-03-03 → "March 3rd".
        let msg = pause(&mut it, PauseDuration::TwoWeeks, at(2025, 2, 17)).unwrap();
        assert_eq!(msg, "We'll bring this back on March 3rd.");
    }

    #[test]
    fn pause_rejected_from_paused_and_completed() {
        let mut it = item();
        pause(&mut it, PauseDuration::OneWeek, at(2025, 3, 1)).unwrap();
        let err = pause(&mut it, PauseDuration::OneWeek, at(2025, 3, 2)).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));

        let mut done = item();
        complete(&mut done, at(2025, 3, 1)).unwrap();
        assert!(pause(&mut done, PauseDuration::OneWeek, at(2025, 3, 2)).is_err());
    }

    #[test]
    fn resume_from_paused() {
        let mut it = item();
        pause(&mut it, PauseDuration::FourWeeks, at(2025, 3, 1)).unwrap();

        let outcome = resume(&mut it).unwrap();
        assert_eq!(outcome, TransitionOutcome::Applied);
        assert_eq!(it.status, ItemStatus::Pending);
        assert!(it.paused_at.is_none());
        assert!(it.paused_reason.is_none());
        assert!(it.resurface_at.is_none());
        assert!(it.check_invariants().is_ok());
    }

    #[test]
    fn resume_on_pending_is_noop() {
        let mut it = item();
        let outcome = resume(&mut it).unwrap();
        assert_eq!(outcome, TransitionOutcome::Noop);
        assert_eq!(it.status, ItemStatus::Pending);
    }

    #[test]
    fn resume_on_completed_is_rejected() {
        let mut it = item();
        complete(&mut it, at(2025, 3, 1)).unwrap();
        assert!(matches!(
            resume(&mut it),
            Err(LifecycleError::InvalidTransition { .. })
        ));
    }
}
