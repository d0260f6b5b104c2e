//! Dwell-time telemetry — how long the visitor spends on each dashboard
//! tab.
//!
//! The tracker is session-scoped state with explicit event methods; it
//! produces samples but never sends them. Delivery (and its best-effort
//! contract) belongs to the session layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One viewing interval of a dashboard tab. Emitted at most once per
/// transition event and never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellSample {
    pub partnership_id: String,
    pub user_id: String,
    pub tab_name: String,
    pub duration_seconds: i64,
}

/// Tracks the current tab and when the visitor landed on it.
///
/// Two events matter: a tab change flushes the previous tab's interval
/// and restarts the clock; losing page visibility flushes the current
/// interval WITHOUT restarting the clock, so a visitor who returns keeps
/// accumulating on the same tab.
#[derive(Debug)]
pub struct DwellTracker {
    partnership_id: String,
    user_id: String,
    current_tab: Option<String>,
    tab_started_at: DateTime<Utc>,
}

impl DwellTracker {
    /// Fresh tracker with no tab selected.
    pub fn new(
        partnership_id: impl Into<String>,
        user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            partnership_id: partnership_id.into(),
            user_id: user_id.into(),
            current_tab: None,
            tab_started_at: now,
        }
    }

    /// The tab currently being viewed, if any.
    pub fn current_tab(&self) -> Option<&str> {
        self.current_tab.as_deref()
    }

    /// Forget the current tab and restart the clock. Called on dashboard
    /// reload.
    pub fn reset(&mut self, now: DateTime<Utc>) {
        self.current_tab = None;
        self.tab_started_at = now;
    }

    /// The visitor switched tabs. Returns the sample for the *previous*
    /// tab (None on the first selection), then starts timing `new_tab`.
    /// Re-selecting the current tab is a no-op.
    pub fn tab_changed(&mut self, new_tab: &str, now: DateTime<Utc>) -> Option<DwellSample> {
        if self.current_tab.as_deref() == Some(new_tab) {
            return None;
        }

        let sample = self
            .current_tab
            .take()
            .map(|prev| self.sample_for(prev, now));

        self.current_tab = Some(new_tab.to_string());
        self.tab_started_at = now;

        sample
    }

    /// The page lost visibility. Flushes the current tab's elapsed time
    /// but keeps the clock running — only a tab change resets it.
    pub fn page_hidden(&self, now: DateTime<Utc>) -> Option<DwellSample> {
        self.current_tab
            .clone()
            .map(|tab| self.sample_for(tab, now))
    }

    fn sample_for(&self, tab_name: String, now: DateTime<Utc>) -> DwellSample {
        DwellSample {
            partnership_id: self.partnership_id.clone(),
            user_id: self.user_id.clone(),
            tab_name,
            duration_seconds: (now - self.tab_started_at).num_seconds().max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
    }

    fn tracker() -> DwellTracker {
        DwellTracker::new("p1", "u1", start())
    }

    #[test]
    fn first_selection_emits_nothing() {
        let mut t = tracker();
        assert!(t.tab_changed("overview", start()).is_none());
        assert_eq!(t.current_tab(), Some("overview"));
    }

    #[test]
    fn switch_emits_previous_tab_duration() {
        let mut t = tracker();
        t.tab_changed("overview", start());

        let sample = t
            .tab_changed("engagement", start() + Duration::seconds(12))
            .unwrap();
        assert_eq!(sample.tab_name, "overview");
        assert_eq!(sample.duration_seconds, 12);
        assert_eq!(sample.partnership_id, "p1");
        assert_eq!(sample.user_id, "u1");
    }

    #[test]
    fn hidden_flushes_without_resetting_clock() {
        let mut t = tracker();
        t.tab_changed("overview", start());
        t.tab_changed("engagement", start() + Duration::seconds(12));

        // Hidden 5 seconds into the engagement tab.
        let hidden = t.page_hidden(start() + Duration::seconds(17)).unwrap();
        assert_eq!(hidden.tab_name, "engagement");
        assert_eq!(hidden.duration_seconds, 5);

        // Visibility came back; the clock never reset, so a later tab
        // change reports the full interval since the switch.
        let next = t
            .tab_changed("documents", start() + Duration::seconds(20))
            .unwrap();
        assert_eq!(next.tab_name, "engagement");
        assert_eq!(next.duration_seconds, 8);
    }

    #[test]
    fn reselecting_current_tab_is_noop() {
        let mut t = tracker();
        t.tab_changed("overview", start());
        assert!(t.tab_changed("overview", start() + Duration::seconds(30)).is_none());

        // The original start time still applies.
        let sample = t
            .tab_changed("engagement", start() + Duration::seconds(40))
            .unwrap();
        assert_eq!(sample.duration_seconds, 40);
    }

    #[test]
    fn hidden_with_no_tab_emits_nothing() {
        let t = tracker();
        assert!(t.page_hidden(start() + Duration::seconds(5)).is_none());
    }

    #[test]
    fn reset_clears_tab() {
        let mut t = tracker();
        t.tab_changed("overview", start());
        t.reset(start() + Duration::seconds(10));
        assert!(t.current_tab().is_none());
        assert!(t.page_hidden(start() + Duration::seconds(11)).is_none());
    }

    #[test]
    fn sample_serde_snake_case() {
        let sample = DwellSample {
            partnership_id: "p1".into(),
            user_id: "u1".into(),
            tab_name: "overview".into(),
            duration_seconds: 42,
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains("\"partnership_id\":\"p1\""));
        assert!(json.contains("\"tab_name\":\"overview\""));
        assert!(json.contains("\"duration_seconds\":42"));
    }
}
