//! `DashboardSession` — per-visit engine state and command dispatch.
//!
//! Holds the optimistic item cache (overwritten wholesale on every
//! reload), the resurfaced-badge window, and the dwell tracker. All
//! mutation happens through `&mut self` on the single event-handling
//! task; the only suspension points are store round trips, and those
//! are never retried — a failed write leaves the cache one reload ahead
//! of the store, which the next reload reconciles.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::DashboardConfig;
use crate::error::{LifecycleError, Result};
use crate::items::lifecycle::{self, TransitionOutcome};
use crate::items::model::{ActionItem, ItemStatus, PauseDuration};
use crate::items::resurface::{self, ResurfacedSet};
use crate::items::views::{self, PausedEntry, PriorityBucket};
use crate::store::traits::{
    DashboardApi, DataType, EvidenceUpload, ItemDataSubmission, ItemPatch,
};
use crate::tracking::{DwellSample, DwellTracker};

/// One visitor's dashboard session.
pub struct DashboardSession {
    config: DashboardConfig,
    api: Arc<dyn DashboardApi>,
    session_id: Uuid,
    items: HashMap<String, ActionItem>,
    resurfaced: ResurfacedSet,
    tracker: DwellTracker,
}

impl DashboardSession {
    /// Create an empty session; call [`reload`](Self::reload) to pull
    /// the item set.
    pub fn new(config: DashboardConfig, api: Arc<dyn DashboardApi>) -> Self {
        let tracker = DwellTracker::new(
            config.partnership_id.as_str(),
            config.user_id.as_str(),
            Utc::now(),
        );
        Self {
            config,
            api,
            session_id: Uuid::new_v4(),
            items: HashMap::new(),
            resurfaced: ResurfacedSet::new(),
            tracker,
        }
    }

    /// This session's id, carried on every audit event.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // ── Load & resurfacing sweep ────────────────────────────────────

    /// Reload the item set from the store and run the resurfacing
    /// sweep. The cache is overwritten wholesale — this is the
    /// reconciliation point for any optimistic writes that failed.
    pub async fn reload(&mut self) -> Result<()> {
        self.reload_at(Utc::now()).await
    }

    /// Reload with an explicit timestamp for the sweep comparison.
    pub async fn reload_at(&mut self, now: DateTime<Utc>) -> Result<()> {
        let fetched = self.api.fetch_items().await?;
        self.items = fetched.into_iter().map(|i| (i.id.clone(), i)).collect();
        self.resurfaced.purge(now);

        let resumed = resurface::sweep(self.items.values_mut(), now);
        if resumed.is_empty() {
            return Ok(());
        }

        info!(
            partnership_id = %self.config.partnership_id,
            count = resumed.len(),
            "Resurfacing expired paused items"
        );

        for id in resumed {
            // Local status is already pending either way; only a
            // store-confirmed resume earns the badge and the audit
            // event. A failed PATCH gets retried by the next load's
            // sweep, since the store still sees the item as paused.
            match self
                .api
                .patch_item(&ItemPatch::status(&*id, ItemStatus::Pending))
                .await
            {
                Ok(()) => {
                    self.resurfaced.insert(id.as_str(), now);
                    self.log_activity("action_item_resurfaced", json!({ "itemId": id }))
                        .await;
                }
                Err(e) => {
                    warn!(item_id = %id, error = %e, "Resume PATCH failed during sweep");
                }
            }
        }

        Ok(())
    }

    // ── Lifecycle commands ──────────────────────────────────────────

    /// Complete an item (manual action).
    pub async fn complete(&mut self, item_id: &str) -> Result<()> {
        self.complete_at(item_id, Utc::now()).await
    }

    /// Complete with an explicit timestamp.
    pub async fn complete_at(&mut self, item_id: &str, now: DateTime<Utc>) -> Result<()> {
        let item = self.item_mut(item_id)?;
        if lifecycle::complete(item, now)? == TransitionOutcome::Noop {
            debug!(item_id, "Complete replay on finished item");
            return Ok(());
        }

        info!(item_id, "Action item completed");
        self.push_patch(
            ItemPatch::status(item_id, ItemStatus::Completed),
            "action_item_completed",
            json!({ "itemId": item_id }),
        )
        .await;
        Ok(())
    }

    /// Complete an item by uploading an evidence document.
    ///
    /// The upload itself is not optimistic: a failed upload is returned
    /// to the caller (the shell toasts it) and the item keeps its prior
    /// status. Only after the store confirms the file does the
    /// completion proceed like any other.
    pub async fn complete_via_evidence(
        &mut self,
        item_id: &str,
        file_path: &Path,
        folder: Option<String>,
    ) -> Result<()> {
        self.complete_via_evidence_at(item_id, file_path, folder, Utc::now())
            .await
    }

    /// Evidence completion with an explicit timestamp.
    pub async fn complete_via_evidence_at(
        &mut self,
        item_id: &str,
        file_path: &Path,
        folder: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        if !self.items.contains_key(item_id) {
            return Err(LifecycleError::NotFound { id: item_id.into() }.into());
        }

        let upload = EvidenceUpload {
            item_id: item_id.to_string(),
            file_path: file_path.to_path_buf(),
            folder,
        };
        let stored_path = self.api.upload_evidence(&upload).await?;

        info!(item_id, path = %stored_path, "Evidence uploaded");
        self.log_activity(
            "evidence_uploaded",
            json!({ "itemId": item_id, "filePath": stored_path }),
        )
        .await;

        let item = self.item_mut(item_id)?;
        if lifecycle::complete_with_evidence(item, stored_path.clone(), now)?
            == TransitionOutcome::Noop
        {
            return Ok(());
        }

        self.push_patch(
            ItemPatch::status(item_id, ItemStatus::Completed),
            "action_item_completed",
            json!({ "itemId": item_id, "filePath": stored_path }),
        )
        .await;
        Ok(())
    }

    /// Defer an item. Returns the confirmation string naming the
    /// resurface date ("We'll bring this back on March 3rd.").
    pub async fn pause(&mut self, item_id: &str, duration: PauseDuration) -> Result<String> {
        self.pause_at(item_id, duration, Utc::now()).await
    }

    /// Pause with an explicit timestamp.
    pub async fn pause_at(
        &mut self,
        item_id: &str,
        duration: PauseDuration,
        now: DateTime<Utc>,
    ) -> Result<String> {
        let item = self.item_mut(item_id)?;
        let confirmation = lifecycle::pause(item, duration, now)?;
        let resurface_at = item
            .resurface_at
            .unwrap_or_else(|| now + chrono::Duration::days(duration.days()));

        info!(item_id, reason = duration.reason_label(), "Action item paused");
        self.push_patch(
            ItemPatch::paused(item_id, duration.reason_label(), resurface_at),
            "action_item_paused",
            json!({ "itemId": item_id, "duration": duration.reason_label() }),
        )
        .await;

        Ok(confirmation)
    }

    /// Bring a paused item back early (manual resume).
    pub async fn resume(&mut self, item_id: &str) -> Result<()> {
        let item = self.item_mut(item_id)?;
        if lifecycle::resume(item)? == TransitionOutcome::Noop {
            return Ok(());
        }

        info!(item_id, "Action item resumed");
        self.push_patch(
            ItemPatch::status(item_id, ItemStatus::Pending),
            "action_item_resumed",
            json!({ "itemId": item_id }),
        )
        .await;
        Ok(())
    }

    /// Form-driven completion carrying a structured payload.
    ///
    /// Returns the store's confirmation message, or `None` when the
    /// dispatch failed and the optimistic completion stands
    /// unconfirmed.
    pub async fn submit_data(
        &mut self,
        item_id: &str,
        data_type: DataType,
        data: serde_json::Value,
    ) -> Result<Option<String>> {
        self.submit_data_at(item_id, data_type, data, Utc::now())
            .await
    }

    /// Submission with an explicit timestamp.
    pub async fn submit_data_at(
        &mut self,
        item_id: &str,
        data_type: DataType,
        data: serde_json::Value,
        now: DateTime<Utc>,
    ) -> Result<Option<String>> {
        // Mirror of the disabled save button: an empty form never
        // reaches the store.
        if submission_is_empty(&data) {
            return Err(LifecycleError::EmptySubmission { id: item_id.into() }.into());
        }

        let item = self.item_mut(item_id)?;
        let outcome = lifecycle::complete(item, now)?;
        if outcome == TransitionOutcome::Noop {
            debug!(item_id, "Data submission replay on finished item");
        }

        let submission = ItemDataSubmission {
            item_id: item_id.to_string(),
            data_type,
            data,
        };

        match self.api.submit_item_data(&submission).await {
            Ok(message) => {
                info!(item_id, data_type = ?data_type, "Action item data submitted");
                self.log_activity(
                    "action_item_data_submitted",
                    json!({ "itemId": item_id, "dataType": data_type }),
                )
                .await;
                Ok(Some(message))
            }
            Err(e) => {
                warn!(item_id, error = %e, "Data submission failed; cache is ahead of the store until next reload");
                Ok(None)
            }
        }
    }

    // ── Derived views ───────────────────────────────────────────────

    /// Pending items grouped into the three priority sections.
    pub fn pending_buckets(&self) -> Vec<PriorityBucket> {
        views::pending_buckets(self.items.values())
    }

    /// Paused items with their formatted resurface dates.
    pub fn paused_entries(&self) -> Vec<PausedEntry> {
        views::paused_entries(self.items.values())
    }

    /// Count of pending items for the "needs attention" indicator.
    pub fn needs_attention(&self) -> usize {
        views::needs_attention(self.items.values())
    }

    /// Whether an item's "back on your list" badge is still showing.
    pub fn is_recently_resurfaced(&self, item_id: &str) -> bool {
        self.is_recently_resurfaced_at(item_id, Utc::now())
    }

    /// Badge check with an explicit timestamp.
    pub fn is_recently_resurfaced_at(&self, item_id: &str, now: DateTime<Utc>) -> bool {
        self.resurfaced.contains(item_id, now)
    }

    /// Look up one cached item.
    pub fn item(&self, item_id: &str) -> Option<&ActionItem> {
        self.items.get(item_id)
    }

    /// Iterate the cached items (unordered).
    pub fn items(&self) -> impl Iterator<Item = &ActionItem> {
        self.items.values()
    }

    // ── Dwell telemetry ─────────────────────────────────────────────

    /// The visitor switched dashboard tabs.
    pub async fn tab_changed(&mut self, tab: &str) {
        self.tab_changed_at(tab, Utc::now()).await;
    }

    /// Tab change with an explicit event timestamp.
    pub async fn tab_changed_at(&mut self, tab: &str, now: DateTime<Utc>) {
        if let Some(sample) = self.tracker.tab_changed(tab, now) {
            self.send_sample(sample).await;
        }
    }

    /// The page lost visibility — flush the current tab's interval.
    pub async fn page_hidden(&mut self) {
        self.page_hidden_at(Utc::now()).await;
    }

    /// Visibility loss with an explicit event timestamp.
    pub async fn page_hidden_at(&mut self, now: DateTime<Utc>) {
        if let Some(sample) = self.tracker.page_hidden(now) {
            self.send_sample(sample).await;
        }
    }

    // ── Internals ───────────────────────────────────────────────────

    fn item_mut(&mut self, item_id: &str) -> std::result::Result<&mut ActionItem, LifecycleError> {
        self.items
            .get_mut(item_id)
            .ok_or_else(|| LifecycleError::NotFound { id: item_id.into() })
    }

    /// Dispatch a lifecycle PATCH, then the matching audit event.
    /// Fire-and-forget: failure is logged and the optimistic cache
    /// stands until the next reload.
    async fn push_patch(&self, patch: ItemPatch, action: &str, details: serde_json::Value) {
        match self.api.patch_item(&patch).await {
            Ok(()) => self.log_activity(action, details).await,
            Err(e) => {
                warn!(
                    item_id = %patch.item_id,
                    error = %e,
                    "Lifecycle PATCH failed; cache is ahead of the store until next reload"
                );
            }
        }
    }

    /// Best-effort audit event; a drop is only worth a debug line.
    async fn log_activity(&self, action: &str, mut details: serde_json::Value) {
        if let Some(obj) = details.as_object_mut() {
            obj.insert("sessionId".into(), json!(self.session_id));
        }
        if let Err(e) = self.api.log_activity(action, details).await {
            debug!(action, error = %e, "Activity event dropped");
        }
    }

    /// Best-effort telemetry; a drop is expected under flaky networks.
    async fn send_sample(&self, sample: DwellSample) {
        if let Err(e) = self.api.track_view(&sample).await {
            debug!(tab = %sample.tab_name, error = %e, "Dwell sample dropped");
        }
    }
}

/// A submission counts as empty when it carries no usable value at any
/// level — the minimum-field rule the save button enforces.
fn submission_is_empty(data: &serde_json::Value) -> bool {
    match data {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        serde_json::Value::Array(items) => items.iter().all(submission_is_empty),
        serde_json::Value::Object(map) => map.values().all(submission_is_empty),
        serde_json::Value::Bool(_) | serde_json::Value::Number(_) => false,
    }
}
