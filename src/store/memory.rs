//! In-memory implementation of [`DashboardApi`].
//!
//! Backs the test suite and any embedder running without a store. Every
//! write is recorded for assertion, and individual operations can be
//! switched to fail to exercise the engine's degrade-don't-die paths.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::items::model::{ActionItem, ItemStatus};
use crate::store::traits::{
    DashboardApi, EvidenceUpload, ItemDataSubmission, ItemPatch,
};
use crate::tracking::DwellSample;

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailOp {
    Fetch,
    Patch,
    Submit,
    Upload,
    Log,
    Track,
}

impl FailOp {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Fetch => "action-items",
            Self::Patch => "action-item",
            Self::Submit => "action-item-data",
            Self::Upload => "upload-evidence",
            Self::Log => "log-activity",
            Self::Track => "track-view",
        }
    }
}

#[derive(Default)]
struct MemoryState {
    items: Vec<ActionItem>,
    patches: Vec<ItemPatch>,
    submissions: Vec<ItemDataSubmission>,
    uploads: Vec<EvidenceUpload>,
    activity: Vec<(String, serde_json::Value)>,
    samples: Vec<DwellSample>,
    failing: HashSet<FailOp>,
}

/// `DashboardApi` over process memory.
#[derive(Default)]
pub struct MemoryApi {
    state: Mutex<MemoryState>,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a partnership's items.
    pub fn with_items(items: Vec<ActionItem>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                items,
                ..MemoryState::default()
            }),
        }
    }

    /// Toggle failure injection for one operation.
    pub async fn set_failing(&self, op: FailOp, failing: bool) {
        let mut state = self.state.lock().await;
        if failing {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    /// Snapshot of the stored items.
    pub async fn items(&self) -> Vec<ActionItem> {
        self.state.lock().await.items.clone()
    }

    /// Every PATCH received, in order.
    pub async fn patches(&self) -> Vec<ItemPatch> {
        self.state.lock().await.patches.clone()
    }

    /// Every structured submission received.
    pub async fn submissions(&self) -> Vec<ItemDataSubmission> {
        self.state.lock().await.submissions.clone()
    }

    /// Every upload received.
    pub async fn uploads(&self) -> Vec<EvidenceUpload> {
        self.state.lock().await.uploads.clone()
    }

    /// Every audit event received, as (action, details) pairs.
    pub async fn activity(&self) -> Vec<(String, serde_json::Value)> {
        self.state.lock().await.activity.clone()
    }

    /// Every dwell sample received.
    pub async fn samples(&self) -> Vec<DwellSample> {
        self.state.lock().await.samples.clone()
    }

    fn fail_if_injected(state: &MemoryState, op: FailOp) -> Result<(), StoreError> {
        if state.failing.contains(&op) {
            return Err(StoreError::Http {
                endpoint: op.endpoint().into(),
                reason: "injected failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DashboardApi for MemoryApi {
    async fn fetch_items(&self) -> Result<Vec<ActionItem>, StoreError> {
        let state = self.state.lock().await;
        Self::fail_if_injected(&state, FailOp::Fetch)?;
        Ok(state.items.clone())
    }

    async fn patch_item(&self, patch: &ItemPatch) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        Self::fail_if_injected(&state, FailOp::Patch)?;

        let Some(item) = state.items.iter_mut().find(|i| i.id == patch.item_id) else {
            // Unknown id doubles as the ownership rejection the real
            // store layer enforces.
            return Err(StoreError::Rejected {
                endpoint: "action-item".into(),
                message: format!("no such item {} in partnership", patch.item_id),
            });
        };

        item.status = patch.status;
        match patch.status {
            ItemStatus::Completed => {
                item.completed_at = Some(Utc::now());
                item.paused_at = None;
                item.paused_reason = None;
                item.resurface_at = None;
            }
            ItemStatus::Paused => {
                item.completed_at = None;
                item.paused_at = Some(Utc::now());
                item.paused_reason = patch.paused_reason.clone();
                item.resurface_at = patch.resurface_at;
            }
            ItemStatus::Pending => {
                item.completed_at = None;
                item.paused_at = None;
                item.paused_reason = None;
                item.resurface_at = None;
            }
        }

        state.patches.push(patch.clone());
        Ok(())
    }

    async fn submit_item_data(
        &self,
        submission: &ItemDataSubmission,
    ) -> Result<String, StoreError> {
        let mut state = self.state.lock().await;
        Self::fail_if_injected(&state, FailOp::Submit)?;
        state.submissions.push(submission.clone());
        Ok("Saved".to_string())
    }

    async fn upload_evidence(&self, upload: &EvidenceUpload) -> Result<String, StoreError> {
        let mut state = self.state.lock().await;
        Self::fail_if_injected(&state, FailOp::Upload)?;

        let file_name = upload
            .file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("evidence")
            .to_string();
        let folder = upload.folder.as_deref().unwrap_or("uploads");
        let stored = format!("{folder}/{file_name}");

        state.uploads.push(upload.clone());
        Ok(stored)
    }

    async fn log_activity(
        &self,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        Self::fail_if_injected(&state, FailOp::Log)?;
        state.activity.push((action.to_string(), details));
        Ok(())
    }

    async fn track_view(&self, sample: &DwellSample) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        Self::fail_if_injected(&state, FailOp::Track)?;
        state.samples.push(sample.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::model::{Category, Priority};

    fn seed() -> Vec<ActionItem> {
        vec![ActionItem::new("x1", "T", Category::Onboarding, Priority::High)]
    }

    #[tokio::test]
    async fn patch_updates_stored_item() {
        let api = MemoryApi::with_items(seed());
        api.patch_item(&ItemPatch::status("x1", ItemStatus::Completed))
            .await
            .unwrap();

        let items = api.items().await;
        assert_eq!(items[0].status, ItemStatus::Completed);
        assert!(items[0].completed_at.is_some());
        assert_eq!(api.patches().await.len(), 1);
    }

    #[tokio::test]
    async fn patch_unknown_item_is_rejected() {
        let api = MemoryApi::with_items(seed());
        let err = api
            .patch_item(&ItemPatch::status("other", ItemStatus::Completed))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { .. }));
    }

    #[tokio::test]
    async fn injected_failure_surfaces_as_http_error() {
        let api = MemoryApi::with_items(seed());
        api.set_failing(FailOp::Track, true).await;

        let sample = DwellSample {
            partnership_id: "p1".into(),
            user_id: "u1".into(),
            tab_name: "overview".into(),
            duration_seconds: 3,
        };
        assert!(matches!(
            api.track_view(&sample).await.unwrap_err(),
            StoreError::Http { .. }
        ));

        api.set_failing(FailOp::Track, false).await;
        api.track_view(&sample).await.unwrap();
        assert_eq!(api.samples().await.len(), 1);
    }

    #[tokio::test]
    async fn upload_returns_stored_path() {
        let api = MemoryApi::with_items(seed());
        let stored = api
            .upload_evidence(&EvidenceUpload {
                item_id: "x1".into(),
                file_path: "/tmp/roster.pdf".into(),
                folder: Some("partnerships/p1".into()),
            })
            .await
            .unwrap();
        assert_eq!(stored, "partnerships/p1/roster.pdf");
    }
}
