//! `DashboardApi` trait — the narrow read/write contract to the action-
//! item store and telemetry endpoints.
//!
//! The store owns persistence, authorization (a request for an item
//! outside the caller's partnership comes back rejected), and evidence
//! file storage. The engine only speaks these six operations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::StoreError;
use crate::items::model::{ActionItem, ItemStatus};
use crate::tracking::DwellSample;

/// Structured payload kinds accepted by the `action-item-data` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Champion,
    Website,
    Buildings,
    Confirmation,
}

/// A lifecycle status write. `paused_reason`/`resurface_at` ride along
/// only when the new status is paused.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPatch {
    pub item_id: String,
    pub status: ItemStatus,
    pub paused_reason: Option<String>,
    pub resurface_at: Option<DateTime<Utc>>,
}

impl ItemPatch {
    /// Patch for a plain status flip (complete / resume).
    pub fn status(item_id: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            item_id: item_id.into(),
            status,
            paused_reason: None,
            resurface_at: None,
        }
    }

    /// Patch for a pause, carrying its deferral metadata.
    pub fn paused(
        item_id: impl Into<String>,
        paused_reason: impl Into<String>,
        resurface_at: DateTime<Utc>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            status: ItemStatus::Paused,
            paused_reason: Some(paused_reason.into()),
            resurface_at: Some(resurface_at),
        }
    }
}

/// A form-driven completion carrying a structured payload.
#[derive(Debug, Clone)]
pub struct ItemDataSubmission {
    pub item_id: String,
    pub data_type: DataType,
    pub data: serde_json::Value,
}

/// An evidence file destined for the upload endpoint.
#[derive(Debug, Clone)]
pub struct EvidenceUpload {
    pub item_id: String,
    /// Local path of the file the visitor picked.
    pub file_path: PathBuf,
    /// Optional storage folder override.
    pub folder: Option<String>,
}

/// Boundary contract to the store and telemetry endpoints.
///
/// Implementations carry the partnership/user scope themselves; callers
/// never pass tenant ids per request.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// Fetch the partnership's full item list (the reload source).
    async fn fetch_items(&self) -> Result<Vec<ActionItem>, StoreError>;

    /// PATCH `action-item` — write a lifecycle transition.
    async fn patch_item(&self, patch: &ItemPatch) -> Result<(), StoreError>;

    /// POST `action-item-data` — form-driven completion. Returns the
    /// store's confirmation message.
    async fn submit_item_data(
        &self,
        submission: &ItemDataSubmission,
    ) -> Result<String, StoreError>;

    /// POST `upload-evidence` — multipart file upload. Returns the
    /// stored file path.
    async fn upload_evidence(&self, upload: &EvidenceUpload) -> Result<String, StoreError>;

    /// POST `log-activity` — fire-and-forget audit event.
    async fn log_activity(
        &self,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// POST `track-view` — emit one dwell sample. Best-effort.
    async fn track_view(&self, sample: &DwellSample) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn data_type_serde_values() {
        assert_eq!(serde_json::to_string(&DataType::Champion).unwrap(), "\"champion\"");
        assert_eq!(serde_json::to_string(&DataType::Buildings).unwrap(), "\"buildings\"");
        let parsed: DataType = serde_json::from_str("\"confirmation\"").unwrap();
        assert_eq!(parsed, DataType::Confirmation);
    }

    #[test]
    fn patch_constructors() {
        let plain = ItemPatch::status("x1", ItemStatus::Completed);
        assert_eq!(plain.status, ItemStatus::Completed);
        assert!(plain.paused_reason.is_none());
        assert!(plain.resurface_at.is_none());

        let at = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let paused = ItemPatch::paused("x1", "2_weeks", at);
        assert_eq!(paused.status, ItemStatus::Paused);
        assert_eq!(paused.paused_reason.as_deref(), Some("2_weeks"));
        assert_eq!(paused.resurface_at, Some(at));
    }
}
