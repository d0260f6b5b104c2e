//! HTTP implementation of [`DashboardApi`].
//!
//! Plain request/response JSON over a shared `reqwest::Client`; the
//! evidence upload is multipart. Non-success responses of every kind
//! (including authorization rejections) map to `StoreError::Rejected` —
//! callers decide whether that is a toast or a logged no-op.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;

use crate::config::DashboardConfig;
use crate::error::StoreError;
use crate::items::model::ActionItem;
use crate::store::traits::{
    DashboardApi, EvidenceUpload, ItemDataSubmission, ItemPatch,
};
use crate::tracking::DwellSample;

/// Response of the `action-item` PATCH.
#[derive(Debug, Deserialize)]
struct OkResponse {
    ok: bool,
}

/// Response of the `action-item-data` POST.
#[derive(Debug, Deserialize)]
struct SubmitResponse {
    success: bool,
    #[serde(default)]
    message: String,
}

/// Response of the `upload-evidence` POST.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    #[serde(default)]
    file_path: Option<String>,
}

/// `DashboardApi` over HTTP.
pub struct HttpApi {
    config: DashboardConfig,
    client: reqwest::Client,
}

impl HttpApi {
    /// Build a client scoped to one partnership/user pair.
    pub fn new(config: DashboardConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| StoreError::Http {
                endpoint: "client".into(),
                reason: e.to_string(),
            })?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base_url.trim_end_matches('/'))
    }

    fn patch_body(&self, patch: &ItemPatch) -> serde_json::Value {
        let mut body = json!({
            "itemId": patch.item_id,
            "status": patch.status,
            "userId": self.config.user_id,
            "partnershipId": self.config.partnership_id,
        });
        if let Some(reason) = &patch.paused_reason {
            body["pausedReason"] = json!(reason);
        }
        if let Some(at) = patch.resurface_at {
            body["resurfaceAt"] = json!(at);
        }
        body
    }

    fn submit_body(&self, submission: &ItemDataSubmission) -> serde_json::Value {
        json!({
            "partnershipId": self.config.partnership_id,
            "actionItemId": submission.item_id,
            "userId": self.config.user_id,
            "dataType": submission.data_type,
            "data": submission.data,
        })
    }

    fn activity_body(&self, action: &str, details: serde_json::Value) -> serde_json::Value {
        json!({
            "partnershipId": self.config.partnership_id,
            "userId": self.config.user_id,
            "action": action,
            "details": details,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, StoreError> {
        let resp = self
            .client
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|e| StoreError::Http {
                endpoint: path.into(),
                reason: e.to_string(),
            })?;
        check_status(path, resp).await
    }
}

/// Map a non-2xx response to `Rejected`, keeping the body for the log.
async fn check_status(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, StoreError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        endpoint: endpoint.into(),
        message: format!("{status}: {body}"),
    })
}

#[async_trait]
impl DashboardApi for HttpApi {
    async fn fetch_items(&self) -> Result<Vec<ActionItem>, StoreError> {
        let resp = self
            .client
            .get(self.endpoint("action-items"))
            .query(&[("partnershipId", self.config.partnership_id.as_str())])
            .send()
            .await
            .map_err(|e| StoreError::Http {
                endpoint: "action-items".into(),
                reason: e.to_string(),
            })?;

        let resp = check_status("action-items", resp).await?;
        resp.json::<Vec<ActionItem>>()
            .await
            .map_err(|e| StoreError::InvalidResponse {
                endpoint: "action-items".into(),
                reason: e.to_string(),
            })
    }

    async fn patch_item(&self, patch: &ItemPatch) -> Result<(), StoreError> {
        let resp = self
            .client
            .patch(self.endpoint("action-item"))
            .json(&self.patch_body(patch))
            .send()
            .await
            .map_err(|e| StoreError::Http {
                endpoint: "action-item".into(),
                reason: e.to_string(),
            })?;

        let resp = check_status("action-item", resp).await?;
        let body: OkResponse =
            resp.json().await.map_err(|e| StoreError::InvalidResponse {
                endpoint: "action-item".into(),
                reason: e.to_string(),
            })?;

        if !body.ok {
            return Err(StoreError::Rejected {
                endpoint: "action-item".into(),
                message: "store returned ok: false".into(),
            });
        }
        Ok(())
    }

    async fn submit_item_data(
        &self,
        submission: &ItemDataSubmission,
    ) -> Result<String, StoreError> {
        let resp = self
            .post_json("action-item-data", &self.submit_body(submission))
            .await?;

        let body: SubmitResponse =
            resp.json().await.map_err(|e| StoreError::InvalidResponse {
                endpoint: "action-item-data".into(),
                reason: e.to_string(),
            })?;

        if !body.success {
            return Err(StoreError::Rejected {
                endpoint: "action-item-data".into(),
                message: body.message,
            });
        }
        Ok(body.message)
    }

    async fn upload_evidence(&self, upload: &EvidenceUpload) -> Result<String, StoreError> {
        let file_name = upload
            .file_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("evidence")
            .to_string();

        let bytes = tokio::fs::read(&upload.file_path).await?;

        let mut form = Form::new()
            .text("partnershipId", self.config.partnership_id.clone())
            .text("itemId", upload.item_id.clone())
            .text("userId", self.config.user_id.clone())
            .part("file", Part::bytes(bytes).file_name(file_name));

        if let Some(folder) = &upload.folder {
            form = form.text("folder", folder.clone());
        }

        let resp = self
            .client
            .post(self.endpoint("upload-evidence"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Http {
                endpoint: "upload-evidence".into(),
                reason: e.to_string(),
            })?;

        let resp = check_status("upload-evidence", resp).await?;
        let body: UploadResponse =
            resp.json().await.map_err(|e| StoreError::InvalidResponse {
                endpoint: "upload-evidence".into(),
                reason: e.to_string(),
            })?;

        if !body.success {
            return Err(StoreError::Rejected {
                endpoint: "upload-evidence".into(),
                message: "store returned success: false".into(),
            });
        }

        body.file_path.ok_or_else(|| StoreError::InvalidResponse {
            endpoint: "upload-evidence".into(),
            reason: "missing filePath in response".into(),
        })
    }

    async fn log_activity(
        &self,
        action: &str,
        details: serde_json::Value,
    ) -> Result<(), StoreError> {
        self.post_json("log-activity", &self.activity_body(action, details))
            .await?;
        Ok(())
    }

    async fn track_view(&self, sample: &DwellSample) -> Result<(), StoreError> {
        let body = serde_json::to_value(sample).map_err(|e| StoreError::InvalidResponse {
            endpoint: "track-view".into(),
            reason: e.to_string(),
        })?;
        self.post_json("track-view", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::model::ItemStatus;
    use crate::store::traits::DataType;
    use chrono::{TimeZone, Utc};

    fn api() -> HttpApi {
        HttpApi::new(DashboardConfig::new("https://api.example.com/", "p1", "u1")).unwrap()
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let api = api();
        assert_eq!(api.endpoint("action-item"), "https://api.example.com/action-item");
    }

    #[test]
    fn patch_body_omits_pause_fields_on_plain_flip() {
        let api = api();
        let body = api.patch_body(&ItemPatch::status("x1", ItemStatus::Completed));

        assert_eq!(body["itemId"], "x1");
        assert_eq!(body["status"], "completed");
        assert_eq!(body["userId"], "u1");
        assert_eq!(body["partnershipId"], "p1");
        assert!(body.get("pausedReason").is_none());
        assert!(body.get("resurfaceAt").is_none());
    }

    #[test]
    fn patch_body_carries_pause_metadata() {
        let api = api();
        let at = Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap();
        let body = api.patch_body(&ItemPatch::paused("x1", "2_weeks", at));

        assert_eq!(body["status"], "paused");
        assert_eq!(body["pausedReason"], "2_weeks");
        assert_eq!(body["resurfaceAt"], "2025-03-03T09:00:00Z");
    }

    #[test]
    fn submit_body_shape() {
        let api = api();
        let body = api.submit_body(&ItemDataSubmission {
            item_id: "x1".into(),
            data_type: DataType::Champion,
            data: serde_json::json!({"name": "Dana", "email": "dana@example.org"}),
        });

        assert_eq!(body["actionItemId"], "x1");
        assert_eq!(body["dataType"], "champion");
        assert_eq!(body["data"]["name"], "Dana");
        assert_eq!(body["partnershipId"], "p1");
    }

    #[test]
    fn activity_body_shape() {
        let api = api();
        let body = api.activity_body(
            "action_item_resurfaced",
            serde_json::json!({"itemId": "x1"}),
        );
        assert_eq!(body["action"], "action_item_resurfaced");
        assert_eq!(body["details"]["itemId"], "x1");
        assert_eq!(body["userId"], "u1");
    }
}
