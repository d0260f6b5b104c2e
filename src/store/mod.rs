//! Boundary to the action-item store and telemetry endpoints.

pub mod http;
pub mod memory;
pub mod traits;

pub use http::HttpApi;
pub use memory::{FailOp, MemoryApi};
pub use traits::{
    DashboardApi, DataType, EvidenceUpload, ItemDataSubmission, ItemPatch,
};
