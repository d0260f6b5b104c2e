//! Partner dashboard engine — action-item lifecycle, resurfacing, and
//! dwell-time telemetry.

pub mod config;
pub mod datefmt;
pub mod error;
pub mod items;
pub mod session;
pub mod store;
pub mod tracking;

pub use config::DashboardConfig;
pub use error::{Error, Result};
pub use session::DashboardSession;
