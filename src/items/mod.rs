//! Action-item domain — model, lifecycle transitions, derived views, and
//! the resurfacing sweep.

pub mod lifecycle;
pub mod model;
pub mod resurface;
pub mod views;

pub use lifecycle::TransitionOutcome;
pub use model::{ActionItem, Category, ItemStatus, PauseDuration, Priority};
pub use resurface::ResurfacedSet;
pub use views::{PausedEntry, PriorityBucket};
