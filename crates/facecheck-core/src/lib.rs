//! facecheck-core — Check-in decision workflow for face-recognition attendance.
//!
//! Turns detection results from the external model host into check-in
//! records and notifications on the backend, then looks up the tasks of
//! every matched customer in one batched query. Network access goes
//! through the [`Backend`] trait; the HTTP implementation lives in
//! `facecheck-net`.

pub mod backend;
#[cfg(test)]
mod fake;
pub mod detection;
pub mod listing;
pub mod tasks;
pub mod time;
pub mod types;
pub mod workflow;

pub use backend::{Backend, BackendError};
pub use detection::{Detection, DetectionError};
pub use listing::{Listing, PageCursor};
pub use tasks::TaskLookup;
pub use types::{CheckInRecord, CheckInStatus, Customer, NewRecord, Notification, Page, Task};
pub use workflow::{BatchOutcome, CheckInError, CheckInOutcome, CheckInWorkflow, Clock, LocalClock};
