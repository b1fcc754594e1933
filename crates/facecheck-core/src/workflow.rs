//! Check-in decision and recording workflow.
//!
//! Each detection produces exactly one record-create call followed by
//! exactly one notification-create call, whatever the match outcome.
//! Persistence failures are logged and reported in the outcome; they are
//! never retried and a created record is never rolled back.

use crate::backend::{Backend, BackendError};
use crate::detection::{Detection, DetectionError};
use crate::tasks::{self, TaskLookup};
use crate::types::{CheckInStatus, NewRecord, UploadResponse};
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckInError {
    #[error("invalid detection: {0}")]
    InvalidInput(#[from] DetectionError),
    #[error("model host reported failure: {0}")]
    ModelHost(String),
}

/// Source of the calendar date stamped into check-in messages.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The machine's local calendar date.
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Which persistence call failed for a detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistStep {
    Record,
    Notification,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersistFailure {
    pub step: PersistStep,
    pub error: BackendError,
}

/// Result of evaluating and recording one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckInOutcome {
    pub detection: Detection,
    pub message: String,
    pub status: CheckInStatus,
    /// Persistence calls that failed. Empty when both calls succeeded.
    pub failures: Vec<PersistFailure>,
}

impl CheckInOutcome {
    /// Whether the detected person matched a known customer.
    pub fn matched(&self) -> bool {
        self.detection.is_same_person
    }

    pub fn person_name(&self) -> &str {
        &self.detection.person_name
    }

    pub fn is_persisted(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A detection that failed validation and was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedDetection {
    /// Position of the detection in the model host response.
    pub index: usize,
    pub error: DetectionError,
}

/// Result of processing every detection from one model-host response.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub outcomes: Vec<CheckInOutcome>,
    pub rejected: Vec<RejectedDetection>,
    pub tasks: TaskLookup,
}

impl BatchOutcome {
    /// Names of matched people, de-duplicated in first-seen order.
    pub fn matched_names(&self) -> Vec<String> {
        tasks::dedup_names(
            self.outcomes
                .iter()
                .filter(|o| o.matched())
                .map(|o| o.person_name().to_string()),
        )
    }
}

/// Compose the check-in message and status for one detection.
pub fn compose_message(detection: &Detection, date: NaiveDate) -> (String, CheckInStatus) {
    let date = date.format("%Y-%m-%d");
    let status = CheckInStatus::from_match(detection.is_same_person);
    let message = match status {
        CheckInStatus::Success => format!("{} has checked in at {date}", detection.person_name),
        CheckInStatus::Failed => {
            format!("{} has failed to check in at {date}", detection.person_name)
        }
    };
    (message, status)
}

/// Drives record and notification creation for model-host detections.
pub struct CheckInWorkflow<B, C = LocalClock> {
    backend: B,
    clock: C,
}

impl<B: Backend> CheckInWorkflow<B, LocalClock> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            clock: LocalClock,
        }
    }
}

impl<B: Backend, C: Clock> CheckInWorkflow<B, C> {
    pub fn with_clock(backend: B, clock: C) -> Self {
        Self { backend, clock }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Validate a raw detection, then record it.
    ///
    /// Fails with [`CheckInError::InvalidInput`] before any network call if
    /// the detection is malformed.
    pub async fn check_in(&self, raw: &Value) -> Result<CheckInOutcome, CheckInError> {
        let detection = Detection::from_value(raw)?;
        Ok(self.record(detection).await)
    }

    /// Create the record and then the notification for a detection.
    pub async fn record(&self, detection: Detection) -> CheckInOutcome {
        let (message, status) = compose_message(&detection, self.clock.today());

        if detection.is_same_person {
            tracing::info!(
                person = %detection.person_name,
                similarity = detection.similarity,
                "valid person"
            );
        } else {
            tracing::info!(
                person = %detection.person_name,
                similarity = detection.similarity,
                "invalid person"
            );
        }

        let mut failures = Vec::new();

        let record = NewRecord {
            record_data: message.clone(),
            status,
        };
        match self.backend.create_record(&record).await {
            Ok(true) => tracing::debug!(%status, "record created"),
            Ok(false) => tracing::warn!(%status, "backend did not acknowledge record"),
            Err(err) => {
                tracing::error!(error = %err, %status, "record creation failed");
                failures.push(PersistFailure {
                    step: PersistStep::Record,
                    error: err,
                });
            }
        }

        match self.backend.create_notification(&message).await {
            Ok(true) => tracing::debug!("notification created"),
            Ok(false) => tracing::warn!("backend did not acknowledge notification"),
            Err(err) => {
                tracing::error!(error = %err, "notification creation failed");
                failures.push(PersistFailure {
                    step: PersistStep::Notification,
                    error: err,
                });
            }
        }

        CheckInOutcome {
            detection,
            message,
            status,
            failures,
        }
    }

    /// Process every detection of an `/upload` response, then look up the
    /// tasks of all matched people with a single request.
    ///
    /// A failed upload short-circuits with no backend calls. A malformed
    /// detection is skipped without affecting the others.
    pub async fn process_upload(
        &self,
        upload: &UploadResponse,
    ) -> Result<BatchOutcome, CheckInError> {
        if !upload.is_success() {
            let reason = upload
                .message
                .clone()
                .unwrap_or_else(|| format!("status {}", upload.status));
            return Err(CheckInError::ModelHost(reason));
        }

        tracing::info!(count = upload.detections.len(), "processing detections");

        let mut outcomes = Vec::with_capacity(upload.detections.len());
        let mut rejected = Vec::new();

        for (index, raw) in upload.detections.iter().enumerate() {
            match Detection::from_value(raw) {
                Ok(detection) => outcomes.push(self.record(detection).await),
                Err(error) => {
                    tracing::warn!(index, error = %error, "skipping malformed detection");
                    rejected.push(RejectedDetection { index, error });
                }
            }
        }

        let mut batch = BatchOutcome {
            outcomes,
            rejected,
            tasks: TaskLookup::Skipped,
        };
        batch.tasks = tasks::lookup_tasks(&self.backend, &batch.matched_names()).await;
        Ok(batch)
    }

    /// Process a `/verify` response, which carries a single detection's
    /// fields next to its `status`.
    pub async fn process_verify(&self, response: &Value) -> Result<BatchOutcome, CheckInError> {
        if response.is_object() {
            let status = response.get("status").and_then(Value::as_str);
            if status != Some("success") {
                let reason = response
                    .get("message")
                    .or_else(|| response.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("status {}", status.unwrap_or("missing")));
                return Err(CheckInError::ModelHost(reason));
            }
        }
        let detection = Detection::from_value(response)?;

        let outcome = self.record(detection).await;
        let mut batch = BatchOutcome {
            outcomes: vec![outcome],
            rejected: Vec::new(),
            tasks: TaskLookup::Skipped,
        };
        batch.tasks = tasks::lookup_tasks(&self.backend, &batch.matched_names()).await;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{Call, FakeBackend};
    use serde_json::json;

    fn jan15() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    fn workflow(backend: FakeBackend) -> CheckInWorkflow<FakeBackend, FixedClock> {
        CheckInWorkflow::with_clock(backend, jan15())
    }

    fn upload(detections: Vec<Value>) -> UploadResponse {
        UploadResponse {
            status: "success".into(),
            message: None,
            detections,
        }
    }

    #[tokio::test]
    async fn test_matched_detection_records_success() {
        let wf = workflow(FakeBackend::default());
        let outcome = wf
            .check_in(&json!({"is_same_person": true, "person_name": "Alice"}))
            .await
            .unwrap();

        assert!(outcome.matched());
        assert_eq!(outcome.status, CheckInStatus::Success);
        assert_eq!(outcome.message, "Alice has checked in at 2024-01-15");
        assert_eq!(
            wf.backend().calls(),
            vec![
                Call::Record(NewRecord {
                    record_data: "Alice has checked in at 2024-01-15".into(),
                    status: CheckInStatus::Success,
                }),
                Call::Notification("Alice has checked in at 2024-01-15".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_detection_records_unknown_failure() {
        let wf = workflow(FakeBackend::default());
        let outcome = wf.check_in(&json!({})).await.unwrap();

        assert!(!outcome.matched());
        assert_eq!(outcome.status, CheckInStatus::Failed);
        assert_eq!(outcome.message, "Unknown has failed to check in at 2024-01-15");
        assert_eq!(wf.backend().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unmatched_detection_records_failure() {
        let wf = workflow(FakeBackend::default());
        let outcome = wf
            .check_in(&json!({"is_same_person": false, "person_name": "Mallory", "similarity": 0.2}))
            .await
            .unwrap();
        assert_eq!(outcome.status, CheckInStatus::Failed);
        assert!(outcome.message.ends_with("has failed to check in at 2024-01-15"));
    }

    #[tokio::test]
    async fn test_null_detection_makes_no_calls() {
        let wf = workflow(FakeBackend::default());
        let err = wf.check_in(&Value::Null).await.unwrap_err();
        assert!(matches!(err, CheckInError::InvalidInput(DetectionError::NotAnObject(_))));
        assert!(wf.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_record_and_notification_share_message() {
        let wf = workflow(FakeBackend::default());
        for raw in [
            json!({"is_same_person": true, "person_name": "Alice"}),
            json!({"is_same_person": false, "person_name": "Bob"}),
            json!({}),
        ] {
            wf.check_in(&raw).await.unwrap();
        }

        let calls = wf.backend().calls();
        assert_eq!(calls.len(), 6);
        for pair in calls.chunks(2) {
            match pair {
                [Call::Record(record), Call::Notification(message)] => {
                    assert_eq!(&record.record_data, message);
                    let expected = if message.contains("has checked in") {
                        CheckInStatus::Success
                    } else {
                        CheckInStatus::Failed
                    };
                    assert_eq!(record.status, expected);
                }
                other => panic!("expected record then notification, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_notification_sent_when_record_fails() {
        let wf = workflow(FakeBackend::default().failing_records());
        let outcome = wf
            .check_in(&json!({"is_same_person": true, "person_name": "Alice"}))
            .await
            .unwrap();

        assert!(!outcome.is_persisted());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].step, PersistStep::Record);
        assert!(matches!(
            wf.backend().calls().last(),
            Some(Call::Notification(_))
        ));
    }

    #[tokio::test]
    async fn test_record_kept_when_notification_fails() {
        let wf = workflow(FakeBackend::default().failing_notifications());
        let outcome = wf.check_in(&json!({"person_name": "Bob"})).await.unwrap();

        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].step, PersistStep::Notification);
        // No retry and no compensating delete.
        assert_eq!(wf.backend().calls().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_makes_one_task_lookup() {
        let wf = workflow(FakeBackend::default());
        let batch = wf
            .process_upload(&upload(vec![
                json!({"is_same_person": true, "person_name": "Alice", "bbox": [0, 0, 10, 10], "confidence": 0.9}),
                json!({"is_same_person": false, "person_name": "Mallory"}),
                json!({"is_same_person": true, "person_name": "Bob"}),
            ]))
            .await
            .unwrap();

        assert_eq!(batch.outcomes.len(), 3);
        assert_eq!(batch.matched_names(), vec!["Alice", "Bob"]);

        let lookups: Vec<_> = wf
            .backend()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::Tasks(_)))
            .collect();
        assert_eq!(lookups, vec![Call::Tasks(vec!["Alice".into(), "Bob".into()])]);
        assert_eq!(batch.tasks, TaskLookup::NoTasks);
    }

    #[tokio::test]
    async fn test_batch_lookup_deduplicates_names() {
        let wf = workflow(FakeBackend::default());
        wf.process_upload(&upload(vec![
            json!({"is_same_person": true, "person_name": "Alice"}),
            json!({"is_same_person": true, "person_name": "Alice"}),
        ]))
        .await
        .unwrap();

        let calls = wf.backend().calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[4], Call::Tasks(vec!["Alice".into()]));
    }

    #[tokio::test]
    async fn test_batch_without_matches_skips_lookup() {
        let wf = workflow(FakeBackend::default());
        let batch = wf
            .process_upload(&upload(vec![json!({"person_name": "Mallory"})]))
            .await
            .unwrap();
        assert_eq!(batch.tasks, TaskLookup::Skipped);
        assert!(!wf
            .backend()
            .calls()
            .iter()
            .any(|c| matches!(c, Call::Tasks(_))));
    }

    #[tokio::test]
    async fn test_batch_skips_malformed_detection() {
        let wf = workflow(FakeBackend::default());
        let batch = wf
            .process_upload(&upload(vec![
                Value::Null,
                json!({"is_same_person": true, "person_name": "Alice"}),
            ]))
            .await
            .unwrap();

        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].index, 0);
        assert_eq!(batch.outcomes.len(), 1);
        assert_eq!(wf.backend().calls().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_upload_short_circuits() {
        let wf = workflow(FakeBackend::default());
        let err = wf
            .process_upload(&UploadResponse {
                status: "error".into(),
                message: Some("no face".into()),
                detections: vec![json!({"is_same_person": true, "person_name": "Alice"})],
            })
            .await
            .unwrap_err();

        assert_eq!(err, CheckInError::ModelHost("no face".into()));
        assert!(wf.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_verify_matched_looks_up_tasks() {
        let wf = workflow(FakeBackend::default());
        let batch = wf
            .process_verify(&json!({
                "status": "success",
                "is_same_person": true,
                "similarity": 0.77,
                "person_name": "Alice"
            }))
            .await
            .unwrap();

        assert_eq!(batch.outcomes[0].message, "Alice has checked in at 2024-01-15");
        assert_eq!(
            wf.backend().calls().last(),
            Some(&Call::Tasks(vec!["Alice".into()]))
        );
    }

    #[tokio::test]
    async fn test_verify_failure_status_short_circuits() {
        let wf = workflow(FakeBackend::default());
        let err = wf
            .process_verify(&json!({"status": "error", "error": "model not loaded"}))
            .await
            .unwrap_err();
        assert_eq!(err, CheckInError::ModelHost("model not loaded".into()));
        assert!(wf.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_verify_null_is_invalid_input() {
        let wf = workflow(FakeBackend::default());
        let err = wf.process_verify(&Value::Null).await.unwrap_err();
        assert!(matches!(err, CheckInError::InvalidInput(_)));
        assert!(wf.backend().calls().is_empty());
    }

    #[test]
    fn test_compose_message_pads_date() {
        let detection = Detection::from_value(&json!({"is_same_person": true, "person_name": "Eve"})).unwrap();
        let (message, status) =
            compose_message(&detection, NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        assert_eq!(message, "Eve has checked in at 2025-03-07");
        assert_eq!(status, CheckInStatus::Success);
    }

    #[test]
    fn test_local_clock_matches_chrono_local() {
        let today = LocalClock.today();
        let now = chrono::Local::now().date_naive();
        assert!((now - today).num_days().abs() <= 1);
    }
}
