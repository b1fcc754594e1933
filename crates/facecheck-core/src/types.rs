use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a single check-in attempt as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInStatus {
    Success,
    Failed,
}

impl CheckInStatus {
    pub fn from_match(matched: bool) -> Self {
        if matched {
            CheckInStatus::Success
        } else {
            CheckInStatus::Failed
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckInStatus::Success => "success",
            CheckInStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for CheckInStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request body for `POST /api/records`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    #[serde(rename = "recordData")]
    pub record_data: String,
    pub status: CheckInStatus,
}

/// A persisted check-in record. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRecord {
    #[serde(rename = "recordID", default)]
    pub record_id: Option<i64>,
    #[serde(rename = "recordData")]
    pub record_data: String,
    pub status: CheckInStatus,
    #[serde(rename = "createAt", alias = "createdAt", default)]
    pub created_at: Option<String>,
}

/// A dashboard notification. Carries the same text as its check-in record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "notificationID", default)]
    pub notification_id: Option<i64>,
    #[serde(rename = "notificationMessage")]
    pub message: String,
    #[serde(rename = "createAt", alias = "createdAt", default)]
    pub created_at: Option<String>,
}

impl Notification {
    /// Message text without the JSON quoting the backend keeps when it
    /// stores a raw string body.
    pub fn display_message(&self) -> String {
        self.message.replace('"', "")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerID", alias = "customerId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<i64>,
    #[serde(rename = "customerName")]
    pub name: String,
    #[serde(rename = "customerEmail", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "customerAddress", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "customerGender", default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(rename = "customerBirthDay", default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(rename = "createAt", default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(rename = "updateAt", default, skip_serializing)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "taskId", alias = "taskID", default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<i64>,
    #[serde(rename = "taskName", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "taskDesc", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "taskStatus", default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
    #[serde(rename = "estimateHours", default, skip_serializing_if = "Option::is_none")]
    pub estimate_hours: Option<f64>,
    #[serde(rename = "logHours", default, skip_serializing_if = "Option::is_none")]
    pub log_hours: Option<f64>,
    #[serde(rename = "createAt", default, skip_serializing)]
    pub created_at: Option<String>,
    #[serde(rename = "updateAt", default, skip_serializing)]
    pub updated_at: Option<String>,
}

/// One page of a paged backend query.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub content: Vec<T>,
    #[serde(rename = "totalPages", default)]
    pub total_pages: u32,
    #[serde(rename = "totalElements", default)]
    pub total_elements: u64,
    /// Zero-based index of this page.
    #[serde(default)]
    pub number: u32,
}

/// Response of the model host's `/upload` endpoint.
///
/// Detections stay as raw JSON so each one can be validated on its own;
/// one malformed detection must not discard the rest of the batch.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detections: Vec<Value>,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
