//! Client for the external face model host.
//!
//! The model host owns detection, embedding and matching. This client only
//! ships images to it and returns its JSON answers.

use crate::payload::ImagePayload;
use crate::{http_client, join_segments, parse_base_url, send_json, NetError};
use facecheck_core::types::UploadResponse;
use reqwest::multipart::Form;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Answer of `/retrieve`, which stores a labelled training image.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrieveResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl RetrieveResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// Answer of `/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl HealthStatus {
    pub fn is_ready(&self) -> bool {
        self.status == "ready"
    }
}

#[derive(Clone)]
pub struct ModelHostClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
}

impl ModelHostClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, NetError> {
        Ok(Self {
            http: http_client(timeout)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// Detect and identify every face in an image.
    pub async fn upload(&self, image: &ImagePayload) -> Result<UploadResponse, NetError> {
        let url = join_segments(&self.base_url, &["upload"])?;
        tracing::debug!(file = %image.file_name, bytes = image.bytes.len(), "uploading image");
        let form = Form::new().part("image", image.to_part()?);
        let response: UploadResponse = send_json(self.http.post(url).multipart(form)).await?;
        tracing::info!(
            status = %response.status,
            detections = response.detections.len(),
            "model host upload answered"
        );
        Ok(response)
    }

    /// Verify the single face in an image.
    ///
    /// The answer is returned raw; the check-in workflow validates it.
    pub async fn verify(&self, image: &ImagePayload) -> Result<Value, NetError> {
        let url = join_segments(&self.base_url, &["verify"])?;
        tracing::debug!(file = %image.file_name, "verifying image");
        let form = Form::new().part("image", image.to_part()?);
        send_json(self.http.post(url).multipart(form)).await
    }

    /// Store a labelled image of `customer_name` for training.
    pub async fn retrieve(
        &self,
        image: &ImagePayload,
        customer_name: &str,
    ) -> Result<RetrieveResponse, NetError> {
        let url = join_segments(&self.base_url, &["retrieve"])?;
        tracing::debug!(file = %image.file_name, customer = customer_name, "sending training image");
        let form = Form::new()
            .part("image", image.to_part()?)
            .text("customerName", customer_name.to_string());
        send_json(self.http.post(url).multipart(form)).await
    }

    pub async fn health(&self) -> Result<HealthStatus, NetError> {
        let url = join_segments(&self.base_url, &["health"])?;
        send_json(self.http.get(url)).await
    }
}
