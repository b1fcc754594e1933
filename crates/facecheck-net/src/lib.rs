//! facecheck-net — HTTP clients for the check-in backend and the face model host.
//!
//! [`RestBackend`] implements `facecheck_core::Backend` on top of the
//! backend's REST API; [`ModelHostClient`] sends images to the external
//! detection service.

pub mod backend;
pub mod error;
pub mod model_host;
pub mod payload;

pub use backend::RestBackend;
pub use error::NetError;
pub use model_host::{HealthStatus, ModelHostClient, RetrieveResponse};
pub use payload::ImagePayload;

use std::time::Duration;

const USER_AGENT: &str = concat!("facecheck/", env!("CARGO_PKG_VERSION"));

fn http_client(timeout: Duration) -> Result<reqwest::Client, NetError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| NetError::Network(e.to_string()))
}

/// Parse a service base URL. A trailing slash is optional.
fn parse_base_url(raw: &str) -> Result<reqwest::Url, NetError> {
    let url = reqwest::Url::parse(raw).map_err(|e| NetError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(NetError::InvalidUrl(format!("{raw}: not a base URL")));
    }
    Ok(url)
}

/// Append path segments to `base`, percent-encoding each one.
fn join_segments(base: &reqwest::Url, segments: &[&str]) -> Result<reqwest::Url, NetError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| NetError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Send a request and decode a JSON body from a 2xx response.
async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, NetError> {
    let response = request
        .send()
        .await
        .map_err(|e| NetError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(NetError::Http {
            status: status.as_u16(),
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| NetError::Decode(e.to_string()))
}
