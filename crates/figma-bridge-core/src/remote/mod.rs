//! Authenticated access to the Figma REST API.
//!
//! `ApiTransport` is the blocking seam ("GET this endpoint, give me JSON");
//! `RemoteClient` runs it off the async executor and deserializes the payload
//! into the caller's type. Every failure is normalized into `RemoteError`.

mod curl_transport;
mod error;
mod parse;

use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

pub use curl_transport::CurlTransport;
pub use error::RemoteError;

/// Credential supplied by the caller. Never obtained or refreshed here.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Personal access token (`X-Figma-Token`).
    ApiKey(String),
    /// OAuth access token (`Authorization: Bearer`).
    OAuth(String),
}

impl Credentials {
    pub(crate) fn secret(&self) -> &str {
        match self {
            Credentials::ApiKey(s) | Credentials::OAuth(s) => s,
        }
    }

    /// The header line carrying this credential.
    pub(crate) fn header(&self) -> String {
        match self {
            Credentials::ApiKey(key) => format!("X-Figma-Token: {}", key),
            Credentials::OAuth(token) => format!("Authorization: Bearer {}", token),
        }
    }
}

// Keep tokens out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Credentials::OAuth(_) => f.write_str("OAuth(<redacted>)"),
        }
    }
}

/// Percent-encodes a caller-supplied id (file key, node id) for an endpoint path or query.
pub fn encode_component(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}

/// Issues an authenticated GET against the API and returns the JSON body.
///
/// Blocking; `RemoteClient` calls it from `spawn_blocking`.
pub trait ApiTransport: Send + Sync {
    /// `endpoint` is a path relative to the API base URL, starting with `/`.
    fn get_json(&self, endpoint: &str) -> Result<serde_json::Value, RemoteError>;
}

/// Typed, async front of an `ApiTransport`. Cheap to clone.
#[derive(Clone)]
pub struct RemoteClient {
    transport: Arc<dyn ApiTransport>,
}

impl RemoteClient {
    pub fn new(transport: Arc<dyn ApiTransport>) -> Self {
        Self { transport }
    }

    /// GET `endpoint` and deserialize the body as `T`. No retries.
    pub async fn request<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, RemoteError> {
        tracing::debug!(endpoint, "figma api request");

        let value = tokio::task::spawn_blocking({
            let transport = Arc::clone(&self.transport);
            let endpoint = endpoint.to_string();
            move || transport.get_json(&endpoint)
        })
        .await
        .map_err(|e| RemoteError::transport(endpoint, format!("request task join: {}", e)))??;

        serde_json::from_value(value).map_err(|e| {
            RemoteError::transport(endpoint, format!("unexpected response shape: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeApi;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[tokio::test]
    async fn request_deserializes_payload() {
        let api = FakeApi::new().respond("/files/ABC", json!({ "name": "Landing" }));
        let client = api.client();
        let named: Named = client.request("/files/ABC").await.unwrap();
        assert_eq!(named.name, "Landing");
        assert_eq!(api.calls(), vec!["/files/ABC".to_string()]);
    }

    #[tokio::test]
    async fn request_shape_mismatch_is_transport_error() {
        let api = FakeApi::new().respond("/files/ABC", json!({ "title": 3 }));
        let client = api.client();
        let err = client.request::<Named>("/files/ABC").await.unwrap_err();
        assert!(matches!(err, RemoteError::Transport { .. }));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn request_passes_status_errors_through() {
        let api = FakeApi::new().fail("/files/ABC", RemoteError::status("/files/ABC", 403, "Invalid token"));
        let client = api.client();
        let err = client.request::<Named>("/files/ABC").await.unwrap_err();
        assert_eq!(err.status_code(), Some(403));
        assert!(err.to_string().contains("Invalid token"));
    }

    #[test]
    fn encode_component_escapes_reserved_chars() {
        assert_eq!(encode_component("ABC123"), "ABC123");
        assert_eq!(encode_component("1:2"), "1%3A2");
        assert_eq!(encode_component("a&b?c#d/e"), "a%26b%3Fc%23d%2Fe");
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials::ApiKey("figd_secret".to_string());
        assert!(!format!("{:?}", creds).contains("figd_secret"));
        assert_eq!(creds.header(), "X-Figma-Token: figd_secret");
        assert_eq!(
            Credentials::OAuth("tok".to_string()).header(),
            "Authorization: Bearer tok"
        );
    }
}
