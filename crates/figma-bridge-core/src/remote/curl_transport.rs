//! libcurl-backed `ApiTransport`.

use std::str;

use super::parse;
use super::{ApiTransport, Credentials, RemoteError};

/// Blocking GET client for the Figma REST API.
///
/// No timeouts are set: a hung call hangs its caller.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    base_url: String,
    credentials: Credentials,
}

impl CurlTransport {
    /// Validates the credential and checks that libcurl can speak the base URL's scheme.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, RemoteError> {
        if credentials.secret().trim().is_empty() {
            return Err(RemoteError::MissingCredentials);
        }

        let parsed = url::Url::parse(base_url).map_err(|e| {
            RemoteError::transport(base_url, format!("invalid api_base_url: {}", e))
        })?;
        let scheme = parsed.scheme().to_string();
        let supported = curl::Version::get()
            .protocols()
            .any(|p| p.eq_ignore_ascii_case(&scheme));
        if !supported {
            return Err(RemoteError::Unsupported {
                scheme,
                base_url: base_url.to_string(),
            });
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Performs the GET and returns (status, body bytes).
    fn perform(&self, endpoint: &str) -> Result<(u32, Vec<u8>), curl::Error> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&format!("{}{}", self.base_url, endpoint))?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.accept_encoding("")?;

        let mut list = curl::easy::List::new();
        list.append(&self.credentials.header())?;
        list.append("Accept: application/json")?;
        easy.http_headers(list)?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        Ok((code, body))
    }
}

impl ApiTransport for CurlTransport {
    fn get_json(&self, endpoint: &str) -> Result<serde_json::Value, RemoteError> {
        let (code, body) = self
            .perform(endpoint)
            .map_err(|e| RemoteError::transport(endpoint, e.to_string()))?;

        if !(200..300).contains(&code) {
            return Err(RemoteError::status(
                endpoint,
                code,
                parse::error_message(code, &body),
            ));
        }

        serde_json::from_slice(&body).map_err(|e| {
            let preview = str::from_utf8(&body).unwrap_or("<binary>");
            RemoteError::transport(
                endpoint,
                format!(
                    "response is not JSON ({}): {}",
                    e,
                    parse::truncate(preview, parse::PREVIEW_CHARS)
                ),
            )
        })
    }
}
