//! Normalized error for every remote call.

/// Failure of a Figma API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The API answered with a non-success status.
    #[error("Figma API returned HTTP {status} for {endpoint}: {message}")]
    Status {
        endpoint: String,
        status: u32,
        message: String,
    },
    /// The call could not be completed (network, malformed body, task failure).
    #[error("failed to make request to Figma API endpoint '{endpoint}': {message}")]
    Transport { endpoint: String, message: String },
    /// No usable credential was supplied.
    #[error("a non-empty Figma API key or OAuth token is required")]
    MissingCredentials,
    /// libcurl in this environment cannot speak the base URL's scheme; retrying will not help.
    #[error("this build of libcurl does not support '{scheme}' (needed for {base_url}); install a libcurl with {scheme} support or change api_base_url")]
    Unsupported { scheme: String, base_url: String },
}

impl RemoteError {
    pub fn status(endpoint: &str, status: u32, message: impl Into<String>) -> Self {
        RemoteError::Status {
            endpoint: endpoint.to_string(),
            status,
            message: message.into(),
        }
    }

    pub fn transport(endpoint: &str, message: impl Into<String>) -> Self {
        RemoteError::Transport {
            endpoint: endpoint.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status reported by the remote, when there was one.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
