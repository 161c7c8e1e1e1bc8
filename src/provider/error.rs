use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("OCI service error (status {status}, code {code}): {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
        request_id: Option<String>,
    },

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request signing error: {0}")]
    Signing(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),

    #[error("Failed to decode service response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ProviderError {
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Service {
            status,
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// HTTP status of a service error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Client-side rejection (4xx) reported by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(400..=499))
    }

    /// The service refused an update because nothing would change.
    pub fn is_no_change(&self) -> bool {
        match self {
            ProviderError::Service {
                status: 400 | 409,
                message,
                ..
            } => {
                let message = message.to_ascii_lowercase();
                message.contains("already") || message.contains("no change")
            }
            _ => false,
        }
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
