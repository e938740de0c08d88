use reqwest::StatusCode;
use thiserror::Error;

/// Failures seen by the storefront client, classified for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("{0}")]
    Unknown(String),
}

impl StoreError {
    /// Map a non-success HTTP status and the envelope's message onto the taxonomy.
    pub fn from_status(status: StatusCode, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            StatusCode::NOT_FOUND => StoreError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
                StoreError::Validation(message)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Unauthorized(message),
            s if s.is_server_error() => StoreError::Server {
                status: s.as_u16(),
                message,
            },
            s => StoreError::Unknown(format!("unexpected status {s}: {message}")),
        }
    }

    /// A "not found" on a read means the resource is simply empty.
    pub fn is_expected_empty(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Text for a transient notification.
    pub fn user_message(&self) -> String {
        match self {
            StoreError::Unknown(msg) if msg.is_empty() => "Something went wrong".to_string(),
            StoreError::Server { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return StoreError::Unknown(format!("malformed response: {err}"));
        }
        if let Some(status) = err.status() {
            return StoreError::from_status(status, err.to_string());
        }
        StoreError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_onto_the_taxonomy() {
        assert_eq!(
            StoreError::from_status(StatusCode::NOT_FOUND, "Cart not found"),
            StoreError::NotFound("Cart not found".into())
        );
        assert!(matches!(
            StoreError::from_status(StatusCode::BAD_REQUEST, "Invalid username or password"),
            StoreError::Validation(_)
        ));
        assert!(matches!(
            StoreError::from_status(StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            StoreError::Unauthorized(_)
        ));
        assert_eq!(
            StoreError::from_status(StatusCode::BAD_GATEWAY, "upstream down"),
            StoreError::Server {
                status: 502,
                message: "upstream down".into()
            }
        );
        assert!(matches!(
            StoreError::from_status(StatusCode::IM_A_TEAPOT, "teapot"),
            StoreError::Unknown(_)
        ));
    }

    #[test]
    fn only_not_found_is_an_expected_empty_state() {
        assert!(StoreError::NotFound("Cart not found".into()).is_expected_empty());
        assert!(!StoreError::Network("refused".into()).is_expected_empty());
        assert!(!StoreError::Validation("bad".into()).is_expected_empty());
    }

    #[test]
    fn server_errors_surface_the_message_verbatim() {
        let err = StoreError::Server {
            status: 500,
            message: "Database error".into(),
        };
        assert_eq!(err.user_message(), "Database error");
        assert_eq!(StoreError::Unknown(String::new()).user_message(), "Something went wrong");
    }
}
