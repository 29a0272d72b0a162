//! Kite-specific error types.

use thiserror::Error;

use crate::application::ports::BrokerError;

/// Errors from the Kite adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KiteError {
    /// The HTTP client could not be built or the URL is invalid.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Request could not be sent or the body could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// Response body is not the expected JSON.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Kite returned an error envelope.
    #[error("{error_type}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Kite exception class, e.g. `TokenException`.
        error_type: String,
        /// Message from Kite.
        message: String,
    },
}

impl From<KiteError> for BrokerError {
    fn from(err: KiteError) -> Self {
        match err {
            KiteError::Http(message) | KiteError::Network(message) | KiteError::JsonParse(message) => {
                Self::ConnectionError { message }
            }
            KiteError::Api {
                status,
                error_type,
                message,
            } => match (error_type.as_str(), status) {
                ("TokenException" | "PermissionException", _) | (_, 401 | 403) => {
                    Self::AuthenticationFailed { message }
                }
                (_, 429) => Self::RateLimited { message },
                (_, 404) => Self::NotFound { message },
                (
                    "InputException" | "OrderException" | "MarginException" | "HoldingException"
                    | "UserException",
                    _,
                )
                | (_, 400 | 422) => Self::Rejected { reason: message },
                ("NetworkException" | "DataException", _) => Self::ConnectionError { message },
                _ => Self::Unknown { message },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn api(status: u16, error_type: &str, message: &str) -> KiteError {
        KiteError::Api {
            status,
            error_type: error_type.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn network_errors_are_connection_errors() {
        let err: BrokerError = KiteError::Network("connection refused".to_string()).into();
        assert_eq!(
            err,
            BrokerError::ConnectionError {
                message: "connection refused".to_string()
            }
        );
    }

    #[test_case(403, "TokenException" ; "token")]
    #[test_case(403, "PermissionException" ; "permission")]
    #[test_case(401, "GeneralException" ; "unauthorized status")]
    fn authentication(status: u16, error_type: &str) {
        let err: BrokerError = api(status, error_type, "Invalid `api_key` or `access_token`.").into();
        assert_eq!(
            err,
            BrokerError::AuthenticationFailed {
                message: "Invalid `api_key` or `access_token`.".to_string()
            }
        );
    }

    #[test_case(400, "InputException" ; "input")]
    #[test_case(400, "OrderException" ; "order")]
    #[test_case(400, "MarginException" ; "margin")]
    #[test_case(422, "GeneralException" ; "unprocessable")]
    fn rejections_keep_the_message(status: u16, error_type: &str) {
        let err: BrokerError = api(status, error_type, "Insufficient funds.").into();
        assert_eq!(
            err,
            BrokerError::Rejected {
                reason: "Insufficient funds.".to_string()
            }
        );
    }

    #[test]
    fn not_found() {
        let err: BrokerError = api(404, "GeneralException", "Order not found").into();
        assert_eq!(
            err,
            BrokerError::NotFound {
                message: "Order not found".to_string()
            }
        );
    }

    #[test]
    fn rate_limited() {
        let err: BrokerError = api(429, "NetworkException", "Too many requests").into();
        assert!(matches!(err, BrokerError::RateLimited { .. }));
    }

    #[test]
    fn upstream_failures() {
        let err: BrokerError = api(503, "NetworkException", "Gateway timed out").into();
        assert!(matches!(err, BrokerError::ConnectionError { .. }));

        let err: BrokerError = api(500, "GeneralException", "Something broke").into();
        assert!(matches!(err, BrokerError::Unknown { .. }));
    }
}
