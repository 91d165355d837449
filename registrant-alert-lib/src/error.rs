//! Error handling for Registrant Alert API calls.
//!
//! Every failure is surfaced to the caller as a [`RegistrantAlertError`]. The
//! variants separate argument errors (nothing was sent), transport errors,
//! parse errors, HTTP status errors (raw entry points) and application errors
//! reported by the service inside a JSON body (parsed entry points).

use crate::response::Response;
use crate::types::Messages;
use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for Registrant Alert API operations.
#[derive(Debug, Error)]
pub enum RegistrantAlertError {
    /// A caller argument failed validation. No request was made.
    #[error("invalid argument: \"{name}\" {message}")]
    InvalidArgument { name: String, message: String },

    /// The request body could not be serialized.
    #[error("cannot encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// The HTTP exchange failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The body arrived but is not a valid JSON response.
    #[error("cannot parse response: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        response: Box<Response>,
    },

    /// Non-2xx status on a raw data call.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The service reported an error inside the response body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Invalid client or file configuration.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl RegistrantAlertError {
    /// Create a new invalid argument error.
    pub fn invalid_argument<N: Into<String>, M: Into<String>>(name: N, message: M) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a new configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The response envelope that came with this error, if any.
    ///
    /// Read, parse and status errors carry the envelope. Argument, encode,
    /// execute and application errors do not.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Transport(TransportError::Read { response, .. }) => Some(response),
            Self::Parse { response, .. } => Some(response),
            Self::Status(status) => Some(&status.response),
            _ => None,
        }
    }

    /// The application error reported by the service, if this is one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(api) => Some(api),
            _ => None,
        }
    }

    /// Whether this error was raised before any I/O took place.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Failure of the HTTP round-trip itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or no response head arrived.
    #[error("cannot execute request: {cause}")]
    Execute { cause: TransportCause },

    /// The response head arrived but reading the body failed.
    #[error("cannot read response: {cause}")]
    Read {
        cause: TransportCause,
        /// Envelope holding whatever bytes were captured before the failure.
        response: Box<Response>,
    },
}

impl TransportError {
    pub fn cause(&self) -> &TransportCause {
        match self {
            Self::Execute { cause } | Self::Read { cause, .. } => cause,
        }
    }
}

/// Underlying reason for a [`TransportError`].
#[derive(Debug, Error)]
pub enum TransportCause {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Fewer bytes arrived than the announced `Content-Length`.
    #[error("unexpected EOF")]
    UnexpectedEof,
}

/// Returned by raw data calls when the status code is not 2xx.
#[derive(Debug, Error)]
#[error("API failed with status code: {}{}", status.as_u16(), message.as_ref().map(|m| format!(" ({m})")).unwrap_or_default())]
pub struct StatusError {
    pub status: StatusCode,
    pub message: Option<String>,
    pub response: Box<Response>,
}

/// Application-level error reported by the service in the response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("API error: [{code}] {messages}")]
pub struct ApiError {
    pub code: i64,
    pub messages: Messages,
}
