//! HTTP transport for the Registrant Alert endpoint.
//!
//! One POST per call. The body is read into memory chunk by chunk so that a
//! failed read still leaves the captured bytes in the returned envelope. The
//! underlying response is dropped, and its connection released, before any
//! function here returns.

use crate::error::{RegistrantAlertError, TransportCause, TransportError};
use crate::response::Response;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Url;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Media type sent and accepted by the client.
pub const MEDIA_TYPE: &str = "application/json";

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("registrant-alert-rust/", env!("CARGO_PKG_VERSION"));

/// Per-call cancellation and deadline.
///
/// Cancelling the token, or passing the deadline, aborts the exchange in
/// flight. It is reported as a transport error.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// A context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Resolves once the context is cancelled or its deadline passes.
    pub(crate) async fn done(&self) -> TransportCause {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => TransportCause::Canceled,
                    _ = tokio::time::sleep_until(deadline) => TransportCause::DeadlineExceeded,
                }
            }
            None => {
                self.cancel.cancelled().await;
                TransportCause::Canceled
            }
        }
    }
}

/// Posts JSON request bodies to the configured endpoint.
#[derive(Debug, Clone)]
pub(crate) struct HttpTransport {
    /// Caller-supplied or default HTTP client. Never mutated here.
    http_client: reqwest::Client,
    base_url: Url,
    user_agent: String,
}

impl HttpTransport {
    pub fn new(http_client: reqwest::Client, base_url: Url, user_agent: String) -> Self {
        Self {
            http_client,
            base_url,
            user_agent,
        }
    }

    /// Build the default HTTP client.
    pub fn default_http_client(timeout: Option<Duration>) -> Result<reqwest::Client, RegistrantAlertError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|e| {
            RegistrantAlertError::config(format!("failed to create HTTP client: {}", e))
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// POST `body` and read the whole response.
    ///
    /// The status code is not inspected here.
    pub async fn post(&self, ctx: &RequestContext, body: Vec<u8>) -> Result<Response, TransportError> {
        tracing::debug!(url = %self.base_url, bytes = body.len(), "dispatching request");

        let request = self
            .http_client
            .post(self.base_url.clone())
            .header(CONTENT_TYPE, MEDIA_TYPE)
            .header(ACCEPT, MEDIA_TYPE)
            .header(USER_AGENT, self.user_agent.as_str())
            .body(body);

        let mut http_response = tokio::select! {
            biased;
            cause = ctx.done() => return Err(TransportError::Execute { cause }),
            sent = request.send() => sent.map_err(|e| TransportError::Execute { cause: e.into() })?,
        };

        let mut response = Response::from_head(&http_response);
        let announced = response.content_length();

        let read_result = loop {
            let chunk = tokio::select! {
                biased;
                cause = ctx.done() => break Err(cause),
                chunk = http_response.chunk() => chunk,
            };
            match chunk {
                Ok(Some(bytes)) => response.body.extend_from_slice(&bytes),
                Ok(None) => break Ok(()),
                // A connection closed short of Content-Length surfaces as a body error.
                Err(e) => match announced {
                    Some(expected) if (response.body.len() as u64) < expected => {
                        tracing::trace!(error = %e, expected, "body ended early");
                        break Err(TransportCause::UnexpectedEof);
                    }
                    _ => break Err(TransportCause::Http(e)),
                },
            }
        };
        drop(http_response);

        tracing::trace!(status = %response.status, bytes = response.body.len(), "response received");

        let read_result = read_result.and_then(|()| match announced {
            Some(expected) if (response.body.len() as u64) < expected => {
                Err(TransportCause::UnexpectedEof)
            }
            _ => Ok(()),
        });

        match read_result {
            Ok(()) => Ok(response),
            Err(cause) => Err(TransportError::Read {
                cause,
                response: Box::new(response),
            }),
        }
    }
}
