use miette::Diagnostic;
use reqwest::{StatusCode, header::HeaderMap};
use thiserror::Error;
use tracing_error::SpanTrace;

use crate::form::Environment;

/// Errors that can occur when interacting with the Timber API.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// Neither a tenant API key nor a partner API key was available for the call.
    #[error("API key is required")]
    #[diagnostic(
        code(timber_rs::missing_credential),
        help("Pass a non-empty API key, or a partner API key for registration-only use")
    )]
    MissingCredential,

    /// A field the endpoint cannot accept a request without was not supplied.
    #[error("{field} is required")]
    #[diagnostic(
        code(timber_rs::missing_field),
        help("Supply the `{field}` field before issuing the request")
    )]
    MissingField { field: &'static str },

    /// An API key contained characters that are not valid in an HTTP header.
    #[error("credential is not a valid header value")]
    #[diagnostic(
        code(timber_rs::invalid_header),
        help("API keys must be visible ASCII without control characters")
    )]
    InvalidHeader(#[source] reqwest::header::InvalidHeaderValue),

    /// The multipart primitive for the requested environment is not available on this target.
    #[error("multipart form data is unavailable for the {environment} environment")]
    #[diagnostic(
        code(timber_rs::multipart_unavailable),
        help("Use the environment returned by `Environment::detect()` for this target")
    )]
    MultipartUnavailable { environment: Environment },

    #[error("endpoint could not be resolved to a URL")]
    #[diagnostic(
        code(timber_rs::invalid_endpoint),
        help("Check that the base URL override is an absolute http(s) URL and that resource ids are not empty, `.` or `..`")
    )]
    InvalidEndpoint,

    #[error("error making request: {0:?}")]
    #[diagnostic(
        code(timber_rs::request_error),
        help("Check your network connection and Timber API availability")
    )]
    Request(#[source] reqwest::Error),

    /// The server answered with a non-success status. Status, headers and body are
    /// kept exactly as received.
    #[error("request to {url} failed with status {status}")]
    #[diagnostic(code(timber_rs::status))]
    Status {
        status: StatusCode,
        url: String,
        headers: HeaderMap,
        body: String,
        span_trace: SpanTrace,
    },

    /// The caller's cancellation token fired before the exchange completed.
    #[error("request was cancelled")]
    #[diagnostic(code(timber_rs::cancelled))]
    Cancelled,

    #[error("error encoding or decoding JSON: {0}")]
    #[diagnostic(
        code(timber_rs::serialization_error),
        help("The API returned data in an unexpected format")
    )]
    Serialization(#[source] serde_json::Error),

    #[error("error formatting date: {0}")]
    #[diagnostic(code(timber_rs::date_format))]
    DateFormat(#[source] time::error::Format),

    #[error("error reading file: {0}")]
    #[diagnostic(code(timber_rs::io))]
    Io(#[source] std::io::Error),
}

impl Error {
    /// Returns `true` for errors raised before any network activity. These are
    /// input-correction errors and retrying them without changes cannot succeed.
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingCredential
                | Self::MissingField { .. }
                | Self::InvalidHeader(_)
                | Self::MultipartUnavailable { .. }
                | Self::InvalidEndpoint
                | Self::DateFormat(_)
                | Self::Io(_)
        )
    }

    /// Returns `true` if the call was aborted through its cancellation token.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The HTTP status of a rejected request, if the server answered at all.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status(),
            _ => None,
        }
    }

    /// The URL of the failed request, if known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Status { url, .. } => Some(url),
            Self::Request(e) => e.url().map(url::Url::as_str),
            _ => None,
        }
    }

    /// The raw response body of a rejected request.
    #[must_use]
    pub fn response_body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The span trace captured when a rejected response was received.
    #[must_use]
    pub fn span_trace(&self) -> Option<&SpanTrace> {
        match self {
            Self::Status { span_trace, .. } => Some(span_trace),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<time::error::Format> for Error {
    fn from(e: time::error::Format) -> Self {
        Self::DateFormat(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidHeader(e)
    }
}

/// Type alias for results from this crate.
///
/// This is already a Miette diagnostic result due to the implementation of
/// the Diagnostic trait for the Error type.
pub type Result<O> = std::result::Result<O, Error>;
