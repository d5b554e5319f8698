//! Sentry integration for timber-rs errors.
//!
//! Only available with the `sentry` feature.
//!
//! ```ignore
//! use sentry::configure_scope;
//! use timber_rs::sentry_integration::error_to_sentry_context;
//!
//! if let Err(e) = client.invoice().get("invoice_id").await {
//!     sentry::add_breadcrumb(sentry::Breadcrumb::from(&e));
//!     configure_scope(|scope| {
//!         for (key, value) in error_to_sentry_context(&e) {
//!             scope.set_extra(&key, value);
//!         }
//!     });
//! }
//! ```

use std::collections::BTreeMap;

use sentry_core::{Breadcrumb, protocol::Value};

use crate::error::Error;

const MAX_BODY_PREVIEW: usize = 500;

impl<'a> From<&'a Error> for Breadcrumb {
    fn from(error: &'a Error) -> Self {
        let (category, message, data) = match error {
            Error::Request(source) => (
                "http.request",
                format!("HTTP request error: {source}"),
                BTreeMap::new(),
            ),

            Error::Status { status, url, .. } => {
                let mut data = BTreeMap::new();
                data.insert("url".to_string(), Value::from(url.clone()));
                data.insert("status_code".to_string(), Value::from(status.as_u16()));
                ("http.response", format!("Timber API returned {status}"), data)
            }

            Error::Cancelled => ("timber.upload", "Request cancelled".to_string(), BTreeMap::new()),

            Error::MissingField { field } => {
                let mut data = BTreeMap::new();
                data.insert("field".to_string(), Value::from(*field));
                ("timber.validation", format!("{field} is required"), data)
            }

            Error::MultipartUnavailable { environment } => {
                let mut data = BTreeMap::new();
                data.insert("environment".to_string(), Value::from(environment.to_string()));
                ("timber.config", "Multipart form data unavailable".to_string(), data)
            }

            Error::MissingCredential | Error::InvalidHeader(_) => {
                ("auth", error.to_string(), BTreeMap::new())
            }

            Error::InvalidEndpoint => (
                "timber.config",
                "Invalid endpoint URL".to_string(),
                BTreeMap::new(),
            ),

            Error::Serialization(_) | Error::DateFormat(_) | Error::Io(_) => {
                ("timber.encoding", error.to_string(), BTreeMap::new())
            }
        };

        Breadcrumb {
            ty: "error".to_string(),
            category: Some(category.to_string()),
            message: Some(message),
            data,
            level: sentry_core::Level::Error,
            ..Default::default()
        }
    }
}

/// Extracts the span trace, URL, status and a body preview of an error as
/// Sentry extra context.
pub fn error_to_sentry_context(error: &Error) -> BTreeMap<String, Value> {
    let mut context = BTreeMap::new();

    if let Some(span_trace) = error.span_trace() {
        context.insert(
            "timber.span_trace".to_string(),
            Value::from(format!("{span_trace}")),
        );
    }

    if let Some(url) = error.url() {
        context.insert("timber.url".to_string(), Value::from(url.to_string()));
    }

    if let Some(status) = error.status_code() {
        context.insert("timber.status_code".to_string(), Value::from(status.as_u16()));
    }

    if let Some(body) = error.response_body() {
        let truncated = match body.char_indices().nth(MAX_BODY_PREVIEW) {
            Some((index, _)) => format!("{}...", &body[..index]),
            None => body.to_string(),
        };
        context.insert("timber.response_body".to_string(), Value::from(truncated));
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_breadcrumb_names_the_field() {
        let crumb = Breadcrumb::from(&Error::MissingField { field: "file" });
        assert_eq!(crumb.category.as_deref(), Some("timber.validation"));
        assert_eq!(crumb.message.as_deref(), Some("file is required"));
        assert_eq!(crumb.data.get("field"), Some(&Value::from("file")));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let error = Error::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            url: "https://api.timber.me/api/v1/user/sdk/customer/invoice".to_string(),
            headers: reqwest::header::HeaderMap::new(),
            body: "x".repeat(2000),
            span_trace: crate::SpanTrace::capture(),
        };
        let context = error_to_sentry_context(&error);
        let Some(Value::String(body)) = context.get("timber.response_body") else {
            panic!("body preview missing");
        };
        assert_eq!(body.len(), MAX_BODY_PREVIEW + 3);
        assert_eq!(context.get("timber.status_code"), Some(&Value::from(400u16)));
    }
}
