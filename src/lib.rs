//! # timber-rs
//!
//! A Rust client library for the Timber accounting and invoicing API.
//!
//! ```ignore
//! use timber_rs::{Client, ClientOptions, ListParameters};
//!
//! let client = Client::new("your-api-key", ClientOptions::default())?;
//! let invoices = client
//!     .invoice()
//!     .list(&ListParameters::builder().with_page(1).with_limit(10))
//!     .await?;
//! println!("{}", invoices.data);
//! ```
//!
//! Upload endpoints (company licenses, invoice logos, cheques, bank
//! statements, receipts) send `multipart/form-data`. The payload is built for
//! the current [`Environment`]: on native targets the boundary header is
//! computed up front, in the browser (`wasm32`) it is left to the transport.
//! Callers never need to care which one is in use.
//!
//! ## Sentry Integration
//!
//! Rejected responses carry an async span trace captured where the response
//! was received. With the `sentry` feature, errors can also be turned into
//! breadcrumbs:
//!
//! ```toml
//! [dependencies]
//! timber-rs = { version = "0.1", features = ["sentry"] }
//! ```
//!
//! Span traces are only populated when the subscriber has an `ErrorLayer`:
//!
//! ```ignore
//! use tracing_subscriber::prelude::*;
//! use tracing_error::ErrorLayer;
//!
//! tracing_subscriber::registry()
//!     .with(tracing_subscriber::fmt::layer())
//!     .with(ErrorLayer::default())
//!     .with(sentry::integrations::tracing::layer())
//!     .init();
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate tracing;

pub mod client;
pub mod endpoints;
pub mod entities;
pub mod error;
pub mod form;
pub mod transport;
pub mod utils;

#[cfg(feature = "sentry")]
pub mod sentry_integration;

pub use client::{Client, ClientOptions};
pub use endpoints::TimberEndpoint;
pub use entities::*;
pub use error::Error;
pub use form::{Environment, FileInput, FormPayload, FormValue, ProgressCallback, UploadProgress};
pub use transport::ApiResponse;

// Re-export so callers can cancel uploads without depending on tokio-util directly
pub use tokio_util::sync::CancellationToken;

// Re-export SpanTrace for users who want to access it
pub use tracing_error::SpanTrace;
