use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::form::{FileInput, ProgressCallback};

pub mod auth;
pub mod bank_statement;
pub mod bill_payment;
pub mod cheque;
pub mod company;
pub mod customer;
pub mod employee;
pub mod expense;
pub mod expense_category;
pub mod invoice;
pub mod invoice_item;
pub mod invoice_number;
pub mod invoice_payment;
pub mod invoice_template;
pub mod raw_expense;
pub mod salary;
pub mod tax_rate;
pub mod vendor_payment;

/// Query parameters accepted by list endpoints. Unset parameters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Server-defined filter expression, passed through untouched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,
}

impl ListParameters {
    /// Create a new builder for ListParameters
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: impl Into<String>) -> Self {
        self.filters = Some(filters.into());
        self
    }
}

/// The `{ "message": ... }` body most mutation endpoints answer with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Options for upload calls.
#[derive(Clone, Default)]
pub struct UploadOptions {
    /// Invoked as file data is sent.
    pub progress: Option<ProgressCallback>,
    /// Aborts the exchange when cancelled; the call then fails with `Error::Cancelled`.
    pub cancel: Option<CancellationToken>,
}

impl UploadOptions {
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

impl std::fmt::Debug for UploadOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadOptions")
            .field("progress", &self.progress.is_some())
            .field("cancel", &self.cancel)
            .finish()
    }
}

/// The file of an upload that cannot be sent without one. An absent file and an
/// empty reference both fail with [`Error::MissingField`] before any request.
pub(crate) fn required_file(file: Option<&FileInput>) -> Result<FileInput> {
    file.filter(|file| !file.is_empty())
        .cloned()
        .ok_or(Error::MissingField { field: "file" })
}

/// Generic implementation for JSON resource operations
pub mod endpoint_utils {
    use reqwest::Method;
    use serde::Serialize;

    use super::ListParameters;
    use crate::{endpoints::TimberEndpoint, error::Result, transport::ApiResponse, Client};

    pub async fn list(client: &Client, endpoint: TimberEndpoint, params: &ListParameters) -> Result<ApiResponse> {
        client.http().get(endpoint, params).await
    }

    pub async fn get(client: &Client, endpoint: TimberEndpoint) -> Result<ApiResponse> {
        client.http().get(endpoint, &()).await
    }

    pub async fn create<B: Serialize + ?Sized>(client: &Client, endpoint: TimberEndpoint, data: &B) -> Result<ApiResponse> {
        client.http().send_json(Method::POST, endpoint, data).await
    }

    pub async fn update<B: Serialize + ?Sized>(client: &Client, endpoint: TimberEndpoint, data: &B) -> Result<ApiResponse> {
        client.http().send_json(Method::PUT, endpoint, data).await
    }

    pub async fn patch<B: Serialize + ?Sized>(client: &Client, endpoint: TimberEndpoint, data: &B) -> Result<ApiResponse> {
        client.http().send_json(Method::PATCH, endpoint, data).await
    }

    pub async fn delete(client: &Client, endpoint: TimberEndpoint) -> Result<ApiResponse> {
        client.http().send_empty(Method::DELETE, endpoint).await
    }
}
