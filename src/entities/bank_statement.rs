use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, UploadOptions, endpoint_utils, required_file},
    error::Result,
    form::FileInput,
    transport::ApiResponse,
};

/// An uploaded bank statement awaiting or undergoing reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankStatement {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A statement upload.
///
/// Statements can be large, so the upload reports progress through
/// `options.progress` and can be aborted through `options.cancel`.
#[derive(Debug, Clone, Default)]
pub struct BankStatementData {
    /// Required. The call fails before sending anything when this is unset.
    pub file: Option<FileInput>,
    pub options: UploadOptions,
}

impl BankStatementData {
    #[must_use]
    pub fn new(file: FileInput) -> Self {
        Self {
            file: Some(file),
            options: UploadOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::BankStatements, params).await
}

pub async fn create(client: &Client, data: &BankStatementData) -> Result<ApiResponse> {
    let file = required_file(data.file.as_ref())?;

    let mut form = client.http().form()?.with_progress(data.options.progress.clone());
    form.append("file", file)?;
    client
        .http()
        .send_form(
            Method::POST,
            TimberEndpoint::BankStatements,
            form,
            data.options.cancel.as_ref(),
        )
        .await
}
