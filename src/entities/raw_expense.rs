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

/// A receipt or bill uploaded for the server to extract an expense from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawExpense {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RawExpenseData {
    /// Required. The call fails before sending anything when this is unset.
    pub file: Option<FileInput>,
    pub company: Option<String>,
    pub options: UploadOptions,
}

impl RawExpenseData {
    #[must_use]
    pub fn new(file: FileInput) -> Self {
        Self {
            file: Some(file),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::RawExpenses, params).await
}

pub async fn get(client: &Client, raw_expense_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::RawExpense(raw_expense_id.to_string())).await
}

pub async fn create(client: &Client, data: &RawExpenseData) -> Result<ApiResponse> {
    let file = required_file(data.file.as_ref())?;

    let mut form = client.http().form()?.with_progress(data.options.progress.clone());
    form.append("file", file)?
        .text_opt("company", data.company.as_ref());
    client
        .http()
        .send_form(Method::POST, TimberEndpoint::RawExpenses, form, data.options.cancel.as_ref())
        .await
}

pub async fn delete(client: &Client, raw_expense_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::RawExpense(raw_expense_id.to_string())).await
}
