use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils, required_file},
    error::Result,
    form::FileInput,
    transport::ApiResponse,
};

/// A scanned cheque submitted for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cheque {
    #[serde(rename = "_id")]
    pub id: String,
    /// URL of the stored scan.
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChequeData {
    /// Required. The call fails before sending anything when this is unset.
    pub file: Option<FileInput>,
    /// Company the cheque belongs to. Falls back to the key's default company.
    pub company: Option<String>,
}

impl ChequeData {
    #[must_use]
    pub fn new(file: FileInput) -> Self {
        Self {
            file: Some(file),
            company: None,
        }
    }

    #[must_use]
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::Cheques, params).await
}

pub async fn create(client: &Client, data: &ChequeData) -> Result<ApiResponse> {
    let file = required_file(data.file.as_ref())?;

    let mut form = client.http().form()?;
    form.append("file", file)?
        .text_opt("company", data.company.as_ref());
    client
        .http()
        .send_form(Method::POST, TimberEndpoint::Cheques, form, None)
        .await
}
