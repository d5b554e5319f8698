use serde::{Deserialize, Serialize};

use crate::{Client, endpoints::TimberEndpoint, entities::endpoint_utils, error::Result, transport::ApiResponse};

/// The invoice numbering settings of a company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    pub enabled: bool,
    pub next_number: u64,
    pub sequence_length: u32,
    pub prefix: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextNumberResponse {
    pub enabled: bool,
    pub next_invoice_number: u64,
}

/// Changes to the numbering settings. Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInvoiceNumberRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_number: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_length: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl UpdateInvoiceNumberRequest {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    #[must_use]
    pub fn with_next_number(mut self, next_number: u64) -> Self {
        self.next_number = Some(next_number);
        self
    }

    #[must_use]
    pub fn with_sequence_length(mut self, sequence_length: u32) -> Self {
        self.sequence_length = Some(sequence_length);
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

pub async fn get(client: &Client) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::InvoiceNumber).await
}

/// Previews the number the next invoice will receive.
pub async fn next(client: &Client) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::InvoiceNumberNext).await
}

pub async fn update(client: &Client, data: &UpdateInvoiceNumberRequest) -> Result<ApiResponse> {
    endpoint_utils::patch(client, TimberEndpoint::InvoiceNumber, data).await
}
