use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
};

/// A saved product or service that can be added to invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat: Decimal,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemRequest {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat: Decimal,
}

/// Query for [`suggestions`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionParameters {
    pub search: String,
}

impl SuggestionParameters {
    #[must_use]
    pub fn new(search: impl Into<String>) -> Self {
        Self { search: search.into() }
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::InvoiceItems, params).await
}

/// Looks up saved items whose title matches `search`.
pub async fn suggestions(client: &Client, params: &SuggestionParameters) -> Result<ApiResponse> {
    client.http().get(TimberEndpoint::InvoiceItemSuggestions, params).await
}

pub async fn create(client: &Client, data: &InvoiceItemRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::InvoiceItems, data).await
}

// Items are updated with PATCH, unlike most other resources.
pub async fn update(client: &Client, item_id: &str, data: &InvoiceItemRequest) -> Result<ApiResponse> {
    endpoint_utils::patch(client, TimberEndpoint::InvoiceItem(item_id.to_string()), data).await
}
