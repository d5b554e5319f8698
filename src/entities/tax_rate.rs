use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRateRequest {
    pub name: String,
    /// Percentage, e.g. `5` for 5% VAT.
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaxRateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub rate: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTaxRateRequest {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::TaxRates, params).await
}

pub async fn get(client: &Client, tax_rate_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::TaxRate(tax_rate_id.to_string())).await
}

pub async fn create(client: &Client, data: &TaxRateRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::TaxRates, data).await
}

pub async fn update(client: &Client, tax_rate_id: &str, data: &UpdateTaxRateRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::TaxRate(tax_rate_id.to_string()), data).await
}

pub async fn delete(client: &Client, tax_rate_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::TaxRate(tax_rate_id.to_string())).await
}
