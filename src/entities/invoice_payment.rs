use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
    utils::date_format::timber_datetime_format,
};

/// A payment recorded against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoicePaymentRequest {
    pub invoice: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "timber_datetime_format")]
    pub payment_date: OffsetDateTime,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::InvoicePayments, params).await
}

pub async fn get(client: &Client, payment_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::InvoicePayment(payment_id.to_string())).await
}

pub async fn create(client: &Client, data: &InvoicePaymentRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::InvoicePayments, data).await
}

pub async fn delete(client: &Client, payment_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::InvoicePayment(payment_id.to_string())).await
}
