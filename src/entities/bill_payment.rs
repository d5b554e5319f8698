use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
    utils::date_format::{timber_datetime_format, timber_datetime_format_option},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillPaymentRequest {
    /// Id of the bill (an expense) being settled.
    pub bill: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "timber_datetime_format")]
    pub payment_date: OffsetDateTime,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Partial bill payment update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBillPaymentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timber_datetime_format_option"
    )]
    pub payment_date: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl UpdateBillPaymentRequest {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_bill(mut self, bill: impl Into<String>) -> Self {
        self.bill = Some(bill.into());
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_payment_date(mut self, payment_date: OffsetDateTime) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    #[must_use]
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    #[must_use]
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::BillPayments, params).await
}

pub async fn get(client: &Client, payment_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::BillPayment(payment_id.to_string())).await
}

pub async fn create(client: &Client, data: &BillPaymentRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::BillPayments, data).await
}

pub async fn update(client: &Client, payment_id: &str, data: &UpdateBillPaymentRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::BillPayment(payment_id.to_string()), data).await
}

pub async fn delete(client: &Client, payment_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::BillPayment(payment_id.to_string())).await
}
