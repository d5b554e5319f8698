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

/// A salary payment to an employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRequest {
    pub employee: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Pay period, e.g. `2025-04`.
    pub month: String,
    #[serde(with = "timber_datetime_format")]
    pub payment_date: OffsetDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Changes to a recorded salary payment. Only the fields that are set are
/// sent, so correcting the amount leaves the period and date untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSalaryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timber_datetime_format_option"
    )]
    pub payment_date: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateSalaryRequest {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_employee(mut self, employee: impl Into<String>) -> Self {
        self.employee = Some(employee.into());
        self
    }

    #[must_use]
    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    #[must_use]
    pub fn with_month(mut self, month: impl Into<String>) -> Self {
        self.month = Some(month.into());
        self
    }

    #[must_use]
    pub fn with_payment_date(mut self, payment_date: OffsetDateTime) -> Self {
        self.payment_date = Some(payment_date);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::Salaries, params).await
}

pub async fn get(client: &Client, salary_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::Salary(salary_id.to_string())).await
}

pub async fn create(client: &Client, data: &SalaryRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::Salaries, data).await
}

pub async fn update(client: &Client, salary_id: &str, data: &UpdateSalaryRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::Salary(salary_id.to_string()), data).await
}

pub async fn delete(client: &Client, salary_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::Salary(salary_id.to_string())).await
}
