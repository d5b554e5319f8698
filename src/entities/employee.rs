use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
    utils::date_format::timber_datetime_format_option,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRequest {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub salary: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timber_datetime_format_option"
    )]
    pub joining_date: Option<OffsetDateTime>,
}

/// Changes to an employee. Unset fields are not sent and keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEmployeeRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub salary: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "timber_datetime_format_option"
    )]
    pub joining_date: Option<OffsetDateTime>,
}

impl UpdateEmployeeRequest {
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
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    #[must_use]
    pub fn with_country_code(mut self, country_code: impl Into<String>) -> Self {
        self.country_code = Some(country_code.into());
        self
    }

    #[must_use]
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = Some(mobile.into());
        self
    }

    #[must_use]
    pub fn with_salary(mut self, salary: Decimal) -> Self {
        self.salary = Some(salary);
        self
    }

    #[must_use]
    pub fn with_joining_date(mut self, joining_date: OffsetDateTime) -> Self {
        self.joining_date = Some(joining_date);
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::Employees, params).await
}

pub async fn get(client: &Client, employee_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::Employee(employee_id.to_string())).await
}

pub async fn create(client: &Client, data: &EmployeeRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::Employees, data).await
}

pub async fn update(client: &Client, employee_id: &str, data: &UpdateEmployeeRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::Employee(employee_id.to_string()), data).await
}

pub async fn delete(client: &Client, employee_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::Employee(employee_id.to_string())).await
}
