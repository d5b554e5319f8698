use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
};

/// A customer saved in the address book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
}

/// Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
}

impl UpdateCustomerRequest {
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
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_trn(mut self, trn: impl Into<String>) -> Self {
        self.trn = Some(trn.into());
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::Customers, params).await
}

pub async fn get(client: &Client, customer_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::Customer(customer_id.to_string())).await
}

pub async fn create(client: &Client, data: &CustomerRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::Customers, data).await
}

pub async fn update(client: &Client, customer_id: &str, data: &UpdateCustomerRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::Customer(customer_id.to_string()), data).await
}

pub async fn delete(client: &Client, customer_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::Customer(customer_id.to_string())).await
}
