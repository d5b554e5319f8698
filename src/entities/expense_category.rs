use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseCategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Changes to an expense category. Unset fields are not sent and keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateExpenseCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateExpenseCategoryRequest {
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
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::ExpenseCategories, params).await
}

pub async fn get(client: &Client, category_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::ExpenseCategory(category_id.to_string())).await
}

pub async fn create(client: &Client, data: &ExpenseCategoryRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::ExpenseCategories, data).await
}

pub async fn update(client: &Client, category_id: &str, data: &UpdateExpenseCategoryRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::ExpenseCategory(category_id.to_string()), data).await
}

pub async fn delete(client: &Client, category_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::ExpenseCategory(category_id.to_string())).await
}
