use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    transport::ApiResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateType {
    Terms,
    Notes,
}

/// A named block of text reused across invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub name: String,
    pub content: String,
}

impl TemplateEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTemplate {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    #[serde(default)]
    pub terms: Vec<TemplateEntry>,
    #[serde(default)]
    pub notes: Vec<TemplateEntry>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTemplateRequest {
    pub terms: Vec<TemplateEntry>,
    pub notes: Vec<TemplateEntry>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub template_type: Option<TemplateType>,
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::InvoiceTemplates, params).await
}

pub async fn get(client: &Client, template_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::InvoiceTemplate(template_id.to_string())).await
}

pub async fn create(client: &Client, data: &InvoiceTemplateRequest) -> Result<ApiResponse> {
    endpoint_utils::create(client, TimberEndpoint::InvoiceTemplates, data).await
}

pub async fn update(client: &Client, template_id: &str, data: &InvoiceTemplateRequest) -> Result<ApiResponse> {
    endpoint_utils::update(client, TimberEndpoint::InvoiceTemplate(template_id.to_string()), data).await
}

pub async fn delete(client: &Client, template_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::InvoiceTemplate(template_id.to_string())).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_type_is_sent_as_type() {
        let request = InvoiceTemplateRequest {
            terms: vec![TemplateEntry::new("Net 30", "Payment due within 30 days")],
            notes: Vec::new(),
            template_type: Some(TemplateType::Terms),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["type"], "terms");
        assert_eq!(value["terms"][0]["name"], "Net 30");
    }
}
