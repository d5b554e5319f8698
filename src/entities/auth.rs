use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{Client, endpoints::TimberEndpoint, error::Result, transport::ApiResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    Arabic,
}

/// Company details submitted alongside a new user.
///
/// Dates are passed as the strings the registration endpoint expects
/// (e.g. `2025-04-01T00:00:00.000+00:00`). `logo` and `license` are URLs of
/// files that were uploaded beforehand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterCompany {
    pub name: String,
    pub email: String,
    pub language: Language,
    pub currency: String,
    pub tax_number: String,
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub country: String,
    pub financial_start_date: String,
    pub license_expiry: String,
    pub license_issue_date: String,
    pub sector: Vec<String>,
    pub user_role: String,
    pub business_years: String,
    pub size: String,
    pub current_method: String,
    pub purpose: String,
    pub country_code: String,
    pub mobile: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub license: String,
    pub license_number: String,
    pub license_authority: String,
    pub trn: String,
}

/// A user registration, submitted by a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub partner: String,
    pub plan: String,
    /// Origins the issued SDK key may be used from.
    pub domains: Vec<String>,
    pub company: RegisterCompany,
}

/// Registers a new user. Goes through the registration transport, which
/// authorizes with the partner key when one was configured.
pub async fn register(client: &Client, data: &RegisterUserRequest) -> Result<ApiResponse> {
    client
        .auth_http()
        .send_json(Method::POST, TimberEndpoint::Register, data)
        .await
}
