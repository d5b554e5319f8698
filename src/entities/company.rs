use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{
    Client,
    endpoints::TimberEndpoint,
    error::Result,
    form::{FileInput, FormPayload},
    transport::ApiResponse,
};

/// A company as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub sector: Vec<String>,
    #[serde(default)]
    pub license_number: Option<String>,
    #[serde(default)]
    pub license_authority: Option<String>,
    #[serde(default)]
    pub trn: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields for creating a company. Every field is required; `license` is the
/// trade license document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyData {
    pub name: String,
    pub currency: String,
    pub language: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
    pub tax_number: String,
    pub financial_start_date: String,
    pub license_expiry: String,
    pub license_issue_date: String,
    pub sector: Vec<String>,
    pub user_role: String,
    pub business_years: String,
    pub size: String,
    pub current_method: String,
    pub purpose: String,
    pub license: FileInput,
    pub license_number: String,
    pub license_authority: String,
    pub trn: String,
}

/// A partial company update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyUpdate {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub language: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub country_code: Option<String>,
    pub mobile: Option<String>,
    pub tax_number: Option<String>,
    pub financial_start_date: Option<String>,
    pub license_expiry: Option<String>,
    pub license_issue_date: Option<String>,
    pub sector: Option<Vec<String>>,
    pub user_role: Option<String>,
    pub business_years: Option<String>,
    pub size: Option<String>,
    pub current_method: Option<String>,
    pub purpose: Option<String>,
    pub license: Option<FileInput>,
    pub license_number: Option<String>,
    pub license_authority: Option<String>,
    pub trn: Option<String>,
}

impl CompanyUpdate {
    #[must_use]
    pub fn new() -> Self {
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
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_sector(mut self, sector: Vec<String>) -> Self {
        self.sector = Some(sector);
        self
    }

    #[must_use]
    pub fn with_license(mut self, license: FileInput) -> Self {
        self.license = Some(license);
        self
    }
}

impl CompanyData {
    pub(crate) fn write_form(&self, form: &mut FormPayload) -> Result<()> {
        form.text("name", &self.name)
            .text("currency", &self.currency)
            .text("language", &self.language)
            .text("address", &self.address)
            .text("city", &self.city)
            .text("state", &self.state)
            .text("zip_code", &self.zip_code)
            .text("country", &self.country)
            .text("tax_number", &self.tax_number)
            .text("financial_start_date", &self.financial_start_date)
            .text("business_years", &self.business_years)
            .text("license_expiry", &self.license_expiry)
            .text("license_issue_date", &self.license_issue_date)
            .text("user_role", &self.user_role)
            .text("size", &self.size)
            .text("current_method", &self.current_method)
            .text("purpose", &self.purpose)
            .text("email", &self.email)
            .text("country_code", &self.country_code)
            .text("mobile", &self.mobile);
        form.append("license", self.license.clone())?;
        form.text("license_number", &self.license_number)
            .text("license_authority", &self.license_authority)
            .text("trn", &self.trn)
            .append_indexed("sector", &self.sector);
        Ok(())
    }
}

impl CompanyUpdate {
    pub(crate) fn write_form(&self, form: &mut FormPayload) -> Result<()> {
        form.text_opt("name", self.name.as_ref())
            .text_opt("currency", self.currency.as_ref())
            .text_opt("language", self.language.as_ref())
            .text_opt("address", self.address.as_ref())
            .text_opt("city", self.city.as_ref())
            .text_opt("state", self.state.as_ref())
            .text_opt("zip_code", self.zip_code.as_ref())
            .text_opt("country", self.country.as_ref())
            .text_opt("tax_number", self.tax_number.as_ref())
            .text_opt("financial_start_date", self.financial_start_date.as_ref())
            .text_opt("business_years", self.business_years.as_ref())
            .text_opt("license_expiry", self.license_expiry.as_ref())
            .text_opt("license_issue_date", self.license_issue_date.as_ref())
            .text_opt("user_role", self.user_role.as_ref())
            .text_opt("size", self.size.as_ref())
            .text_opt("current_method", self.current_method.as_ref())
            .text_opt("purpose", self.purpose.as_ref())
            .text_opt("email", self.email.as_ref())
            .text_opt("country_code", self.country_code.as_ref())
            .text_opt("mobile", self.mobile.as_ref());
        form.append_opt("license", self.license.clone())?;
        form.text_opt("license_number", self.license_number.as_ref())
            .text_opt("license_authority", self.license_authority.as_ref())
            .text_opt("trn", self.trn.as_ref());
        if let Some(sector) = &self.sector {
            form.append_indexed("sector", sector);
        }
        Ok(())
    }
}

/// Fetches the company the API key belongs to.
pub async fn get(client: &Client) -> Result<ApiResponse> {
    client.http().get(TimberEndpoint::Company, &()).await
}

pub async fn create(client: &Client, data: &CompanyData) -> Result<ApiResponse> {
    let mut form = client.http().form()?;
    data.write_form(&mut form)?;
    client
        .http()
        .send_form(Method::POST, TimberEndpoint::Company, form, None)
        .await
}

pub async fn update(client: &Client, company_id: &str, data: &CompanyUpdate) -> Result<ApiResponse> {
    let mut form = client.http().form()?;
    data.write_form(&mut form)?;
    client
        .http()
        .send_form(Method::PUT, TimberEndpoint::CompanyById(company_id.to_string()), form, None)
        .await
}

/// Marks a company as the default for the account.
pub async fn set_default(client: &Client, company_id: &str) -> Result<ApiResponse> {
    client
        .http()
        .send_empty(Method::PATCH, TimberEndpoint::CompanyDefault(company_id.to_string()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Environment, FieldKind};

    #[test]
    fn update_skips_absent_fields() {
        let update = CompanyUpdate::new()
            .with_name("Acme Trading")
            .with_sector(vec!["product".into(), "service".into()]);

        let mut form = FormPayload::new(Environment::Server).unwrap();
        update.write_form(&mut form).unwrap();

        let names: Vec<&str> = form.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "sector[0]", "sector[1]"]);
        assert_eq!(
            form.field("sector[1]"),
            Some(&FieldKind::Text("service".to_string()))
        );
    }

    #[test]
    fn company_deserializes_with_sparse_fields() {
        let company: Company = serde_json::from_value(serde_json::json!({
            "_id": "6777a90c5cd5d327209fa239",
            "name": "Acme",
            "sector": ["service"]
        }))
        .unwrap();
        assert_eq!(company.id, "6777a90c5cd5d327209fa239");
        assert_eq!(company.sector, ["service"]);
        assert!(company.trn.is_none());
    }
}
