use reqwest::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    Client,
    endpoints::TimberEndpoint,
    entities::{ListParameters, endpoint_utils},
    error::Result,
    form::{FileInput, FormPayload},
    transport::ApiResponse,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Create,
    Edit,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Edit => write!(f, "edit"),
        }
    }
}

/// A line on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// The billed party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
    pub country_code: String,
    pub mobile: String,
    pub address: String,
}

/// The issuing party.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biller {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biller_id: Option<String>,
    pub name: String,
    pub email: String,
    pub country_code: String,
    pub mobile: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trn: Option<String>,
}

/// An invoice as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub biller: Option<Biller>,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub amount_due: Option<Decimal>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    /// Link to the rendered invoice, when the server has produced one.
    #[serde(default)]
    pub invoice: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Fields for creating an invoice.
///
/// `items`, `customer` and `biller` are sent as JSON-encoded form fields, dates
/// as UTC timestamps and `logo` as a file part. Optional fields left unset are
/// not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceData {
    pub mode: Mode,
    pub payment_method: String,
    pub title: String,
    pub company: String,
    pub is_title_changed: bool,
    pub customer: Customer,
    pub biller: Biller,
    pub invoice_number: String,
    pub invoice_date: OffsetDateTime,
    pub due_date: Option<OffsetDateTime>,
    pub currency: String,
    pub items: Vec<LineItem>,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub sub_total: Decimal,
    pub vat_total: Decimal,
    pub discount_total: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
    pub amount_paid: Decimal,
    pub amount_due: Decimal,
    pub logo: Option<FileInput>,
    pub place_of_supply: Option<String>,
    pub wafeq: bool,
    pub zoho: bool,
}

impl InvoiceData {
    pub(crate) fn write_form(&self, form: &mut FormPayload) -> Result<()> {
        form.text("mode", self.mode)
            .text("payment_method", &self.payment_method)
            .text("title", &self.title)
            .text("company", &self.company)
            .text("isTitleChanged", self.is_title_changed);
        form.append_json("customer", &self.customer)?
            .append_json("biller", &self.biller)?
            .append_json("items", &self.items)?;
        form.text("invoice_number", &self.invoice_number)
            .append("invoice_date", self.invoice_date)?
            .append_opt("due_date", self.due_date)?
            .text("currency", &self.currency)
            .text_opt("terms", self.terms.as_ref())
            .text_opt("notes", self.notes.as_ref())
            .text("sub_total", self.sub_total)
            .text("vat_total", self.vat_total)
            .text("discount_total", self.discount_total)
            .text("shipping", self.shipping)
            .text("total", self.total)
            .text("amount_paid", self.amount_paid)
            .text("amount_due", self.amount_due)
            .append_opt("logo", self.logo.clone())?
            .text_opt("place_of_supply", self.place_of_supply.as_ref())
            .text("wafeq", self.wafeq)
            .text("zoho", self.zoho);
        Ok(())
    }
}

/// A partial invoice update, sent with the same field policy as [`InvoiceData`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceUpdate {
    pub mode: Option<Mode>,
    pub payment_method: Option<String>,
    pub title: Option<String>,
    pub is_title_changed: Option<bool>,
    pub customer: Option<Customer>,
    pub biller: Option<Biller>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<OffsetDateTime>,
    pub due_date: Option<OffsetDateTime>,
    pub currency: Option<String>,
    pub items: Option<Vec<LineItem>>,
    pub terms: Option<String>,
    pub notes: Option<String>,
    pub sub_total: Option<Decimal>,
    pub vat_total: Option<Decimal>,
    pub discount_total: Option<Decimal>,
    pub shipping: Option<Decimal>,
    pub total: Option<Decimal>,
    pub amount_paid: Option<Decimal>,
    pub amount_due: Option<Decimal>,
    pub logo: Option<FileInput>,
    pub place_of_supply: Option<String>,
}

impl InvoiceUpdate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: Some(Mode::Edit),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.is_title_changed = Some(true);
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<LineItem>) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn with_due_date(mut self, due_date: OffsetDateTime) -> Self {
        self.due_date = Some(due_date);
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub(crate) fn write_form(&self, form: &mut FormPayload) -> Result<()> {
        form.text_opt("mode", self.mode)
            .text_opt("payment_method", self.payment_method.as_ref())
            .text_opt("title", self.title.as_ref())
            .text_opt("isTitleChanged", self.is_title_changed);
        if let Some(customer) = &self.customer {
            form.append_json("customer", customer)?;
        }
        if let Some(biller) = &self.biller {
            form.append_json("biller", biller)?;
        }
        if let Some(items) = &self.items {
            form.append_json("items", items)?;
        }
        form.text_opt("invoice_number", self.invoice_number.as_ref())
            .append_opt("invoice_date", self.invoice_date)?
            .append_opt("due_date", self.due_date)?
            .text_opt("currency", self.currency.as_ref())
            .text_opt("terms", self.terms.as_ref())
            .text_opt("notes", self.notes.as_ref())
            .text_opt("sub_total", self.sub_total)
            .text_opt("vat_total", self.vat_total)
            .text_opt("discount_total", self.discount_total)
            .text_opt("shipping", self.shipping)
            .text_opt("total", self.total)
            .text_opt("amount_paid", self.amount_paid)
            .text_opt("amount_due", self.amount_due)
            .append_opt("logo", self.logo.clone())?
            .text_opt("place_of_supply", self.place_of_supply.as_ref());
        Ok(())
    }
}

/// Body of an invoice deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteInvoice {
    pub remarks: String,
}

impl DeleteInvoice {
    #[must_use]
    pub fn new(remarks: impl Into<String>) -> Self {
        Self {
            remarks: remarks.into(),
        }
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::Invoices, params).await
}

pub async fn get(client: &Client, invoice_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::Invoice(invoice_id.to_string())).await
}

pub async fn create(client: &Client, data: &InvoiceData) -> Result<ApiResponse> {
    let mut form = client.http().form()?;
    data.write_form(&mut form)?;
    client
        .http()
        .send_form(Method::POST, TimberEndpoint::Invoices, form, None)
        .await
}

pub async fn update(client: &Client, invoice_id: &str, data: &InvoiceUpdate) -> Result<ApiResponse> {
    let mut form = client.http().form()?;
    data.write_form(&mut form)?;
    client
        .http()
        .send_form(Method::PUT, TimberEndpoint::Invoice(invoice_id.to_string()), form, None)
        .await
}

/// Deletes an invoice. The remarks are forwarded as the request body.
pub async fn delete(client: &Client, invoice_id: &str, data: &DeleteInvoice) -> Result<ApiResponse> {
    client
        .http()
        .send_json(Method::DELETE, TimberEndpoint::Invoice(invoice_id.to_string()), data)
        .await
}

/// Downloads the rendered invoice document (PDF) as raw bytes.
pub async fn download(client: &Client, invoice_id: &str) -> Result<ApiResponse<Vec<u8>>> {
    client
        .http()
        .download(TimberEndpoint::InvoiceDownload(invoice_id.to_string()))
        .await
}
