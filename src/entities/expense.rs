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

/// A line on an expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vat: Decimal,
}

/// An expense, optionally with its receipt attached.
///
/// `items` is sent as a JSON-encoded form field and dates as UTC timestamps.
/// Fields left unset are not sent, so the same type serves for updates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseData {
    pub title: Option<String>,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub expense_date: Option<OffsetDateTime>,
    pub due_date: Option<OffsetDateTime>,
    pub currency: Option<String>,
    pub items: Option<Vec<ExpenseItem>>,
    pub total: Option<Decimal>,
    pub vat_total: Option<Decimal>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub file: Option<FileInput>,
}

impl ExpenseData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = Some(vendor.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_expense_date(mut self, expense_date: OffsetDateTime) -> Self {
        self.expense_date = Some(expense_date);
        self
    }

    #[must_use]
    pub fn with_items(mut self, items: Vec<ExpenseItem>) -> Self {
        self.items = Some(items);
        self
    }

    #[must_use]
    pub fn with_total(mut self, total: Decimal) -> Self {
        self.total = Some(total);
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: FileInput) -> Self {
        self.file = Some(file);
        self
    }

    pub(crate) fn write_form(&self, form: &mut FormPayload) -> Result<()> {
        form.text_opt("title", self.title.as_ref())
            .text_opt("vendor", self.vendor.as_ref())
            .text_opt("category", self.category.as_ref())
            .append_opt("expense_date", self.expense_date)?
            .append_opt("due_date", self.due_date)?
            .text_opt("currency", self.currency.as_ref());
        if let Some(items) = &self.items {
            form.append_json("items", items)?;
        }
        form.text_opt("total", self.total)
            .text_opt("vat_total", self.vat_total)
            .text_opt("payment_method", self.payment_method.as_ref())
            .text_opt("notes", self.notes.as_ref())
            .append_opt("file", self.file.clone())?;
        Ok(())
    }
}

pub async fn list(client: &Client, params: &ListParameters) -> Result<ApiResponse> {
    endpoint_utils::list(client, TimberEndpoint::Expenses, params).await
}

pub async fn get(client: &Client, expense_id: &str) -> Result<ApiResponse> {
    endpoint_utils::get(client, TimberEndpoint::Expense(expense_id.to_string())).await
}

pub async fn create(client: &Client, data: &ExpenseData) -> Result<ApiResponse> {
    let mut form = client.http().form()?;
    data.write_form(&mut form)?;
    client
        .http()
        .send_form(Method::POST, TimberEndpoint::Expenses, form, None)
        .await
}

pub async fn update(client: &Client, expense_id: &str, data: &ExpenseData) -> Result<ApiResponse> {
    let mut form = client.http().form()?;
    data.write_form(&mut form)?;
    client
        .http()
        .send_form(Method::PUT, TimberEndpoint::Expense(expense_id.to_string()), form, None)
        .await
}

pub async fn delete(client: &Client, expense_id: &str) -> Result<ApiResponse> {
    endpoint_utils::delete(client, TimberEndpoint::Expense(expense_id.to_string())).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{Environment, FieldKind};
    use rust_decimal_macros::dec;

    #[test]
    fn receipt_is_sent_as_file_part() {
        let expense = ExpenseData::new()
            .with_title("Office chairs")
            .with_total(dec!(1200.50))
            .with_file(FileInput::blob(vec![0u8; 10], "receipt.jpg"));

        let mut form = FormPayload::new(Environment::Server).unwrap();
        expense.write_form(&mut form).unwrap();

        assert_eq!(
            form.field("total"),
            Some(&FieldKind::Text("1200.50".to_string()))
        );
        assert_eq!(
            form.field("file"),
            Some(&FieldKind::File {
                file_name: "receipt.jpg".to_string(),
                size: 10
            })
        );
    }
}
