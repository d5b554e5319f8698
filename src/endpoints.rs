use std::fmt;
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_HOST: &str = "https://api.timber.me";

/// Path below the host that every SDK endpoint lives under.
pub const SDK_PATH: &str = "api/v1/user/sdk/";

/// A typed representation of Timber API endpoints.
///
/// Each variant maps to a path relative to `<host>/api/v1/user/sdk/`. Resource
/// identifiers are opaque strings and are not validated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimberEndpoint {
    Register,

    Company,
    CompanyById(String),
    CompanyDefault(String),

    Invoices,
    Invoice(String),
    InvoiceDownload(String),
    InvoicePayments,
    InvoicePayment(String),
    InvoiceNumber,
    InvoiceNumberNext,
    InvoiceTemplates,
    InvoiceTemplate(String),
    InvoiceItems,
    InvoiceItem(String),
    InvoiceItemSuggestions,

    Expenses,
    Expense(String),
    RawExpenses,
    RawExpense(String),
    ExpenseCategories,
    ExpenseCategory(String),
    VendorPayments,
    VendorPayment(String),
    BillPayments,
    BillPayment(String),

    Customers,
    Customer(String),
    TaxRates,
    TaxRate(String),
    Salaries,
    Salary(String),
    Employees,
    Employee(String),

    Cheques,
    BankStatements,
}

impl TimberEndpoint {
    /// The fixed route prefix, the resource id (if any) and a trailing action.
    fn route(&self) -> (&'static str, Option<&str>, Option<&'static str>) {
        match self {
            Self::Register => ("auth/register", None, None),
            Self::Company => ("customer/company", None, None),
            Self::CompanyById(id) => ("customer/company", Some(id), None),
            Self::CompanyDefault(id) => ("customer/company", Some(id), Some("default")),
            Self::Invoices => ("customer/invoice", None, None),
            Self::Invoice(id) => ("customer/invoice", Some(id), None),
            Self::InvoiceDownload(id) => ("customer/invoice/download", Some(id), None),
            Self::InvoicePayments => ("customer/invoice-payment", None, None),
            Self::InvoicePayment(id) => ("customer/invoice-payment", Some(id), None),
            Self::InvoiceNumber => ("customer/invoice-number", None, None),
            Self::InvoiceNumberNext => ("customer/invoice-number/next", None, None),
            Self::InvoiceTemplates => ("customer/invoice-template", None, None),
            Self::InvoiceTemplate(id) => ("customer/invoice-template", Some(id), None),
            Self::InvoiceItems => ("customer/invoice-item", None, None),
            Self::InvoiceItem(id) => ("customer/invoice-item", Some(id), None),
            Self::InvoiceItemSuggestions => ("customer/invoice-item/suggestions", None, None),
            Self::Expenses => ("customer/expense", None, None),
            Self::Expense(id) => ("customer/expense", Some(id), None),
            Self::RawExpenses => ("customer/raw-expense", None, None),
            Self::RawExpense(id) => ("customer/raw-expense", Some(id), None),
            Self::ExpenseCategories => ("customer/expense-category", None, None),
            Self::ExpenseCategory(id) => ("customer/expense-category", Some(id), None),
            Self::VendorPayments => ("customer/vendor-payment", None, None),
            Self::VendorPayment(id) => ("customer/vendor-payment", Some(id), None),
            Self::BillPayments => ("customer/bill-payment", None, None),
            Self::BillPayment(id) => ("customer/bill-payment", Some(id), None),
            Self::Customers => ("customer/customer", None, None),
            Self::Customer(id) => ("customer/customer", Some(id), None),
            Self::TaxRates => ("customer/tax-rate", None, None),
            Self::TaxRate(id) => ("customer/tax-rate", Some(id), None),
            Self::Salaries => ("customer/salary", None, None),
            Self::Salary(id) => ("customer/salary", Some(id), None),
            Self::Employees => ("customer/employee", None, None),
            Self::Employee(id) => ("customer/employee", Some(id), None),
            Self::Cheques => ("customer/reconcile/cheque", None, None),
            Self::BankStatements => ("customer/reconcile/bank-statement", None, None),
        }
    }

    /// The endpoint path relative to the SDK root, with the id as given.
    #[must_use]
    pub fn path(&self) -> String {
        let (prefix, id, action) = self.route();
        let mut path = prefix.to_string();
        for segment in id.into_iter().chain(action) {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    /// Resolves the endpoint against an SDK root URL (see [`sdk_root`]).
    ///
    /// The resource id always becomes exactly one percent-encoded path segment,
    /// so `/`, `?` and `#` inside an id cannot change the route. Ids that are
    /// empty or a dot segment cannot be addressed and fail with
    /// [`Error::InvalidEndpoint`].
    pub fn to_url(&self, root: &Url) -> Result<Url> {
        let (prefix, id, action) = self.route();
        if id.is_some_and(|id| matches!(id, "" | "." | "..")) {
            return Err(Error::InvalidEndpoint);
        }

        let mut url = root.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| Error::InvalidEndpoint)?;
            segments
                .pop_if_empty()
                .extend(prefix.split('/'))
                .extend(id)
                .extend(action);
        }
        Ok(url)
    }
}

impl fmt::Display for TimberEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.path())
    }
}

/// Builds the SDK root URL (`<host>/api/v1/user/sdk/`) from an optional host override.
pub fn sdk_root(host: Option<&str>) -> Result<Url> {
    let host = host.filter(|h| !h.is_empty()).unwrap_or(DEFAULT_HOST);
    let mut base = Url::parse(host).map_err(|_| Error::InvalidEndpoint)?;
    if base.cannot_be_a_base() {
        return Err(Error::InvalidEndpoint);
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(SDK_PATH).map_err(|_| Error::InvalidEndpoint)
}
