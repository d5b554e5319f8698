use reqwest::header::HeaderValue;
use url::Url;

use crate::endpoints::sdk_root;
use crate::entities::{
    ListParameters, auth, bank_statement, bill_payment, cheque, company, customer, employee,
    expense, expense_category, invoice, invoice_item, invoice_number, invoice_payment,
    invoice_template, raw_expense, salary, tax_rate, vendor_payment,
};
use crate::error::{Error, Result};
use crate::form::Environment;
use crate::transport::{ApiResponse, Transport};

/// Environment variable holding the tenant API key.
pub const ENV_API_KEY: &str = "TIMBER_API_KEY";
/// Environment variable holding the partner API key used for registration.
pub const ENV_PARTNER_API_KEY: &str = "TIMBER_PARTNER_API_KEY";
/// Environment variable overriding the API host.
pub const ENV_BASE_URL: &str = "TIMBER_BASE_URL";

/// Construction options for [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// API host, defaults to `https://api.timber.me`. The SDK path is appended.
    pub base_url: Option<String>,
    /// Partner key. Only used to authorize user registration.
    pub partner_api_key: Option<String>,
    /// Overrides [`Environment::detect`].
    pub environment: Option<Environment>,
    /// A preconfigured HTTP client (proxies, timeouts, ...).
    pub http_client: Option<reqwest::Client>,
}

impl ClientOptions {
    #[must_use]
    pub fn builder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_partner_api_key(mut self, partner_api_key: impl Into<String>) -> Self {
        self.partner_api_key = Some(partner_api_key.into());
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    #[must_use]
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }
}

/// The client used for interacting with the Timber API.
///
/// Holds two transports sharing one connection pool: the tenant transport,
/// authorized with `ApiKey <key>` and used by every resource service, and the
/// registration transport, authorized with `Bearer <partner key>` when a
/// partner key was configured. Both are immutable after construction, so a
/// `Client` can be shared freely across tasks.
#[derive(Clone, Debug)]
pub struct Client {
    http: Transport,
    auth_http: Transport,
}

impl Client {
    /// Creates a client for the given tenant API key.
    ///
    /// The key may be empty when `options.partner_api_key` is set; such a
    /// client can only register users and every tenant call fails with
    /// [`Error::MissingCredential`].
    pub fn new(api_key: impl Into<String>, options: ClientOptions) -> Result<Self> {
        let api_key = Some(api_key.into()).filter(|key| !key.is_empty());
        let partner_api_key = options.partner_api_key.filter(|key| !key.is_empty());
        if api_key.is_none() && partner_api_key.is_none() {
            return Err(Error::MissingCredential);
        }

        let root = sdk_root(options.base_url.as_deref())?;
        let environment = options.environment.unwrap_or_else(Environment::detect);
        let http = match options.http_client {
            Some(http) => http,
            None => reqwest::Client::builder().build()?,
        };

        let tenant = api_key
            .as_deref()
            .map(|key| authorization("ApiKey", key))
            .transpose()?;
        let registration = match partner_api_key.as_deref() {
            Some(key) => Some(authorization("Bearer", key)?),
            None => tenant.clone(),
        };

        debug!(
            root = %root,
            %environment,
            tenant = tenant.is_some(),
            partner = partner_api_key.is_some(),
            "created Timber client"
        );

        Ok(Self {
            http: Transport::new(http.clone(), root.clone(), tenant, environment),
            auth_http: Transport::new(http, root, registration, environment),
        })
    }

    /// Creates a client from `TIMBER_API_KEY`, `TIMBER_PARTNER_API_KEY` and
    /// `TIMBER_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        let options = ClientOptions {
            base_url: std::env::var(ENV_BASE_URL).ok(),
            partner_api_key: std::env::var(ENV_PARTNER_API_KEY).ok(),
            ..ClientOptions::default()
        };
        Self::new(api_key, options)
    }

    /// The SDK root every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        self.http.root()
    }

    /// The environment multipart payloads are built for.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.http.environment()
    }

    pub(crate) fn http(&self) -> &Transport {
        &self.http
    }

    pub(crate) fn auth_http(&self) -> &Transport {
        &self.auth_http
    }

    /// Access the registration API
    #[must_use]
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi { client: self }
    }

    /// Access the company API
    #[must_use]
    pub fn company(&self) -> CompanyApi<'_> {
        CompanyApi { client: self }
    }

    /// Access the invoices API
    #[must_use]
    pub fn invoice(&self) -> InvoiceApi<'_> {
        InvoiceApi { client: self }
    }

    /// Access the invoice payments API
    #[must_use]
    pub fn invoice_payment(&self) -> InvoicePaymentApi<'_> {
        InvoicePaymentApi { client: self }
    }

    /// Access the invoice numbering API
    #[must_use]
    pub fn invoice_number(&self) -> InvoiceNumberApi<'_> {
        InvoiceNumberApi { client: self }
    }

    /// Access the invoice templates API
    #[must_use]
    pub fn invoice_template(&self) -> InvoiceTemplateApi<'_> {
        InvoiceTemplateApi { client: self }
    }

    /// Access the saved invoice items API
    #[must_use]
    pub fn invoice_item(&self) -> InvoiceItemApi<'_> {
        InvoiceItemApi { client: self }
    }

    /// Access the expenses API
    #[must_use]
    pub fn expense(&self) -> ExpenseApi<'_> {
        ExpenseApi { client: self }
    }

    /// Access the raw expenses (receipt upload) API
    #[must_use]
    pub fn raw_expense(&self) -> RawExpenseApi<'_> {
        RawExpenseApi { client: self }
    }

    /// Access the expense categories API
    #[must_use]
    pub fn expense_category(&self) -> ExpenseCategoryApi<'_> {
        ExpenseCategoryApi { client: self }
    }

    /// Access the vendor payments API
    #[must_use]
    pub fn vendor_payment(&self) -> VendorPaymentApi<'_> {
        VendorPaymentApi { client: self }
    }

    /// Access the bill payments API
    #[must_use]
    pub fn bill_payment(&self) -> BillPaymentApi<'_> {
        BillPaymentApi { client: self }
    }

    /// Access the customers API
    #[must_use]
    pub fn customer(&self) -> CustomerApi<'_> {
        CustomerApi { client: self }
    }

    /// Access the tax rates API
    #[must_use]
    pub fn tax_rate(&self) -> TaxRateApi<'_> {
        TaxRateApi { client: self }
    }

    /// Access the salaries API
    #[must_use]
    pub fn salary(&self) -> SalaryApi<'_> {
        SalaryApi { client: self }
    }

    /// Access the employees API
    #[must_use]
    pub fn employee(&self) -> EmployeeApi<'_> {
        EmployeeApi { client: self }
    }

    /// Access the cheque reconciliation API
    #[must_use]
    pub fn cheque(&self) -> ChequeApi<'_> {
        ChequeApi { client: self }
    }

    /// Access the bank statement reconciliation API
    #[must_use]
    pub fn bank_statement(&self) -> BankStatementApi<'_> {
        BankStatementApi { client: self }
    }
}

fn authorization(scheme: &str, key: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::from_str(&format!("{scheme} {key}"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// API handler for user registration
#[derive(Debug)]
pub struct AuthApi<'a> {
    client: &'a Client,
}

impl AuthApi<'_> {
    /// Register a new user and company. Returns the created user and their SDK key.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &auth::RegisterUserRequest) -> Result<ApiResponse> {
        auth::register(self.client, data).await
    }
}

/// API handler for the company endpoints
#[derive(Debug)]
pub struct CompanyApi<'a> {
    client: &'a Client,
}

impl CompanyApi<'_> {
    /// Fetch the company the API key belongs to
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<ApiResponse> {
        company::get(self.client).await
    }

    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &company::CompanyData) -> Result<ApiResponse> {
        company::create(self.client, data).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, company_id: &str, data: &company::CompanyUpdate) -> Result<ApiResponse> {
        company::update(self.client, company_id, data).await
    }

    /// Make a company the account's default
    #[instrument(skip(self))]
    pub async fn default(&self, company_id: &str) -> Result<ApiResponse> {
        company::set_default(self.client, company_id).await
    }
}

/// API handler for the invoice endpoints
#[derive(Debug)]
pub struct InvoiceApi<'a> {
    client: &'a Client,
}

impl InvoiceApi<'_> {
    /// List invoices with optional paging
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        invoice::list(self.client, parameters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, invoice_id: &str) -> Result<ApiResponse> {
        invoice::get(self.client, invoice_id).await
    }

    /// Create an invoice, uploading its logo if one is given
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &invoice::InvoiceData) -> Result<ApiResponse> {
        invoice::create(self.client, data).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, invoice_id: &str, data: &invoice::InvoiceUpdate) -> Result<ApiResponse> {
        invoice::update(self.client, invoice_id, data).await
    }

    /// Delete an invoice, recording why
    #[instrument(skip(self, data))]
    pub async fn delete(&self, invoice_id: &str, data: &invoice::DeleteInvoice) -> Result<ApiResponse> {
        invoice::delete(self.client, invoice_id, data).await
    }

    /// Download the invoice PDF
    #[instrument(skip(self))]
    pub async fn download(&self, invoice_id: &str) -> Result<ApiResponse<Vec<u8>>> {
        invoice::download(self.client, invoice_id).await
    }
}

/// API handler for invoice payments
#[derive(Debug)]
pub struct InvoicePaymentApi<'a> {
    client: &'a Client,
}

impl InvoicePaymentApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        invoice_payment::list(self.client, parameters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, payment_id: &str) -> Result<ApiResponse> {
        invoice_payment::get(self.client, payment_id).await
    }

    /// Record a payment against an invoice
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &invoice_payment::InvoicePaymentRequest) -> Result<ApiResponse> {
        invoice_payment::create(self.client, data).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, payment_id: &str) -> Result<ApiResponse> {
        invoice_payment::delete(self.client, payment_id).await
    }
}

/// API handler for invoice numbering settings
#[derive(Debug)]
pub struct InvoiceNumberApi<'a> {
    client: &'a Client,
}

impl InvoiceNumberApi<'_> {
    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<ApiResponse> {
        invoice_number::get(self.client).await
    }

    /// Preview the next invoice number
    #[instrument(skip(self))]
    pub async fn next(&self) -> Result<ApiResponse> {
        invoice_number::next(self.client).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, data: &invoice_number::UpdateInvoiceNumberRequest) -> Result<ApiResponse> {
        invoice_number::update(self.client, data).await
    }
}

/// API handler for invoice terms and notes templates
#[derive(Debug)]
pub struct InvoiceTemplateApi<'a> {
    client: &'a Client,
}

impl InvoiceTemplateApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        invoice_template::list(self.client, parameters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, template_id: &str) -> Result<ApiResponse> {
        invoice_template::get(self.client, template_id).await
    }

    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &invoice_template::InvoiceTemplateRequest) -> Result<ApiResponse> {
        invoice_template::create(self.client, data).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(
        &self,
        template_id: &str,
        data: &invoice_template::InvoiceTemplateRequest,
    ) -> Result<ApiResponse> {
        invoice_template::update(self.client, template_id, data).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, template_id: &str) -> Result<ApiResponse> {
        invoice_template::delete(self.client, template_id).await
    }
}

/// API handler for saved invoice items
#[derive(Debug)]
pub struct InvoiceItemApi<'a> {
    client: &'a Client,
}

impl InvoiceItemApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        invoice_item::list(self.client, parameters).await
    }

    /// Search saved items by title
    #[instrument(skip(self))]
    pub async fn suggestions(&self, parameters: &invoice_item::SuggestionParameters) -> Result<ApiResponse> {
        invoice_item::suggestions(self.client, parameters).await
    }

    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &invoice_item::InvoiceItemRequest) -> Result<ApiResponse> {
        invoice_item::create(self.client, data).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, item_id: &str, data: &invoice_item::InvoiceItemRequest) -> Result<ApiResponse> {
        invoice_item::update(self.client, item_id, data).await
    }
}

/// API handler for expenses
#[derive(Debug)]
pub struct ExpenseApi<'a> {
    client: &'a Client,
}

impl ExpenseApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        expense::list(self.client, parameters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, expense_id: &str) -> Result<ApiResponse> {
        expense::get(self.client, expense_id).await
    }

    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &expense::ExpenseData) -> Result<ApiResponse> {
        expense::create(self.client, data).await
    }

    #[instrument(skip(self, data))]
    pub async fn update(&self, expense_id: &str, data: &expense::ExpenseData) -> Result<ApiResponse> {
        expense::update(self.client, expense_id, data).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, expense_id: &str) -> Result<ApiResponse> {
        expense::delete(self.client, expense_id).await
    }
}

/// API handler for raw expenses
#[derive(Debug)]
pub struct RawExpenseApi<'a> {
    client: &'a Client,
}

impl RawExpenseApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        raw_expense::list(self.client, parameters).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, raw_expense_id: &str) -> Result<ApiResponse> {
        raw_expense::get(self.client, raw_expense_id).await
    }

    /// Upload a receipt for extraction. Fails with `MissingField` when no file is set.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &raw_expense::RawExpenseData) -> Result<ApiResponse> {
        raw_expense::create(self.client, data).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_expense_id: &str) -> Result<ApiResponse> {
        raw_expense::delete(self.client, raw_expense_id).await
    }
}

// Plain JSON resources sharing the list/get/create/update/delete shape.
macro_rules! json_resource_api {
    ($(#[$doc:meta])* $api:ident, $module:ident, $request:ident, $update:ident, $id:ident) => {
        $(#[$doc])*
        #[derive(Debug)]
        pub struct $api<'a> {
            client: &'a Client,
        }

        impl $api<'_> {
            #[instrument(skip(self))]
            pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
                $module::list(self.client, parameters).await
            }

            #[instrument(skip(self))]
            pub async fn get(&self, $id: &str) -> Result<ApiResponse> {
                $module::get(self.client, $id).await
            }

            #[instrument(skip(self, data))]
            pub async fn create(&self, data: &$module::$request) -> Result<ApiResponse> {
                $module::create(self.client, data).await
            }

            /// Sends only the fields that are set.
            #[instrument(skip(self, data))]
            pub async fn update(&self, $id: &str, data: &$module::$update) -> Result<ApiResponse> {
                $module::update(self.client, $id, data).await
            }

            #[instrument(skip(self))]
            pub async fn delete(&self, $id: &str) -> Result<ApiResponse> {
                $module::delete(self.client, $id).await
            }
        }
    };
}

json_resource_api!(
    /// API handler for expense categories
    ExpenseCategoryApi, expense_category, ExpenseCategoryRequest, UpdateExpenseCategoryRequest, category_id
);
json_resource_api!(
    /// API handler for vendor payments
    VendorPaymentApi, vendor_payment, VendorPaymentRequest, UpdateVendorPaymentRequest, payment_id
);
json_resource_api!(
    /// API handler for bill payments
    BillPaymentApi, bill_payment, BillPaymentRequest, UpdateBillPaymentRequest, payment_id
);
json_resource_api!(
    /// API handler for customers
    CustomerApi, customer, CustomerRequest, UpdateCustomerRequest, customer_id
);
json_resource_api!(
    /// API handler for tax rates
    TaxRateApi, tax_rate, TaxRateRequest, UpdateTaxRateRequest, tax_rate_id
);
json_resource_api!(
    /// API handler for salaries
    SalaryApi, salary, SalaryRequest, UpdateSalaryRequest, salary_id
);
json_resource_api!(
    /// API handler for employees
    EmployeeApi, employee, EmployeeRequest, UpdateEmployeeRequest, employee_id
);

/// API handler for cheque reconciliation
#[derive(Debug)]
pub struct ChequeApi<'a> {
    client: &'a Client,
}

impl ChequeApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        cheque::list(self.client, parameters).await
    }

    /// Upload a cheque scan. Fails with `MissingField` when no file is set.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &cheque::ChequeData) -> Result<ApiResponse> {
        cheque::create(self.client, data).await
    }
}

/// API handler for bank statement reconciliation
#[derive(Debug)]
pub struct BankStatementApi<'a> {
    client: &'a Client,
}

impl BankStatementApi<'_> {
    #[instrument(skip(self))]
    pub async fn list(&self, parameters: &ListParameters) -> Result<ApiResponse> {
        bank_statement::list(self.client, parameters).await
    }

    /// Upload a bank statement. Fails with `MissingField` when no file is set,
    /// and with `Cancelled` if the upload's token fires first.
    #[instrument(skip(self, data))]
    pub async fn create(&self, data: &bank_statement::BankStatementData) -> Result<ApiResponse> {
        bank_statement::create(self.client, data).await
    }
}
