#[macro_use]
extern crate tracing;

use std::sync::Arc;

use anyhow::{Context, Result};
use timber_rs::{
    Client, FileInput, ListParameters, UploadOptions, UploadProgress,
    bank_statement::{BankStatement, BankStatementData},
    invoice::Invoice,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    // Reads TIMBER_API_KEY (and optionally TIMBER_PARTNER_API_KEY / TIMBER_BASE_URL)
    let client = Client::from_env()?;

    let invoices: Vec<Invoice> = client
        .invoice()
        .list(&ListParameters::builder().with_page(1).with_limit(10))
        .await?
        .json()?;
    info!("found {} invoices", invoices.len());

    if let Some(invoice) = invoices.first() {
        let pdf = client.invoice().download(&invoice.id).await?;
        let file_name = format!("{}.pdf", invoice.invoice_number.as_deref().unwrap_or(&invoice.id));
        std::fs::write(&file_name, &pdf.data).with_context(|| format!("writing {file_name}"))?;
        info!(bytes = pdf.data.len(), "saved {file_name}");
    }

    // Optionally upload a bank statement given on the command line
    if let Some(path) = std::env::args().nth(1) {
        let options = UploadOptions::default().with_progress(Arc::new(|progress: UploadProgress| {
            match progress.total {
                Some(total) => info!("uploaded {}/{} bytes", progress.loaded, total),
                None => info!("uploaded {} bytes", progress.loaded),
            }
        }));
        let data = BankStatementData::new(FileInput::from_path(&path)?).with_options(options);
        let statement: BankStatement = client.bank_statement().create(&data).await?.json()?;
        info!("bank statement queued: {:?}", statement);
    }

    Ok(())
}
