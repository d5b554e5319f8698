
use anyhow::Result;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use test_utils::{SDK, assert_text_field, body_text, do_setup, mock_client, only_request};
use time::macros::datetime;
use timber_rs::{
    FileInput,
    invoice::{Biller, Customer, DeleteInvoice, Invoice, InvoiceData, InvoiceUpdate, LineItem, Mode},
};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn invoice_data() -> InvoiceData {
    InvoiceData {
        mode: Mode::Create,
        payment_method: "bank_transfer".into(),
        title: "March retainer".into(),
        company: "c1".into(),
        is_title_changed: false,
        customer: Customer {
            customer_id: None,
            name: "Jane".into(),
            email: "jane@example.com".into(),
            trn: None,
            country_code: "+971".into(),
            mobile: "500000000".into(),
            address: "Dubai".into(),
        },
        biller: Biller {
            biller_id: Some("b1".into()),
            name: "Acme".into(),
            email: "billing@acme.test".into(),
            country_code: "+971".into(),
            mobile: "511111111".into(),
            address: "Abu Dhabi".into(),
            trn: Some("TRN-1".into()),
        },
        invoice_number: "INV-0001".into(),
        invoice_date: datetime!(2025-04-01 00:00 UTC),
        due_date: None,
        currency: "AED".into(),
        items: vec![LineItem {
            id: "1".into(),
            title: "Design".into(),
            quantity: dec!(2),
            rate: dec!(150.5),
            vat: dec!(5),
            discount: dec!(0),
            total: dec!(316.5),
        }],
        terms: None,
        notes: Some("Thank you".into()),
        sub_total: dec!(301),
        vat_total: dec!(15.5),
        discount_total: dec!(0),
        shipping: dec!(0),
        total: dec!(316.5),
        amount_paid: dec!(0),
        amount_due: dec!(316.5),
        logo: Some(FileInput::blob(vec![0x89, b'P', b'N', b'G'], "logo.png").with_mime("image/png")),
        place_of_supply: None,
        wafeq: false,
        zoho: false,
    }
}

/// Extracts the raw value of a text field from a multipart body.
fn field_value<'a>(body: &'a str, name: &str) -> &'a str {
    let marker = format!("name=\"{name}\"\r\n\r\n");
    let start = body.find(&marker).expect("field present") + marker.len();
    let len = body[start..].find("\r\n").expect("field terminated");
    &body[start..start + len]
}

#[tokio::test]
async fn create_encodes_nested_fields_as_json_and_dates_as_iso() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/customer/invoice")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "inv_1", "invoice_number": "INV-0001" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let invoice: Invoice = client.invoice().create(&invoice_data()).await?.json()?;
    assert_eq!(invoice.id, "inv_1");

    let body = body_text(&only_request(&server).await);

    let items: Value = serde_json::from_str(field_value(&body, "items"))?;
    assert_eq!(
        items,
        json!([{
            "id": "1", "title": "Design", "quantity": 2.0, "rate": 150.5,
            "vat": 5.0, "discount": 0.0, "total": 316.5
        }])
    );
    let customer: Value = serde_json::from_str(field_value(&body, "customer"))?;
    assert_eq!(customer["name"], "Jane");
    assert!(customer.get("trn").is_none());

    assert_text_field(&body, "invoice_date", "2025-04-01T00:00:00.000Z");
    assert_text_field(&body, "total", "316.5");
    assert_text_field(&body, "wafeq", "false");
    assert_text_field(&body, "mode", "create");
    assert!(!body.contains("name=\"due_date\""));
    assert!(!body.contains("name=\"terms\""));
    assert!(body.contains("name=\"logo\"; filename=\"logo.png\""));
    Ok(())
}

#[tokio::test]
async fn update_sends_a_form_not_raw_data() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("PUT"))
        .and(matchers::path(format!("{SDK}/customer/invoice/inv_1")))
        .and(matchers::header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let update = InvoiceUpdate::new()
        .with_title("April retainer")
        .with_due_date(datetime!(2025-05-01 12:00 +04:00));
    client.invoice().update("inv_1", &update).await?;

    let body = body_text(&only_request(&server).await);
    assert_text_field(&body, "title", "April retainer");
    assert_text_field(&body, "isTitleChanged", "true");
    assert_text_field(&body, "due_date", "2025-05-01T08:00:00.000Z");
    assert!(!body.contains("name=\"items\""));
    Ok(())
}

#[tokio::test]
async fn delete_carries_remarks_body() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("DELETE"))
        .and(matchers::path(format!("{SDK}/customer/invoice/inv_1")))
        .and(matchers::header("content-type", "application/json"))
        .and(matchers::body_json(json!({ "remarks": "duplicate" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Invoice deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let response = client
        .invoice()
        .delete("inv_1", &DeleteInvoice::new("duplicate"))
        .await?;

    let message: timber_rs::MessageResponse = response.json()?;
    assert_eq!(message.message, "Invoice deleted");
    Ok(())
}

#[tokio::test]
async fn download_returns_raw_bytes() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    // Not valid UTF-8, so any text decoding would corrupt it.
    let pdf: Vec<u8> = [&b"%PDF-1.7\n"[..], &[0xff, 0xfe, 0x00, 0x80][..], &[0x25u8; 1024][..]].concat();
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{SDK}/customer/invoice/download/inv_1")))
        .respond_with(ResponseTemplate::new(200).set_body_raw(pdf.clone(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let response = client.invoice().download("inv_1").await?;

    assert_eq!(response.status, 200);
    assert_eq!(response.data.len(), pdf.len());
    assert_eq!(response.data, pdf);
    assert_eq!(response.headers.get("content-type").unwrap(), "application/pdf");
    Ok(())
}

#[tokio::test]
async fn download_errors_keep_status() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{SDK}/customer/invoice/download/missing")))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client.invoice().download("missing").await.unwrap_err();
    assert_eq!(err.status_code(), Some(reqwest::StatusCode::NOT_FOUND));
    assert_eq!(err.response_body(), Some("not found"));
    Ok(())
}
