
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use serde_json::json;
use test_utils::{SDK, assert_text_field, body_text, do_setup, mock_client, only_request};
use timber_rs::{
    CancellationToken, Error, FileInput, ListParameters, UploadOptions, UploadProgress,
    bank_statement::{BankStatement, BankStatementData},
    cheque::ChequeData,
    raw_expense::RawExpenseData,
};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn statement() -> FileInput {
    FileInput::blob(b"date,amount\n2025-04-01,100.00\n".to_vec(), "statement.csv").with_mime("text/csv")
}

/// Mounts a catch-all mock that fails the test if anything reaches the server.
async fn expect_no_requests(server: &MockServer) {
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn cheque_without_file_is_rejected_before_sending() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let client = mock_client(&server);
    let err = client.cheque().create(&ChequeData::default()).await.unwrap_err();

    assert!(matches!(err, Error::MissingField { field: "file" }));
    assert_eq!(err.to_string(), "file is required");
    assert!(err.is_precondition());
    Ok(())
}

#[tokio::test]
async fn cheque_upload_includes_company_when_given() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/customer/reconcile/cheque")))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "chq_1" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let data = ChequeData::new(FileInput::blob(vec![0xffu8, 0xd8, 0xff], "cheque.jpg")).with_company("c1");
    client.cheque().create(&data).await?;

    let body = body_text(&only_request(&server).await);
    assert!(body.contains("name=\"file\"; filename=\"cheque.jpg\""));
    assert_text_field(&body, "company", "c1");
    Ok(())
}

#[tokio::test]
async fn file_reference_is_sent_as_text() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/customer/reconcile/cheque")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let data = ChequeData::new(FileInput::reference("https://cdn.example.com/cheque.jpg"));
    client.cheque().create(&data).await?;

    let body = body_text(&only_request(&server).await);
    assert_text_field(&body, "file", "https://cdn.example.com/cheque.jpg");
    assert!(!body.contains("name=\"company\""));
    Ok(())
}

#[tokio::test]
async fn bank_statement_upload_reports_progress() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/customer/reconcile/bank-statement")))
        .and(matchers::header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "bs_1", "status": "processing" })))
        .expect(1)
        .mount(&server)
        .await;

    let events: Arc<Mutex<Vec<UploadProgress>>> = Arc::default();
    let recorder = Arc::clone(&events);
    let options = UploadOptions::default().with_progress(Arc::new(move |progress: UploadProgress| {
        recorder.lock().unwrap().push(progress);
    }));

    let size = 200 * 1024;
    let data = BankStatementData::new(FileInput::blob(vec![b'x'; size], "statement.csv")).with_options(options);

    let client = mock_client(&server);
    let statement: BankStatement = client.bank_statement().create(&data).await?.json()?;
    assert_eq!(statement.status.as_deref(), Some("processing"));

    let events = events.lock().unwrap();
    assert!(events.len() >= 2, "expected several progress events, got {}", events.len());
    assert!(events.windows(2).all(|w| w[0].loaded < w[1].loaded));
    let last = events.last().unwrap();
    assert_eq!(last.loaded, size as u64);
    assert_eq!(last.total, Some(size as u64));
    drop(events);

    let request = only_request(&server).await;
    assert!(request.body.iter().filter(|b| **b == b'x').count() >= size);
    Ok(())
}

#[tokio::test]
async fn bank_statement_without_file_is_rejected() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let client = mock_client(&server);
    let err = client
        .bank_statement()
        .create(&BankStatementData::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "file" }));
    Ok(())
}

#[tokio::test]
async fn cancelled_upload_sends_nothing() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let token = CancellationToken::new();
    token.cancel();
    let data = BankStatementData::new(statement()).with_options(UploadOptions::default().with_cancel(token));

    let client = mock_client(&server);
    let err = client.bank_statement().create(&data).await.unwrap_err();

    assert!(err.is_cancelled());
    assert!(!err.is_precondition());
    assert!(err.status_code().is_none());
    Ok(())
}

#[tokio::test]
async fn upload_cancelled_in_flight_fails_with_cancelled() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/customer/reconcile/bank-statement")))
        .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let data = BankStatementData::new(statement()).with_options(UploadOptions::default().with_cancel(token));
    let client = mock_client(&server);

    let started = Instant::now();
    let err = client.bank_statement().create(&data).await.unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
    Ok(())
}

#[tokio::test]
async fn raw_expense_requires_file_and_uploads_it() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/customer/raw-expense")))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client.raw_expense().create(&RawExpenseData::default()).await.unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "file" }));

    let data = RawExpenseData::new(FileInput::blob(b"receipt".to_vec(), "receipt.pdf"));
    client.raw_expense().create(&data).await?;
    let body = body_text(&only_request(&server).await);
    assert!(body.contains("name=\"file\"; filename=\"receipt.pdf\""));
    Ok(())
}

#[tokio::test]
async fn statements_can_be_listed() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{SDK}/customer/reconcile/bank-statement")))
        .and(matchers::query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "bs_1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let statements: Vec<BankStatement> = client
        .bank_statement()
        .list(&ListParameters::builder().with_page(1))
        .await?
        .json()?;
    assert_eq!(statements.len(), 1);
    Ok(())
}

#[tokio::test]
async fn blank_file_reference_is_rejected_before_sending() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    expect_no_requests(&server).await;

    let client = mock_client(&server);
    let blank = || FileInput::reference("");

    let err = client.cheque().create(&ChequeData::new(blank())).await.unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "file" }));

    let err = client
        .bank_statement()
        .create(&BankStatementData::new(blank()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "file" }));

    let err = client
        .raw_expense()
        .create(&RawExpenseData::new(blank()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingField { field: "file" }));
    Ok(())
}
