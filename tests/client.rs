
use anyhow::Result;
use serde_json::json;
use test_utils::{API_KEY, SDK, do_setup, mock_client, mock_client_with, only_request};
use timber_rs::{
    Client, ClientOptions, Error, ListParameters,
    auth::{Language, RegisterCompany, RegisterUserRequest},
};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

fn registration() -> RegisterUserRequest {
    RegisterUserRequest {
        name: "John Doe".into(),
        email: "john@example.com".into(),
        partner: "partner-id".into(),
        plan: "plan-id".into(),
        domains: vec!["https://example.com".into()],
        company: RegisterCompany {
            name: "John Enterprises".into(),
            email: "john@example.com".into(),
            language: Language::English,
            currency: "AED".into(),
            tax_number: "123456789".into(),
            address: "123 Main St".into(),
            city: "Dubai".into(),
            state: "Dubai".into(),
            zip_code: None,
            country: "UAE".into(),
            financial_start_date: "2025-04-01T00:00:00.000+00:00".into(),
            license_expiry: "2026-04-01T00:00:00.000+00:00".into(),
            license_issue_date: "2025-04-13T00:00:00.000+00:00".into(),
            sector: vec!["product".into(), "service".into()],
            user_role: "CEO".into(),
            business_years: "1-2".into(),
            size: "1-10".into(),
            current_method: "Accountant".into(),
            purpose: "Financial Services".into(),
            country_code: "+971".into(),
            mobile: "5522334455".into(),
            logo: Some("https://example.com/logo.png".into()),
            license: "https://example.com/license.png".into(),
            license_number: "123456789".into(),
            license_authority: "IFZA (Dubai)".into(),
            trn: "222333222332323".into(),
        },
    }
}

#[test]
fn construction_without_any_key_fails() {
    do_setup();
    let err = Client::new("", ClientOptions::default()).unwrap_err();
    assert!(matches!(err, Error::MissingCredential));
    assert!(err.is_precondition());
    assert_eq!(err.to_string(), "API key is required");
}

#[tokio::test]
async fn tenant_calls_carry_api_key_header() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{SDK}/customer/invoice")))
        .and(matchers::header("authorization", format!("ApiKey {API_KEY}").as_str()))
        .and(matchers::header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "_id": "inv_1" }])))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let response = client.invoice().list(&ListParameters::default()).await?;

    assert_eq!(response.status, 200);
    assert_eq!(response.data[0]["_id"], "inv_1");

    // No body, so no content type is declared.
    let request = only_request(&server).await;
    assert!(request.headers.get("content-type").is_none());
    Ok(())
}

#[tokio::test]
async fn list_parameters_are_sent_as_query() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{SDK}/customer/invoice")))
        .and(matchers::query_param("page", "2"))
        .and(matchers::query_param("limit", "25"))
        .and(matchers::query_param("search", "acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let params = ListParameters::builder()
        .with_page(2)
        .with_limit(25)
        .with_search("acme");
    client.invoice().list(&params).await?;

    let request = only_request(&server).await;
    assert!(request.url.query_pairs().all(|(key, _)| key != "sort"));
    Ok(())
}

#[tokio::test]
async fn registration_uses_partner_bearer() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/auth/register")))
        .and(matchers::header("authorization", "Bearer partner-secret"))
        .and(matchers::header("content-type", "application/json"))
        .and(matchers::body_partial_json(json!({
            "email": "john@example.com",
            "company": { "language": "English", "sector": ["product", "service"] }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "api_key": "new-key" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client_with(
        &server,
        ClientOptions::builder().with_partner_api_key("partner-secret"),
    );
    let response = client.auth().create(&registration()).await?;

    assert_eq!(response.status, 201);
    assert_eq!(response.data["api_key"], "new-key");
    Ok(())
}

#[tokio::test]
async fn registration_falls_back_to_api_key() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("POST"))
        .and(matchers::path(format!("{SDK}/auth/register")))
        .and(matchers::header("authorization", format!("ApiKey {API_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let response = client.auth().create(&registration()).await?;

    // Empty body passes through as null.
    assert!(response.data.is_null());
    Ok(())
}

#[tokio::test]
async fn partner_only_client_cannot_make_tenant_calls() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = Client::new(
        "",
        ClientOptions::builder()
            .with_partner_api_key("partner-secret")
            .with_base_url(server.uri()),
    )?;

    let err = client.invoice().get("inv_1").await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential));
    Ok(())
}

#[tokio::test]
async fn error_statuses_pass_through_verbatim() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    let body = r#"{"message":"Invoice not found"}"#;
    Mock::given(matchers::method("GET"))
        .and(matchers::path(format!("{SDK}/customer/invoice/missing")))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-request-id", "req-42")
                .set_body_string(body),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client.invoice().get("missing").await.unwrap_err();

    let Error::Status {
        status,
        url,
        headers,
        body: received,
        ..
    } = &err
    else {
        panic!("expected a status error, got {err:?}");
    };
    assert_eq!(*status, 404);
    assert!(url.ends_with("/customer/invoice/missing"));
    assert_eq!(headers.get("x-request-id").unwrap(), "req-42");
    assert_eq!(received, body);
    assert!(!err.is_precondition());
    Ok(())
}

#[tokio::test]
async fn non_json_bodies_are_kept_as_text() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::method("PATCH"))
        .and(matchers::path(format!("{SDK}/customer/company/c1/default")))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let response = client.company().default("c1").await?;
    assert_eq!(response.data, json!("OK"));
    Ok(())
}

#[tokio::test]
async fn ids_cannot_escape_their_resource() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::path(format!("{SDK}/customer/company")))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = mock_client(&server);
    client.invoice().get("../company").await?;
    client.invoice().delete("abc?x=1", &timber_rs::invoice::DeleteInvoice::new("typo")).await?;

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].url.path(), format!("{SDK}/customer/invoice/..%2Fcompany"));
    assert_eq!(requests[1].url.path(), format!("{SDK}/customer/invoice/abc%3Fx=1"));
    assert!(requests[1].url.query().is_none());
    Ok(())
}

#[tokio::test]
async fn empty_id_fails_before_sending() -> Result<()> {
    do_setup();
    let server = MockServer::start().await;
    Mock::given(matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = mock_client(&server);
    let err = client.customer().delete("").await.unwrap_err();
    assert!(matches!(err, Error::InvalidEndpoint));
    assert!(err.is_precondition());
    Ok(())
}
