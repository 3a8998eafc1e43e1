//! Integration tests for the signed client against a mocked DogeCloud API.
//!
//! Uses wiremock to stand in for `api.dogecloud.com`; every test gets its own server.

use std::time::Duration;

use dogecert_client::sign::{authorization, sign};
use dogecert_client::{ApiError, BodyMode, CdnApi, CertId, DogeCloudClient, Payload};
use dogecert_core::{CertBundle, Credentials};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ───────────────────────────────────────────────────

fn credentials() -> Credentials {
    Credentials {
        access_key: "test-ak".into(),
        secret_key: "test-sk".into(),
    }
}

fn client_for(server: &MockServer) -> DogeCloudClient {
    DogeCloudClient::new(credentials(), server.uri(), Duration::from_secs(5)).unwrap()
}

fn ok_envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "msg": "OK", "data": data}))
}

fn form(pairs: &[(&str, i64)]) -> Payload {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), json!(v)))
        .collect()
}

// ── call() ────────────────────────────────────────────────────

#[tokio::test]
async fn call_signs_form_body_and_returns_data() {
    let server = MockServer::start().await;
    let expected_auth = authorization("test-ak", &sign("test-sk", "/test/echo.json", "a=1&b=2"));

    Mock::given(method("POST"))
        .and(path("/test/echo.json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("authorization", expected_auth.as_str()))
        .and(body_string("a=1&b=2"))
        .respond_with(ok_envelope(json!({"id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;

    let data = client_for(&server)
        .call("/test/echo.json", &form(&[("a", 1), ("b", 2)]), BodyMode::Form)
        .await
        .unwrap();

    assert_eq!(data, json!({"id": "abc"}));
}

#[tokio::test]
async fn transmitted_body_is_the_signed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_envelope(json!(null)))
        .mount(&server)
        .await;

    let mut payload = Payload::new();
    payload.insert("cert_id".into(), json!("X"));
    client_for(&server)
        .call("/cdn/domain/config.json?domain=a.com", &payload, BodyMode::Json)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let req = &requests[0];
    let body = String::from_utf8(req.body.clone()).unwrap();
    assert_eq!(body, r#"{"cert_id":"X"}"#);

    let path_and_query = format!("{}?{}", req.url.path(), req.url.query().unwrap_or_default());
    let signed = authorization("test-ak", &sign("test-sk", &path_and_query, &body));
    assert_eq!(req.headers.get("authorization").unwrap().to_str().unwrap(), signed);
    assert_eq!(
        req.headers.get("content-type").unwrap().to_str().unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn non_200_envelope_is_application_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": 500, "msg": "bad key"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call("/x.json", &Payload::new(), BodyMode::Form)
        .await
        .unwrap_err();

    assert!(err.is_application(), "expected application error, got {err:?}");
    assert_eq!(err.code(), Some(500));
    assert!(err.to_string().contains("bad key"));
}

#[tokio::test]
async fn http_error_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call("/x.json", &Payload::new(), BodyMode::Form)
        .await
        .unwrap_err();

    match err {
        ApiError::Transport(ref e) => assert_eq!(e.status().map(|s| s.as_u16()), Some(502)),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .call("/x.json", &Payload::new(), BodyMode::Form)
        .await
        .unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };
    let client = DogeCloudClient::new(credentials(), uri, Duration::from_secs(2)).unwrap();

    let err = client
        .call("/x.json", &Payload::new(), BodyMode::Form)
        .await
        .unwrap_err();

    assert!(err.is_transport(), "expected transport error, got {err:?}");
}

#[tokio::test]
async fn slow_response_hits_configured_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ok_envelope(json!(null)).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let client =
        DogeCloudClient::new(credentials(), server.uri(), Duration::from_millis(200)).unwrap();
    let err = client
        .call("/x.json", &Payload::new(), BodyMode::Form)
        .await
        .unwrap_err();

    match err {
        ApiError::Transport(ref e) => assert!(e.is_timeout(), "expected timeout, got {e:?}"),
        other => panic!("expected transport error, got {other:?}"),
    }
}

// ── CdnApi ────────────────────────────────────────────────────

#[tokio::test]
async fn upload_certificate_posts_form_and_extracts_id() {
    let server = MockServer::start().await;
    let bundle = CertBundle::new("CERT PEM\n", "KEY PEM\n");
    let body = "note=prod&cert=CERT+PEM%0A&private=KEY+PEM%0A";

    Mock::given(method("POST"))
        .and(path("/cdn/cert/upload.json"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header(
            "authorization",
            authorization("test-ak", &sign("test-sk", "/cdn/cert/upload.json", body)).as_str(),
        ))
        .and(body_string(body))
        .respond_with(ok_envelope(json!({"id": 4321})))
        .expect(1)
        .mount(&server)
        .await;

    let id = client_for(&server).upload_certificate("prod", &bundle).await.unwrap();
    assert_eq!(id, CertId::Number(4321));
}

#[tokio::test]
async fn upload_without_id_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cdn/cert/upload.json"))
        .respond_with(ok_envelope(json!({"name": "no id here"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload_certificate("n", &CertBundle::new("c", "k"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::MissingField { field: "id" }));
}

#[tokio::test]
async fn bind_certificate_posts_json_with_domain_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cdn/domain/config.json"))
        .and(query_param("domain", "cdn.example.com"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"cert_id": 4321})))
        .respond_with(ok_envelope(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .bind_certificate("cdn.example.com", &CertId::Number(4321))
        .await
        .unwrap();
}

#[tokio::test]
async fn bind_certificate_surfaces_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cdn/domain/config.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"code": 404, "msg": "domain not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .bind_certificate("missing.example.com", &CertId::Text("c1".into()))
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(404));
    assert!(err.to_string().contains("domain not found"));
}
