//! Integration tests for `RestClient` over the hyper transport, using wiremock.

use talon::{Error, HyperTransport, RestClient, TransportConfig};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

fn client_for(server: &MockServer) -> RestClient {
    RestClient::new(server.uri(), "json").expect("client")
}

#[tokio::test]
async fn test_post_success_returns_body_unchanged() {
    let mock_server = MockServer::start().await;

    let payload = serde_json::json!({"id": 1});

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&payload))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 1, "ok": true})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.post("/items", &payload, &[]).await.expect("response");

    assert_eq!(response.status(), 201);
    assert_eq!(response.text(), r#"{"id":1,"ok":true}"#);
}

#[tokio::test]
async fn test_post_failure_decodes_error_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(422).set_body_raw(
            r#"{"code":"INVALID"}"#.as_bytes().to_vec(),
            "application/vnd.error+json",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client
        .post("/items", &serde_json::json!({"id": 1}), &[])
        .await
        .expect_err("expected client error");

    assert_eq!(err.status(), Some(422));
    assert!(err.is_client_error());
    let document = err.document().expect("error document");
    assert_eq!(document.code(), Some("INVALID"));
}

#[tokio::test]
async fn test_failure_without_registered_decoder_keeps_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(
            ResponseTemplate::new(500).set_body_raw("upstream exploded".as_bytes().to_vec(), "text/plain"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("/items", &[]).await.expect_err("expected client error");

    assert!(err.is_server_error());
    assert!(err.document().is_none());

    let Error::Client(failure) = err else {
        panic!("expected client error, got something else");
    };
    let response = failure.response().expect("raw response");
    assert_eq!(response.status(), 500);
    assert_eq!(response.text(), "upstream exploded");
}

#[tokio::test]
async fn test_malformed_error_body_records_decode_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(502).set_body_raw(
            "<html>bad gateway</html>".as_bytes().to_vec(),
            "application/json",
        ))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.get("/items", &[]).await.expect_err("expected client error");

    let Error::Client(failure) = err else {
        panic!("expected client error, got something else");
    };
    assert!(failure.document().is_none());
    assert!(failure.decode_failure().is_some());
    assert_eq!(
        failure.response().expect("raw response").text(),
        "<html>bad gateway</html>"
    );
}

#[tokio::test]
async fn test_get_sends_accept_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items/1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": 1})))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/items/1", &[]).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.content_type(), Some("application/json"));
}

#[tokio::test]
async fn test_delete_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.delete("/items/1", &[]).await.expect("response");

    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_put_and_patch_requests() {
    let mock_server = MockServer::start().await;

    let payload = serde_json::json!({"name": "widget"});

    Mock::given(method("PUT"))
        .and(path("/items/1"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/items/1"))
        .and(body_json(&payload))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.put("/items/1", &payload, &[]).await.expect("put");
    client.patch("/items/1", &payload, &[]).await.expect("patch");
}

#[tokio::test]
async fn test_form_format_sends_urlencoded_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(201))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    client.set_format("form").expect("switch to form");

    let response = client
        .post("/items", &serde_json::json!({"name": "widget"}), &[])
        .await
        .expect("response");

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_query_parameters_reach_server() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "widget"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client.get("/search?q=widget", &[]).await.expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_custom_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .and(header("X-Custom-Header", "custom-value"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .get("/data", &[("X-Custom-Header", "custom-value")])
        .await
        .expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_connection_error_is_wrapped() {
    // Nothing listens on port 1.
    let client = RestClient::new("http://127.0.0.1:1", "json").expect("client");

    let err = client.get("/items", &[]).await.expect_err("expected failure");

    let Error::Client(failure) = err else {
        panic!("raw transport error escaped the dispatcher");
    };
    assert!(failure.response().is_none());
    assert!(failure.cause().is_some_and(Error::is_connection));
}

#[tokio::test]
async fn test_timeout_is_wrapped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let transport = HyperTransport::with_config(
        TransportConfig::builder()
            .timeout(std::time::Duration::from_millis(100))
            .build(),
    );
    let client =
        RestClient::with_transport(transport, mock_server.uri(), "json").expect("client");

    let err = client.get("/slow", &[]).await.expect_err("expected timeout");

    let Error::Client(failure) = err else {
        panic!("raw transport error escaped the dispatcher");
    };
    assert!(failure.cause().is_some_and(Error::is_timeout));
}
