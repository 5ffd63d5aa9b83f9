use std::time::Duration;

use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::BASIC_AUTH;

/// Token endpoint answering a refresh grant, expected `calls` times.
#[allow(dead_code)]
pub async fn mount_refresh(server: &MockServer, response: ResponseTemplate, calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

/// Successful refresh that takes a while, to widen race windows.
#[allow(dead_code)]
pub fn slow_refresh_ok(access_token: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_json(serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600
        }))
        .set_delay(Duration::from_millis(200))
}

/// A GET under `/v1` that only answers when called with `token`.
#[allow(dead_code)]
pub async fn mount_api_get(
    server: &MockServer,
    api_path: &str,
    token: &str,
    body: serde_json::Value,
) {
    Mock::given(method("GET"))
        .and(path(format!("/v1{api_path}")))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}
