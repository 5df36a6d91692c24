use std::sync::Arc;

use api::domain::envelope::ResponseStatus;
use api::domain::operation::{FactorialRequest, FibonacciRequest, PowerRequest};
use api::utilities::auth::StaticToken;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Match, Mock, ResponseTemplate};

use crate::helpers::{spawn_test_app, spawn_test_app_with};

// wiremock has no matcher for header *absence*, so this validates that a
// request went out without an Authorization header at all.
pub struct NoAuthorizationHeader;
impl Match for NoAuthorizationHeader {
    fn matches(&self, request: &wiremock::Request) -> bool {
        request.headers.get("authorization").is_none()
    }
}

#[tokio::test]
async fn power_request_body_is_sent_verbatim() {
    let app = spawn_test_app().await;
    Mock::given(method("POST"))
        .and(path("/api/power"))
        .and(body_json(json!({"base": 2.0, "exponent": 8.0})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": 256.0, "execution_time": 3})),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let envelope = app
        .api
        .calculate_power(&PowerRequest {
            base: 2.0,
            exponent: 8.0,
        })
        .await
        .expect("power call failed");

    assert_eq!(envelope.data, 256.0);
    assert_eq!(envelope.status, ResponseStatus::Success);
    assert_eq!(envelope.execution_time, 3);
}

#[tokio::test]
async fn factorial_request_body_is_sent_verbatim() {
    let app = spawn_test_app().await;
    Mock::given(method("POST"))
        .and(path("/api/factorial"))
        .and(body_json(json!({"n": 5})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"result": 120.0, "execution_time": 1})),
        )
        .expect(1)
        .mount(&app.server)
        .await;

    let envelope = app
        .api
        .calculate_factorial(&FactorialRequest { n: 5 })
        .await
        .expect("factorial call failed");
    assert_eq!(envelope.data, 120.0);
}

#[tokio::test]
async fn execution_time_defaults_to_zero_when_server_omits_it() {
    let app = spawn_test_app().await;
    Mock::given(method("POST"))
        .and(path("/api/fibonacci"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 55.0})))
        .expect(1)
        .mount(&app.server)
        .await;

    let envelope = app
        .api
        .calculate_fibonacci(&FibonacciRequest { n: 10 })
        .await
        .expect("fibonacci call failed");
    assert_eq!(envelope.execution_time, 0);
    assert_eq!(envelope.data, 55.0);
}

#[tokio::test]
async fn absent_token_sends_no_authorization_header() {
    let app = spawn_test_app().await;
    Mock::given(method("POST"))
        .and(path("/api/fibonacci"))
        .and(NoAuthorizationHeader)
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 8.0})))
        .expect(1)
        .mount(&app.server)
        .await;

    app.api
        .calculate_fibonacci(&FibonacciRequest { n: 6 })
        .await
        .expect("fibonacci call failed");
}

#[tokio::test]
async fn present_token_sends_bearer_authorization_header() {
    let app = spawn_test_app_with(Arc::new(StaticToken(String::from("seekrit")))).await;
    Mock::given(method("POST"))
        .and(path("/api/power"))
        .and(header("Authorization", "Bearer seekrit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 9.0})))
        .expect(1)
        .mount(&app.server)
        .await;

    app.api
        .calculate_power(&PowerRequest {
            base: 3.0,
            exponent: 2.0,
        })
        .await
        .expect("power call failed");
}

#[tokio::test]
async fn non_2xx_from_operation_endpoints_surfaces_as_error() {
    let app = spawn_test_app().await;
    for endpoint in ["/api/power", "/api/fibonacci", "/api/factorial"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&app.server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/api/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.server)
        .await;

    assert!(app
        .api
        .calculate_power(&PowerRequest {
            base: 2.0,
            exponent: 3.0
        })
        .await
        .is_err());
    assert!(app
        .api
        .calculate_fibonacci(&FibonacciRequest { n: 10 })
        .await
        .is_err());
    assert!(app
        .api
        .calculate_factorial(&FactorialRequest { n: 4 })
        .await
        .is_err());

    // Nothing is added optimistically; history stays whatever the server says.
    let history = app.api.get_history().await.expect("history call failed");
    assert!(history.is_empty());
}
