use std::sync::Arc;

use api::utilities::auth::{NoToken, TokenProvider};
use api::{ApiConfig, MathApi};
use wiremock::MockServer;

pub struct TestApp {
    pub server: MockServer,
    pub api: MathApi,
}

pub async fn spawn_test_app() -> TestApp {
    spawn_test_app_with(Arc::new(NoToken)).await
}

pub async fn spawn_test_app_with(tokens: Arc<dyn TokenProvider>) -> TestApp {
    let server = MockServer::start().await;
    let api =
        MathApi::new(ApiConfig::new(server.uri()), tokens).expect("could not build api client");
    TestApp { server, api }
}
