//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixedge-api`.

#![allow(dead_code)]

pub mod fixtures;
pub mod provider;

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use pixedge_api::setup::routes;
use pixedge_api::state::AppState;
use pixedge_api::ImageProvider;
use pixedge_core::config::DispatcherConfig;
use pixedge_core::constants::PROCESS_PREFIX;
use pixedge_core::Config;

use provider::MockProvider;

/// Dispatcher path for tests (e.g. `/api/process/resize`).
pub fn process_path(path: &str) -> String {
    format!("{}{}", PROCESS_PREFIX, path)
}

/// Test application: server plus the provider double it talks to.
pub struct TestApp {
    pub server: TestServer,
    pub provider: Arc<MockProvider>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

/// Setup test app backed by an echoing mock provider.
pub fn setup_test_app() -> TestApp {
    let provider = Arc::new(MockProvider::echo());
    let server = build_server(create_test_config(), provider.clone());
    TestApp { server, provider }
}

/// Setup test app with a caller-supplied provider double.
pub fn setup_test_app_with(provider: MockProvider) -> TestApp {
    let provider = Arc::new(provider);
    let server = build_server(create_test_config(), provider.clone());
    TestApp { server, provider }
}

/// Setup test app with a custom body limit.
pub fn setup_test_app_with_limit(max_file_size_bytes: usize) -> TestApp {
    let provider = Arc::new(MockProvider::echo());
    let config = Config::new(DispatcherConfig {
        max_file_size_bytes,
        ..DispatcherConfig::default()
    });
    let server = build_server(config, provider.clone());
    TestApp { server, provider }
}

/// Server whose provider is unreachable.
pub fn setup_unavailable_app() -> TestServer {
    build_server(create_test_config(), Arc::new(provider::UnreachableProvider))
}

/// Server whose provider panics.
pub fn setup_panicking_app() -> TestServer {
    build_server(create_test_config(), Arc::new(provider::PanickingProvider))
}

/// Serve a router on an ephemeral local port; returns its base URL.
pub async fn serve_on_local_port(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}

/// Real dispatcher over TCP, backed by an echoing mock provider.
pub async fn spawn_dispatcher() -> (String, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::echo());
    let config = create_test_config();
    let state = Arc::new(AppState::new(config.clone(), provider.clone()));
    let base_url = serve_on_local_port(routes::setup_routes(&config, state)).await;
    (base_url, provider)
}

fn build_server(config: Config, provider: Arc<dyn ImageProvider>) -> TestServer {
    let state = Arc::new(AppState::new(config.clone(), provider));
    let app = routes::setup_routes(&config, state);
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

fn create_test_config() -> Config {
    Config::new(DispatcherConfig {
        environment: "test".to_string(),
        ..DispatcherConfig::default()
    })
}
