//! Common test utilities for loyalty service integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use tempfile::TempDir;

use loyalty_core::MemberId;
use loyalty_service::{create_router, AppState, ServiceConfig};
use loyalty_store::RocksStore;

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A test member ID for member-authenticated requests.
    pub test_member_id: MemberId,
    /// The service API key for service-to-service requests.
    pub service_api_key: String,
    /// The admin API key for privileged requests.
    pub admin_api_key: String,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = RocksStore::open(temp_dir.path()).expect("Failed to open store");

        let service_api_key = "test-service-key".to_string();
        let admin_api_key = "test-admin-key".to_string();

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            service_api_key: Some(service_api_key.clone()),
            admin_api_key: Some(admin_api_key.clone()),
            ..ServiceConfig::default()
        };

        let state = AppState::new(Arc::new(store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_member_id = MemberId::generate();

        Self {
            server,
            _temp_dir: temp_dir,
            test_member_id,
            service_api_key,
            admin_api_key,
        }
    }

    /// Credit points to the test member through the earn endpoint.
    pub async fn fund_member(&self, points: i64) {
        self.server
            .post("/v1/points/earn")
            .add_header("x-api-key", &self.service_api_key)
            .add_header("x-service-name", "test-fixture")
            .json(&serde_json::json!({
                "member_id": self.test_member_id.to_string(),
                "points": points,
                "source": "purchase",
                "description": "Test funding"
            }))
            .await
            .assert_status_ok();
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
