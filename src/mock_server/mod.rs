//! Mock CRM API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the CRM
//! host's REST API for integration and end-to-end testing. Unlike wiremock
//! which mocks at the HTTP level per-test, this server maintains state across
//! requests, enabling realistic workflow testing: IDs are assigned on create,
//! server-computed fields appear in responses, partial updates merge, and
//! every request is logged for later inspection.
//!
//! # Example
//!
//! ```ignore
//! use crm_plugin_sdk::mock_server::MockServer;
//! use crm_plugin_sdk::{Client, CrmClient, Get};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let api = CrmClient::new("test-key", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let client = Client::get_by_id(&api, 1).await.unwrap();
//!     assert_eq!(client.first_name().unwrap(), Some("Jane"));
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod middleware;
mod server;
mod state;

pub use fixtures::{Fixtures, ADMIN_SESSION, CLIENT_SESSION};
pub use server::MockServer;
pub use state::{MockState, RecordedRequest, RESOURCES};
