//! Mock CRM API server.
//!
//! Provides an axum-based HTTP server that simulates the CRM host's API.

use std::sync::Arc;

use axum::{
    extract::Extension,
    middleware::from_fn_with_state,
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;

use super::fixtures::Fixtures;
use super::handlers::{self, Resource};
use super::middleware::record_and_authorize;
use super::state::{MockState, RecordedRequest, RESOURCES};

/// A mock CRM API server for testing.
///
/// The server runs in the background and can be used to test the SDK
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Fixtures::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `CrmClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Snapshot of every request received so far.
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.read().await.requests.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        let mut router = Router::new()
            // Session user
            .route("/current-user", get(handlers::current_user))
            // Health check
            .route("/health", get(health_check));

        // Entity resources
        for resource in RESOURCES {
            router = router.nest(&format!("/{resource}"), Self::resource_routes(resource));
        }

        router
            .layer(ServiceBuilder::new().layer(from_fn_with_state(
                state.clone(),
                record_and_authorize,
            )))
            .with_state(state)
    }

    /// Collection and item routes of one resource.
    fn resource_routes(resource: &'static str) -> Router<Arc<RwLock<MockState>>> {
        let mut routes = Router::new()
            .route(
                "/",
                get(handlers::list_entities).post(handlers::create_entity),
            )
            .route(
                "/:id",
                get(handlers::get_entity)
                    .patch(handlers::update_entity)
                    .delete(handlers::delete_entity),
            );

        if resource == "payment-plans" {
            routes = routes.route("/:id/cancel", patch(handlers::cancel_payment_plan));
        }

        routes.layer(Extension(Resource(resource)))
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}
