//! ServerBuilder for fluent API to build HTTP servers

use super::router::{build_api_routes, build_health_routes};
use crate::core::{BizError, BizStore};
use crate::handlers::AppState;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the BizTime HTTP application
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryStore::new())
///     .with_cors(true)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn BizStore>>,
    custom_routes: Vec<Router>,
    cors: bool,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            custom_routes: Vec::new(),
            cors: false,
        }
    }

    /// Set the store (required)
    pub fn with_store(mut self, store: impl BizStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set a store that is also held elsewhere, e.g. by a test
    pub fn with_shared_store(mut self, store: Arc<dyn BizStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Add custom routes to the server
    ///
    /// ```ignore
    /// let admin = Router::new().route("/version", get(|| async { "0.1.0" }));
    ///
    /// ServerBuilder::new()
    ///     .with_store(store)
    ///     .with_custom_routes(admin)
    ///     .build()?;
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Enable a permissive CORS layer
    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.cors = enabled;
        self
    }

    /// Build the final router
    ///
    /// Unknown paths answer with the JSON 404 body used by every handler.
    pub fn build(mut self) -> Result<Router> {
        let store = self
            .store
            .take()
            .ok_or_else(|| anyhow::anyhow!("A store is required. Call .with_store()"))?;

        let mut app = build_health_routes().merge(build_api_routes(AppState::new(store)));

        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        app = app
            .fallback(|| async { BizError::not_found("Not Found") })
            .layer(TraceLayer::new_for_http());

        if self.cors {
            app = app.layer(CorsLayer::permissive());
        }

        Ok(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// SIGTERM and Ctrl+C stop accepting connections and let in-flight
    /// requests finish.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
