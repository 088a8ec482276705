use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::config::Config;
use crate::errors::ProxyError;
use crate::handlers::rpc_endpoint;
use crate::utils::TlsManager;

pub mod state;
pub use state::AppState;


/// HTTP front of the proxy
pub struct Server {
    config: Config,
    app_state: AppState,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, ProxyError> {
        let app_state = AppState::new(&config).await?;
        Ok(Self { config, app_state })
    }

    pub fn with_state(config: Config, app_state: AppState) -> Self {
        Self { config, app_state }
    }

    pub async fn serve(self) -> Result<(), ProxyError> {
        let app = self.create_router();

        let addr = SocketAddr::new(
            self.config
                .server
                .address
                .parse()
                .map_err(|e| ProxyError::Config(format!("Invalid bind address: {e}")))?,
            self.config.server.port,
        );

        info!("🚀 Signing RPC proxy starting on {}", addr);

        let tls_manager = TlsManager::new(self.config.tls.clone());
        info!("TLS Configuration: {}", tls_manager.summary());

        tls_manager.serve(app, addr).await
    }

    pub fn create_router(&self) -> Router {
        Router::new()
            .fallback(rpc_endpoint)
            .with_state(self.app_state.clone())
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .option_layer(self.config.server.cors.then(cors_layer)),
            )
    }
}

/// Preflight answer: any origin, POST/OPTIONS, Content-Type
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
