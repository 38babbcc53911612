//! Mission API server
//!
//! Serves mission verification over HTTP.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use super::routes::{self, AppState};
use crate::mission::MissionService;
use crate::utils::config::ServerConfig;

/// Build the full application: routes, CORS and state
pub fn app(missions: Arc<MissionService>) -> Router {
    let state = Arc::new(AppState { missions });

    routes::api_router()
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Main API server
pub struct ApiServer {
    config: ServerConfig,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Start the server. Runs until the process is stopped.
    pub async fn start(&self) -> Result<()> {
        let missions = Arc::new(MissionService::from_config(&self.config.missions)?);

        let listener = tokio::net::TcpListener::bind(self.config.bind_address()).await?;
        let address = listener.local_addr()?;
        let base_url = format!("http://{}", address);

        log::info!("The server is listening on the following address: {}", base_url);
        log::info!("Target application: {}", self.config.missions.target.base_url());
        for (method, path) in routes::ROUTES {
            log::info!("- [{}] {}{}", method, base_url, path);
        }

        axum::serve(listener, app(missions).into_make_service()).await?;

        Ok(())
    }
}
