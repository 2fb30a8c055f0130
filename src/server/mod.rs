//! HTTP API
//!
//! Two read-only routes over the loaded exoplanet table:
//!
//! - `GET /api/exoplanets`: every record, all columns
//! - `GET /api/stars?exoplanet=<index>[&lambda=<deg>][&epsilon=<deg>]`: the
//!   rotated bright-star field for one exoplanet

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::catalogs::{ExoplanetCatalog, ExoplanetRecord};
use crate::framelib::AxialTilt;
use crate::pipeline::{project_star_field, ProjectionSettings, RotatedStar};
use crate::query::StarQuery;
use crate::Result;

pub mod error;

pub use error::ApiError;

/// Shared, read-only state behind every request
pub struct AppState {
    pub catalog: Arc<ExoplanetCatalog>,
    pub stars: Arc<dyn StarQuery>,
    pub settings: ProjectionSettings,
}

impl AppState {
    pub fn new(
        catalog: Arc<ExoplanetCatalog>,
        stars: Arc<dyn StarQuery>,
        settings: ProjectionSettings,
    ) -> Self {
        Self {
            catalog,
            stars,
            settings,
        }
    }
}

/// Query string of `/api/stars`
#[derive(Debug, Clone, Deserialize)]
pub struct StarsParams {
    pub exoplanet: Option<i64>,
    pub lambda: Option<f64>,
    pub epsilon: Option<f64>,
}

/// Router with both API routes and open CORS
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/exoplanets", get(exoplanets_handler))
        .route("/api/stars", get(stars_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until ctrl-c
pub async fn serve(addr: SocketAddr, state: Arc<AppState>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for ctrl-c: {}", e);
    }
}

async fn exoplanets_handler(State(state): State<Arc<AppState>>) -> Json<Vec<ExoplanetRecord>> {
    Json(state.catalog.records().to_vec())
}

async fn stars_handler(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<StarsParams>, QueryRejection>,
) -> std::result::Result<Json<Vec<RotatedStar>>, ApiError> {
    let Query(params) = params?;
    let index = params
        .exoplanet
        .ok_or_else(|| ApiError::bad_request("missing required query parameter 'exoplanet'"))?;

    let defaults = state.settings.tilt;
    let tilt = AxialTilt::new(
        params.lambda.unwrap_or(defaults.lambda_deg),
        params.epsilon.unwrap_or(defaults.epsilon_deg),
    )?;

    let stars = tokio::task::spawn_blocking(move || {
        let exoplanet = state.catalog.get(index)?;
        let cone = state.settings.cone_for(exoplanet);
        project_star_field(exoplanet, state.stars.as_ref(), &cone, tilt)
    })
    .await
    .map_err(|e| ApiError::internal(format!("projection task failed: {}", e)))??;

    Ok(Json(stars))
}
