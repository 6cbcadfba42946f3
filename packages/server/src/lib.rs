#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the wildfire map dashboard.
//!
//! Every request fetches the current incident batch from the configured
//! [`IncidentSource`], classifies it, and answers from a freshly built
//! region index. A failing feed degrades to an empty batch rather than an
//! error, so the dashboard keeps rendering.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use geojson::FeatureCollection;
use wildfire_map_fire_models::DisplayMode;
use wildfire_map_source::IncidentSource;

pub use config::{ConfigError, ServerConfig, SourceConfig};

/// Shared application state.
pub struct AppState {
    /// Provider of incident records.
    pub source: Arc<dyn IncidentSource>,
    /// District boundaries for the styled map, if configured.
    pub boundaries: Option<Arc<FeatureCollection>>,
    /// Display color rule used when a request does not pick one.
    pub display_mode: DisplayMode,
}

impl AppState {
    /// Builds the state described by `config`, loading boundaries from disk.
    ///
    /// # Errors
    ///
    /// Returns an `std::io::Error` if the source cannot be built or the
    /// boundary file cannot be loaded.
    pub fn from_config(config: &ServerConfig) -> std::io::Result<Self> {
        let source = config.source.build().map_err(std::io::Error::other)?;

        let boundaries = match &config.boundaries {
            Some(path) => Some(Arc::new(
                wildfire_map_geography::load_boundaries(path).map_err(std::io::Error::other)?,
            )),
            None => {
                log::warn!("No boundaries configured; /api/map is disabled");
                None
            }
        };

        Ok(Self {
            source,
            boundaries,
            display_mode: config.display_mode,
        })
    }
}

/// Registers the `/api` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/severity-levels", web::get().to(handlers::severity_levels))
            .route("/incidents", web::get().to(handlers::incidents))
            .route("/regions", web::get().to(handlers::regions))
            .route("/regions/{key}", web::get().to(handlers::region))
            .route("/summary", web::get().to(handlers::summary))
            .route("/map", web::get().to(handlers::map)),
    );
}

/// Starts the wildfire map API server.
///
/// This is a regular async function; the caller is responsible for
/// providing the async runtime (e.g. via `#[actix_web::main]`) and for
/// initializing logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the state cannot be built, the
/// HTTP server fails to bind, or it encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let state = web::Data::new(AppState::from_config(&config)?);

    log::info!(
        "Starting server on {}:{} (source: {}, display mode: {})",
        config.bind_addr,
        config.port,
        state.source.id(),
        state.display_mode,
    );

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((config.bind_addr.as_str(), config.port))?
    .run()
    .await
}
