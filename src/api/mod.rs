use axum::{Router, http::HeaderValue, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::services::news::NewsService;

mod error;
pub mod news;
pub mod system;
mod validation;

pub use error::{ApiError, ErrorDetail};

pub struct AppState {
    pub config: Config,
    pub news: NewsService,
}

pub fn create_app_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let news = NewsService::new(&config)?;
    Ok(Arc::new(AppState { config, news }))
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config.server.cors_allowed_origins.clone();

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/", get(system::get_status))
        .route("/buscar-noticias/", get(news::buscar_noticias))
        .with_state(state)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
