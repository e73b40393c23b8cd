use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::clients::google_news::GoogleNewsClient;
use crate::models::NewsRecord;
use crate::services::news::SearchRequest;

use super::{ApiError, AppState, validation};

#[derive(Debug, Deserialize)]
pub struct NoticiasQuery {
    pub termo: String,
    pub dias: Option<i64>,
    pub fonte: Option<String>,
    pub paginas: Option<u32>,
    pub buscar_imagens: Option<bool>,
}

/// `GET /buscar-noticias/` — searches news for `termo` (possibly
/// `OR`-compound) and returns the filtered, deduplicated, recency-sorted
/// records.
pub async fn buscar_noticias(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticiasQuery>,
) -> Result<Json<Vec<NewsRecord>>, ApiError> {
    let term = validation::validate_term(&query.termo)?;
    let days_back =
        validation::validate_days(query.dias.unwrap_or(state.config.search.default_days))?;
    let pages =
        validation::validate_pages(query.paginas.unwrap_or(state.config.search.default_pages))?;

    let request = SearchRequest {
        term: term.to_string(),
        days_back,
        source_filter: query.fonte,
        pages,
        fetch_images: query.buscar_imagens.unwrap_or(false),
    };

    info!(
        term = %request.term,
        days = request.days_back,
        pages = request.pages,
        images = request.fetch_images,
        "Handling news search"
    );

    // Fresh handle per request: it carries per-search mutable state and
    // must not be shared across requests.
    let mut source = GoogleNewsClient::new(&state.config.search)?;
    let records = state.news.search(&mut source, &request).await?;

    info!(term = %request.term, records = records.len(), "News search complete");
    Ok(Json(records))
}
