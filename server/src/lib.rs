use anyhow::{Context, Result};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use recipefind_core::diet::{filter_results, parse_restriction};
use recipefind_core::links::{video_search_link, web_search_link};
use recipefind_core::normalize::{normalize_terms, split_ingredients};
use recipefind_core::page::{Page, DEFAULT_PER_PAGE};
use recipefind_core::{DocId, ScoredRecipe, SearchEngine};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    /// Comma-separated ingredients.
    pub q: String,
    pub k: Option<usize>,
    pub diet: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_per_page")]
    pub per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_per_page() -> usize {
    DEFAULT_PER_PAGE
}

#[derive(Serialize)]
pub struct SearchResponse<'a> {
    pub query: Vec<String>,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub results: Vec<SearchHit<'a>>,
}

#[derive(Serialize)]
pub struct SearchHit<'a> {
    #[serde(flatten)]
    pub hit: ScoredRecipe<'a>,
    pub search_link: String,
    pub video_link: String,
    /// Ingredient lines containing a query term, with the term wrapped in `<em>`.
    pub highlights: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RwLock<Arc<SearchEngine>>>,
    pub corpus_path: PathBuf,
    pub admin_token: Option<String>,
}

impl AppState {
    /// Snapshot of the current engine; the lock is released before searching.
    fn engine(&self) -> Arc<SearchEngine> {
        self.engine.read().clone()
    }
}

/// Builds the router with the admin token taken from `ADMIN_TOKEN`.
pub fn build_app(corpus_path: String) -> Result<Router> {
    build_app_with_token(corpus_path, std::env::var("ADMIN_TOKEN").ok())
}

/// Builds the router; `/admin/reload` rejects every request when `admin_token` is `None`.
pub fn build_app_with_token(corpus_path: String, admin_token: Option<String>) -> Result<Router> {
    // Load the corpus and build statistics before accepting requests
    let engine = SearchEngine::load(&corpus_path)
        .with_context(|| format!("loading corpus from {corpus_path}"))?;
    tracing::info!(recipes = engine.len(), corpus = %corpus_path, "search engine ready");
    let app_state = AppState {
        engine: Arc::new(RwLock::new(Arc::new(engine))),
        corpus_path: PathBuf::from(&corpus_path),
        admin_token,
    };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/recipe/:doc_id", get(recipe_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let restriction = parse_restriction(params.diet.as_deref().unwrap_or("none"))
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let query = split_ingredients(&params.q);
    let terms = normalize_terms(&query);

    let engine = state.engine();
    let results = filter_results(engine.search(&terms, params.k), restriction);
    let page = Page::new(results.len(), params.per_page, params.page);

    let hits: Vec<SearchHit<'_>> = page
        .slice(&results)
        .iter()
        .map(|hit| SearchHit {
            hit: hit.clone(),
            search_link: web_search_link(&hit.recipe.title),
            video_link: video_search_link(&hit.recipe.title),
            highlights: highlight_ingredients(&hit.recipe.ingredients, &terms),
        })
        .collect();

    let elapsed = start.elapsed();
    let response = SearchResponse {
        query,
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: page.total_results,
        page: page.number,
        per_page: page.per_page,
        total_pages: page.total_pages,
        results: hits,
    };
    // Serialized here so the response does not outlive the engine snapshot
    serde_json::to_value(&response)
        .map(Json)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub async fn recipe_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let engine = state.engine();
    let recipe = engine
        .recipe(doc_id)
        .ok_or((StatusCode::NOT_FOUND, "not found".to_string()))?;
    let mut obj = serde_json::to_value(recipe)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    obj["doc_id"] = serde_json::json!(doc_id);
    obj["search_link"] = serde_json::Value::String(web_search_link(&recipe.title));
    obj["video_link"] = serde_json::Value::String(video_search_link(&recipe.title));
    Ok(Json(obj))
}

/// Rebuild the engine from the corpus path. In-flight searches keep the old one.
async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let path = state.corpus_path.clone();
    let engine = tokio::task::spawn_blocking(move || SearchEngine::load(path))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| {
            tracing::warn!(error = %e, "corpus reload failed, keeping current engine");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?;
    let recipes = engine.len();
    *state.engine.write() = Arc::new(engine);
    tracing::info!(recipes, "corpus reloaded");
    Ok(Json(serde_json::json!({ "recipes": recipes })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

fn highlight_ingredients(ingredients: &[String], terms: &[String]) -> Vec<String> {
    ingredients
        .iter()
        .filter(|ing| terms.iter().any(|t| ing.contains(t.as_str())))
        .map(|ing| highlight_terms(ing, terms))
        .collect()
}

/// Wraps every term occurrence in `<em>` in a single pass, so inserted markup is
/// never matched again. Longer terms win where matches overlap.
fn highlight_terms(text: &str, terms: &[String]) -> String {
    let mut terms: Vec<&str> = terms
        .iter()
        .map(String::as_str)
        .filter(|t| !t.trim().is_empty())
        .collect();
    if terms.is_empty() {
        return text.to_string();
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    terms.dedup();
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(pat) = regex::RegexBuilder::new(&alternation).case_insensitive(true).build() else {
        return text.to_string();
    };
    pat.replace_all(text, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0]))
        .into_owned()
}
