use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use color_service::WcagColorService;
use serde::Deserialize;
use server_api::{ApiContext, GenerateInput, SaveInput};
use shared::{
    domain::PaletteId,
    error::{ApiError, ErrorCode},
    protocol::PaletteView,
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};

mod config;
mod flash;

use config::{load_settings, prepare_database_url};

const PALETTE_PATH: &str = "/palette";
const MAX_FORM_BYTES: usize = 32 * 1024;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[derive(Debug, Deserialize)]
struct GenerateForm {
    basecolor: Option<String>,
    level: Option<String>,
    #[serde(rename = "isLargeText")]
    is_large_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SaveForm {
    name: Option<String>,
    basecolor: Option<String>,
    colors: Option<String>,
    level: Option<String>,
    #[serde(rename = "isLargeText")]
    is_large_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let api = ApiContext {
        storage,
        colors: Arc::new(WcagColorService),
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "palette server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/palette", get(show_all_palettes).post(save_palette))
        .route("/palette/generate", post(generate_palette))
        .route("/palette/:id/delete", post(delete_palette))
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn generate_palette(
    State(state): State<Arc<AppState>>,
    Form(form): Form<GenerateForm>,
) -> Result<Json<PaletteView>, (StatusCode, Json<ApiError>)> {
    let view = server_api::generate_palette(
        &state.api,
        GenerateInput {
            basecolor: form.basecolor,
            level: form.level,
            is_large_text: form.is_large_text,
        },
    )
    .await
    .map_err(fail)?;
    Ok(Json(view))
}

async fn save_palette(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SaveForm>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let saved = server_api::save_palette(
        &state.api,
        SaveInput {
            name: form.name,
            basecolor: form.basecolor,
            colors: form.colors,
            level: form.level,
            is_large_text: form.is_large_text,
        },
    )
    .await
    .map_err(fail)?;

    Ok(redirect_with_flash(format!(
        "Palette \"{}\" saved successfully!",
        saved.name
    )))
}

async fn show_all_palettes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    // Absent or non-numeric page falls back to the first page.
    let page = query
        .page
        .as_deref()
        .and_then(|raw| raw.parse::<u32>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1);

    let mut listing = server_api::list_palettes(&state.api, page)
        .await
        .map_err(fail)?;
    listing.flash = flash::peek_message(&headers);

    let mut response_headers = HeaderMap::new();
    if listing.flash.is_some() {
        response_headers.insert(header::SET_COOKIE, flash::clear_cookie());
    }
    Ok((response_headers, Json(listing)))
}

async fn delete_palette(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    server_api::delete_palette(&state.api, PaletteId(id))
        .await
        .map_err(fail)?;
    Ok(redirect_with_flash("Palette deleted successfully.".into()))
}

fn redirect_with_flash(message: String) -> (StatusCode, HeaderMap) {
    let mut headers = HeaderMap::new();
    headers.insert(header::LOCATION, HeaderValue::from_static(PALETTE_PATH));
    headers.insert(header::SET_COOKIE, flash::set_cookie(&message));
    (StatusCode::SEE_OTHER, headers)
}

fn fail(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Database => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}
