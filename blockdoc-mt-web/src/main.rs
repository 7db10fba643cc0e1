use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use blockdoc_mt::{
    DeepLProvider, Document, MachineTranslator, MtError, TranslatedDocument, TranslationConfig,
    translate_document,
};

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Deserialize)]
pub struct TranslateRequest {
    pub document: Document,
    /// Names of the custom fields to translate
    #[serde(default)]
    pub custom_fields: Vec<String>,
}

#[derive(Serialize)]
pub struct TranslateResponse {
    pub message: String,
    #[serde(flatten)]
    pub document: TranslatedDocument,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: String,
}

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<dyn MachineTranslator>,
    pub config: Arc<TranslationConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Initialize DeepL provider
    let config = TranslationConfig::from_env()
        .map_err(|e| format!("Failed to read translation settings: {}", e))?;
    let translator = DeepLProvider::new(&config)
        .map_err(|e| format!("Failed to initialize translator: {}", e))?;
    let state = AppState {
        translator: Arc::new(translator),
        config: Arc::new(config),
    };

    info!("Starting blockdoc MT web server");

    let app = router(state);

    let addr = std::env::var("BLOCKDOC_MT_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/translate", post(translate_post))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: state.translator.provider_name().to_string(),
    })
}

async fn translate_post(
    State(state): State<AppState>,
    Json(request): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        title = %request.document.title,
        custom_fields = request.custom_fields.len(),
        "Translating document"
    );

    let translated = translate_document(
        state.translator.as_ref(),
        &state.config,
        &request.document,
        &request.custom_fields,
    )
    .await
    .map_err(|e| {
        warn!(error = %e, "Document translation failed");
        (
            error_status(&e),
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok(Json(TranslateResponse {
        message: translated.message(),
        document: translated,
    }))
}

fn error_status(error: &MtError) -> StatusCode {
    match error {
        MtError::Precondition(_) | MtError::InvalidLocale(_) => StatusCode::BAD_REQUEST,
        e if e.is_call_failure() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
