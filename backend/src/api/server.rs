//! HTTP server for the quotaload API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                          |
//! |--------|-------------------|--------------------------------------|
//! | GET    | `/health`         | Health check                         |
//! | POST   | `/api/upload`     | Upload an export file (multipart)    |
//! | POST   | `/api/transform`  | Transform a plain-text body          |
//! | GET    | `/api/logs`       | SSE stream for real-time logs        |

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_info, LOG_BROADCASTER};
use super::types::{error_response, TransformResponse};
use crate::config::MAX_FILE_SIZE;
use crate::error::{CsvError, PipelineError, ServerError};
use crate::transform::pipeline::{transform_bytes, transform_text, PipelineResult, TransformOptions};

type ApiError = (StatusCode, Json<Value>);

/// Build the router
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/upload", post(upload_file))
        .route("/api/transform", post(transform_body))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE))
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    eprintln!("🚀 Quotaload server running on http://localhost:{}", port);
    eprintln!("   POST /api/upload    - Upload export file");
    eprintln!("   POST /api/transform - Transform text body");
    eprintln!("   GET  /api/logs      - SSE log stream");
    eprintln!("   GET  /health        - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "quotaload",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "upload": "POST /api/upload",
            "transform": "POST /api/transform",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Map a server error to a status code and JSON body
fn api_error(err: ServerError) -> ApiError {
    let status = match &err {
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(PipelineError::Csv(CsvError::IoError(_))) => StatusCode::INTERNAL_SERVER_ERROR,
        ServerError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };

    // Surface the message verbatim
    let message = match err {
        ServerError::Pipeline(e) => e.to_string(),
        other => other.to_string(),
    };
    (status, Json(error_response(&message)))
}

fn respond(result: Result<PipelineResult, PipelineError>) -> Result<Json<TransformResponse>, ApiError> {
    let result = result.map_err(|e| api_error(e.into()))?;
    log_info(format!(
        "📊 {} records in {} categories",
        result.output.records.len(),
        result.output.groups.len()
    ));
    Ok(Json(TransformResponse::from(result)))
}

/// Upload endpoint (multipart field `file`)
async fn upload_file(mut multipart: Multipart) -> Result<Json<TransformResponse>, ApiError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| api_error(ServerError::BadRequest(format!("Multipart error: {}", e))))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| api_error(ServerError::BadRequest(format!("Read error: {}", e))))?;
            file_data = Some(bytes.to_vec());
        }
    }

    let bytes = file_data.ok_or_else(|| api_error(ServerError::BadRequest("No file provided".into())))?;

    log_info(format!(
        "📄 New upload: {} ({} bytes)",
        file_name.as_deref().unwrap_or("unknown"),
        bytes.len()
    ));

    let options = TransformOptions::from_env();
    respond(transform_bytes(&bytes, &options))
}

/// Plain-text transform endpoint
async fn transform_body(body: String) -> Result<Json<TransformResponse>, ApiError> {
    log_info(format!("📄 New text body ({} bytes)", body.len()));
    let options = TransformOptions::from_env();
    respond(transform_text(&body, &options))
}
