use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::message::MessageEntry;
use crate::state::{AppState, ConfigStatus};

const INDEX_PAGE: &str = "Main/index.html";
const LOGIN_PAGE: &str = "Main/login.html";

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

#[derive(Deserialize)]
struct ConfigUpdate {
    #[serde(default)]
    gemini_api_key: Option<String>,
}

/// HTTP front end for the chatbot.
///
/// Routes:
/// - `GET /` and `GET /login` serve the HTML pages under the static root.
/// - `GET /ping`, `GET /memory`, `POST /chat`, `POST /clear_memory`.
/// - `GET /config` and `POST /config` inspect or replace the API key.
/// - Any other `GET` serves a file from the static root.
///
/// Every route answers cross-origin requests, so the pages also work when
/// opened from disk or under another host name.
pub struct ChatServer {
    state: Arc<AppState>,
    static_root: PathBuf,
}

impl ChatServer {
    pub fn new(state: Arc<AppState>, static_root: impl Into<PathBuf>) -> Self {
        Self {
            state,
            static_root: static_root.into(),
        }
    }

    /// Build an [`axum::Router`] exposing every route behind a permissive
    /// CORS layer.
    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/", get(Self::index))
            .route("/login", get(Self::login))
            .route("/ping", get(Self::ping))
            .route("/memory", get(Self::memory))
            .route("/chat", post(Self::chat))
            .route("/clear_memory", post(Self::clear_memory))
            .route("/config", get(Self::config).post(Self::update_config))
            .fallback(Self::static_file)
            .with_state(self)
            .layer(CorsLayer::permissive())
    }

    async fn index(State(server): State<Arc<Self>>) -> Response {
        server.page(INDEX_PAGE).await
    }

    async fn login(State(server): State<Arc<Self>>) -> Response {
        server.page(LOGIN_PAGE).await
    }

    async fn page(&self, rel: &str) -> Response {
        let path = self.static_root.join(rel);
        match tokio::fs::read_to_string(&path).await {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "page unavailable");
                StatusCode::NOT_FOUND.into_response()
            }
        }
    }

    async fn ping() -> impl IntoResponse {
        Json(json!({"status": "online", "model_mode": "Gemini"}))
    }

    async fn memory(State(server): State<Arc<Self>>) -> Json<Vec<MessageEntry>> {
        Json(server.state.memory().await)
    }

    async fn chat(State(server): State<Arc<Self>>, body: Bytes) -> Json<ChatResponse> {
        let message = match serde_json::from_slice::<ChatRequest>(&body) {
            Ok(req) => req.message,
            Err(e) => {
                warn!(error = %e, "unreadable chat request, treating as empty");
                String::new()
            }
        };
        let response = server.state.respond(&message).await;
        Json(ChatResponse { response })
    }

    async fn clear_memory(State(server): State<Arc<Self>>) -> impl IntoResponse {
        server.state.clear_memory().await;
        Json(json!({"status": "cleared"}))
    }

    async fn config(State(server): State<Arc<Self>>) -> Json<ConfigStatus> {
        Json(server.state.config_status().await)
    }

    async fn update_config(State(server): State<Arc<Self>>, body: Bytes) -> Response {
        match serde_json::from_slice::<ConfigUpdate>(&body) {
            Ok(update) => {
                let available = server.state.update_api_key(update.gemini_api_key).await;
                Json(json!({"status": "success", "model_available": available})).into_response()
            }
            Err(e) => {
                error!(error = %e, "rejected config update");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"status": "error", "message": e.to_string()})),
                )
                    .into_response()
            }
        }
    }

    async fn static_file(State(server): State<Arc<Self>>, method: Method, uri: Uri) -> Response {
        if method != Method::GET && method != Method::HEAD {
            return StatusCode::NOT_FOUND.into_response();
        }
        let Some(path) = resolve(&server.static_root, uri.path()) else {
            return StatusCode::NOT_FOUND.into_response();
        };
        match tokio::fs::read(&path).await {
            Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
            Err(_) => StatusCode::NOT_FOUND.into_response(),
        }
    }
}

/// Map a percent-encoded request path onto the static root, refusing
/// anything that could climb out of it. JSON files hold the credentials
/// and the conversation log and are never served.
fn resolve(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(uri_path).ok()?;
    let rel = Path::new(decoded.trim_start_matches('/'));
    if rel.as_os_str().is_empty()
        || !rel.components().all(|c| matches!(c, Component::Normal(_)))
        || rel
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    {
        return None;
    }
    Some(root.join(rel))
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "wav" => "audio/wav",
        "mp3" => "audio/mpeg",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Serve `server` on `listener` until `shutdown` resolves.
pub async fn serve<F>(server: Arc<ChatServer>, listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "serving chat");
    axum::serve(listener, server.router())
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("server stopped");
    Ok(())
}
