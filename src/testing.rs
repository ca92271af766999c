//! Shared test doubles: a recording navigator, a failing backend, and
//! local axum servers standing in for the platform API.

use std::sync::Mutex;

use axum::extract::{Multipart, Path};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use reqwest::StatusCode as ReqwestStatus;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::client::ApiError;
use crate::api::documents::UploadFile;
use crate::api::types::{
    ContentGeneration, DocumentRecord, FaqContent, KnowledgeGap, SocialContent,
};
use crate::backend::KnowledgeBackend;
use crate::navigation::{Navigator, SIGN_IN_PATH};

/// The only token the platform test server accepts.
pub const PLATFORM_TOKEN: &str = "platform-test-token";

#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
    expirations: Mutex<usize>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }

    pub fn expirations(&self) -> usize {
        *self.expirations.lock().unwrap()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }

    fn session_expired(&self) {
        *self.expirations.lock().unwrap() += 1;
        self.redirect(SIGN_IN_PATH);
    }
}

/// Backend whose every call fails, optionally with a 401.
pub struct FailingBackend {
    pub unauthorized: bool,
}

impl FailingBackend {
    fn error(&self) -> ApiError {
        if self.unauthorized {
            ApiError::Unauthorized
        } else {
            ApiError::Status {
                status: ReqwestStatus::SERVICE_UNAVAILABLE,
                body: "maintenance".to_string(),
            }
        }
    }
}

impl KnowledgeBackend for FailingBackend {
    async fn sign_in(&self, _email: &str, _password: &str) -> Result<String, ApiError> {
        Err(self.error())
    }

    async fn generate_profile(&self, _stone_name: &str) -> Result<ContentGeneration, ApiError> {
        Err(self.error())
    }

    async fn generate_social(&self, _stone_id: &str) -> Result<SocialContent, ApiError> {
        Err(self.error())
    }

    async fn generate_faq(&self, _stone_id: &str) -> Result<FaqContent, ApiError> {
        Err(self.error())
    }

    async fn list_documents(&self) -> Result<Vec<DocumentRecord>, ApiError> {
        Err(self.error())
    }

    async fn upload_documents(&self, _files: &[UploadFile]) -> Result<Vec<DocumentRecord>, ApiError> {
        Err(self.error())
    }

    async fn delete_document(&self, _document_id: &str) -> Result<(), ApiError> {
        Err(self.error())
    }

    async fn list_knowledge_gaps(&self) -> Result<Vec<KnowledgeGap>, ApiError> {
        Err(self.error())
    }
}

/// What the echo server saw on a request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub client_type: Option<String>,
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn echo(headers: HeaderMap) -> Json<Echo> {
    Json(Echo {
        authorization: header(&headers, AUTHORIZATION.as_str()),
        content_type: header(&headers, CONTENT_TYPE.as_str()),
        client_type: header(&headers, "x-client-type"),
    })
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// `/echo` reflects request headers, `/expired` always answers 401,
/// `/broken` answers 500, `/plain` answers non-JSON text.
pub async fn spawn_echo_server() -> String {
    let app = Router::new()
        .route("/echo", get(echo).post(echo))
        .route(
            "/expired",
            get(|| async { StatusCode::UNAUTHORIZED }).delete(|| async { StatusCode::UNAUTHORIZED }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/plain", get(|| async { "just text" }));
    serve(app).await
}

fn authorized(headers: &HeaderMap) -> bool {
    header(headers, AUTHORIZATION.as_str())
        .map(|v| v == format!("Bearer {}", PLATFORM_TOKEN))
        .unwrap_or(false)
}

fn ok(data: Value) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

async fn platform_login(Json(body): Json<Value>) -> Json<Value> {
    let password = body["password"].as_str().unwrap_or_default();
    if password.is_empty() {
        return Json(json!({ "success": false, "error": "invalid credentials" }));
    }
    ok(json!({ "access_token": PLATFORM_TOKEN, "token_type": "bearer" }))
}

async fn platform_generate(
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let name = body["stone_name"].as_str().unwrap_or_default().to_string();
    let mut generated: Value =
        serde_json::from_str(include_str!("backend/fixtures/content_generation.json")).unwrap();
    generated["content"]["name"] = json!(name);
    generated["stone_id"] = json!(name.to_lowercase().replace(' ', "-"));
    Ok(ok(generated))
}

async fn platform_documents(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(ok(json!([{
        "document_id": "doc-001",
        "file_name": "rainbow_moonstone_research.pdf",
        "status": "indexed",
        "uploaded_at": "2025-07-07T14:30:00Z",
        "size_mb": 2.4,
        "type": "pdf"
    }])))
}

async fn platform_upload(
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let mut created = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.file_name().unwrap_or("unnamed").to_string();
        let bytes = field.bytes().await.unwrap();
        created.push(json!({
            "document_id": format!("doc-up-{}", created.len()),
            "file_name": name,
            "status": "processing",
            "uploaded_at": "2025-07-08T12:00:00Z",
            "size_mb": bytes.len() as f64 / (1024.0 * 1024.0),
            "type": "md"
        }));
    }
    Ok(ok(Value::Array(created)))
}

async fn platform_delete(headers: HeaderMap, Path(id): Path<String>) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    if id == "doc-001" {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn platform_gaps(headers: HeaderMap) -> Result<Json<Value>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(ok(json!([{
        "id": "gap-003",
        "stone_name": "Jeremejevite",
        "gap_type": "missing_content",
        "priority": "low",
        "source": "telegram",
        "identified_at": "2025-07-06T11:20:00Z",
        "frequency": 3,
        "description": "Telegram users asking about rare gemstone Jeremejevite"
    }])))
}

/// Minimal live platform: accepts only `PLATFORM_TOKEN`, 401s everything else.
pub async fn spawn_platform_server() -> String {
    let app = Router::new()
        .route("/auth/login", post(platform_login))
        .route("/content/generate", post(platform_generate))
        .route("/rag/documents", get(platform_documents).post(platform_upload))
        .route("/rag/documents/{id}", delete(platform_delete))
        .route("/knowledge-gaps", get(platform_gaps));
    serve(app).await
}
