//! Console commands: sign-in flow, session status, and the per-screen
//! actions behind the CLI subcommands.
//!
//! Commands return the text to print. `Err` carries the text for stderr and
//! makes the process exit non-zero; the session itself is never left
//! half-updated.

use std::path::PathBuf;

use serde::Deserialize;

use crate::api::documents::UploadFile;
use crate::backend::KnowledgeBackend;
use crate::navigation::{Navigator, Route, SIGN_IN_PATH};
use crate::session::SessionState;
use crate::state::AppState;
use crate::views::{ContentView, DocumentsView, GapsView, SourceFilter};

pub const MSG_CREDENTIALS_REQUIRED: &str = "Please enter both email and password";
pub const MSG_LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const MSG_NOT_SIGNED_IN: &str = "Not signed in. Run `stomaton login` first.";

/// Re-derive the session from durable storage at startup.
///
/// Storage failures are logged and treated as signed out.
pub async fn restore_session(state: &AppState) -> SessionState {
    match state.session.restore().await {
        Ok(session_state) => session_state,
        Err(e) => {
            log::warn!("Could not restore session: {}", e);
            SessionState::Unauthenticated
        }
    }
}

/// Sign in with email and password.
///
/// Both fields must be non-empty. The token from the backend is held in
/// memory and persisted, then the console moves to the dashboard.
pub async fn login<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
    email: &str,
    password: &str,
) -> Result<String, String> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MSG_CREDENTIALS_REQUIRED.to_string());
    }

    log::info!("Signing in {}", email);
    let token = backend.sign_in(email, password).await.map_err(|e| {
        log::warn!("Sign-in failed: {}", e);
        MSG_LOGIN_FAILED.to_string()
    })?;

    state.session.establish(token).await.map_err(|e| {
        log::error!("Could not persist session: {}", e);
        MSG_LOGIN_FAILED.to_string()
    })?;

    state.navigator.redirect(Route::Dashboard.path());
    log::info!("Sign-in complete for {}", email);
    Ok(format!("Signed in as {}.\n", email))
}

/// Logout: clear the token from memory and storage, go to sign-in.
pub async fn logout(state: &AppState) -> Result<String, String> {
    log::info!("Logging out");
    let result = state.session.end().await;
    state.navigator.redirect(SIGN_IN_PATH);

    match result {
        Ok(()) => Ok("Signed out.\n".to_string()),
        Err(e) => Err(format!(
            "Signed out of this run, but the stored token could not be removed: {}",
            e
        )),
    }
}

/// Describe the current session, including claims when the token is a JWT.
pub async fn status(state: &AppState) -> String {
    let session_state = state.session.state().await;
    let mut out = format!(
        "{}\nAPI: {}\nBackend: {:?}   Token store: {:?}\n",
        session_state.label(),
        state.api.base_url(),
        state.config.backend,
        state.config.store,
    );

    if let Some(token) = state.session.token().await {
        match decode_claims(&token) {
            Ok(claims) => {
                if let Some(name) = claims.name.as_deref().or(claims.sub.as_deref()) {
                    out.push_str(&format!("User: {}", name));
                    if let (Some(_), Some(sub)) = (&claims.name, &claims.sub) {
                        out.push_str(&format!(" ({})", sub));
                    }
                    out.push('\n');
                }
                if let Some(exp) = claims.exp.and_then(|e| chrono::DateTime::from_timestamp(e, 0)) {
                    out.push_str(&format!("Expires: {}\n", exp.format("%Y-%m-%d %H:%M UTC")));
                }
            }
            Err(e) => log::debug!("Token is not a readable JWT: {}", e),
        }
    }
    out
}

/// Auth guard for protected commands.
///
/// Signed out: redirect to sign-in and refuse.
pub async fn require_session(state: &AppState) -> Result<(), String> {
    if state.session.is_authenticated().await {
        Ok(())
    } else {
        state.navigator.redirect(SIGN_IN_PATH);
        Err(MSG_NOT_SIGNED_IN.to_string())
    }
}

/// Generate a stone profile, optionally followed by social posts and FAQs.
pub async fn generate<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
    stone_name: &str,
    social: bool,
    faq: bool,
) -> Result<String, String> {
    require_session(state).await?;
    state.navigator.redirect(Route::ContentGeneration.path());

    let mut view = ContentView::new();
    view.generate_profile(backend, stone_name).await;
    if view.profile.is_some() {
        if social {
            view.generate_social(backend).await;
        }
        if faq {
            view.generate_faq(backend).await;
        }
    }
    finish(view.error.is_some(), view.render())
}

pub async fn list_documents<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
) -> Result<String, String> {
    require_session(state).await?;
    state.navigator.redirect(Route::RagManagement.path());

    let mut view = DocumentsView::new();
    view.load(backend).await;
    finish(view.error.is_some(), view.render())
}

/// Upload local files to the knowledge base, then show the document list.
pub async fn upload_documents<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
    paths: &[PathBuf],
) -> Result<String, String> {
    require_session(state).await?;
    state.navigator.redirect(Route::RagManagement.path());

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::from_path(path)
            .await
            .map_err(|e| format!("Could not select {}: {}", path.display(), e))?;
        files.push(file);
    }

    let mut view = DocumentsView::new();
    view.load(backend).await;
    view.select(files);
    view.upload(backend).await;
    finish(view.error.is_some(), view.render())
}

pub async fn delete_document<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
    document_id: &str,
) -> Result<String, String> {
    require_session(state).await?;
    state.navigator.redirect(Route::RagManagement.path());

    let mut view = DocumentsView::new();
    view.load(backend).await;
    view.delete(backend, document_id).await;
    finish(view.error.is_some(), view.render())
}

pub async fn knowledge_gaps<B: KnowledgeBackend>(
    state: &AppState,
    backend: &B,
    filter: SourceFilter,
) -> Result<String, String> {
    require_session(state).await?;
    state.navigator.redirect(Route::KnowledgeGaps.path());

    let mut view = GapsView::new(filter);
    view.load(backend).await;
    finish(view.error.is_some(), view.render())
}

fn finish(failed: bool, rendered: String) -> Result<String, String> {
    if failed {
        Err(rendered)
    } else {
        Ok(rendered)
    }
}

/// Claims shown by `status`. All optional; the console never relies on them.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct TokenClaims {
    pub sub: Option<String>,
    pub name: Option<String>,
    pub exp: Option<i64>,
}

/// Decode the payload of a JWT without verifying it.
///
/// The server is the only party that validates tokens; this is for display.
pub fn decode_claims(token: &str) -> Result<TokenClaims, String> {
    use base64::Engine;

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err("Invalid JWT format".to_string());
    }

    let payload = parts[1].trim_end_matches('=');
    let decoded = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| format!("Failed to decode JWT payload: {}", e))?;

    serde_json::from_slice(&decoded).map_err(|e| format!("Failed to parse JWT payload: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use base64::Engine;

    use crate::api::auth::{MemoryTokenStore, TokenStore};
    use crate::backend::mock::DEMO_TOKEN;
    use crate::backend::{HttpBackend, Latency, MockBackend};
    use crate::config::{BackendMode, Config, StoreKind};
    use crate::session::TOKEN_STORAGE_KEY;
    use crate::testing::{spawn_platform_server, FailingBackend, PLATFORM_TOKEN};

    fn config(api_base_url: &str) -> Config {
        Config {
            api_base_url: api_base_url.to_string(),
            backend: BackendMode::Mock,
            store: StoreKind::Memory,
            storage_path: PathBuf::from("unused.json"),
            mock_latency: 0.0,
        }
    }

    fn app(store: Arc<MemoryTokenStore>) -> AppState {
        AppState::with_store(config("http://127.0.0.1:9"), store)
    }

    fn mock() -> MockBackend {
        MockBackend::new(Latency::none())
    }

    fn jwt(payload: &str) -> String {
        let enc = |b: &[u8]| base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(b);
        format!(
            "{}.{}.fake-signature",
            enc(b"{\"alg\":\"HS256\",\"typ\":\"JWT\"}"),
            enc(payload.as_bytes())
        )
    }

    #[tokio::test]
    async fn test_login_requires_both_fields() {
        let store = Arc::new(MemoryTokenStore::new());
        let state = app(store.clone());

        let err = login(&state, &mock(), "ops@stomaton.io", "").await.unwrap_err();
        assert_eq!(err, MSG_CREDENTIALS_REQUIRED);
        let err = login(&state, &mock(), "  ", "pw").await.unwrap_err();
        assert_eq!(err, MSG_CREDENTIALS_REQUIRED);

        assert!(!state.session.is_authenticated().await);
        assert_eq!(store.load(TOKEN_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_persists_and_survives_reload() {
        let store = Arc::new(MemoryTokenStore::new());
        let state = app(store.clone());

        login(&state, &mock(), "ops@stomaton.io", "hunter2").await.unwrap();
        assert!(state.session.is_authenticated().await);
        assert_eq!(store.load(TOKEN_STORAGE_KEY).unwrap().as_deref(), Some(DEMO_TOKEN));
        assert_eq!(state.navigator.current(), Route::Dashboard);

        // Fresh process over the same storage
        let reloaded = app(store.clone());
        assert_eq!(restore_session(&reloaded).await, SessionState::Authenticated);
        assert_eq!(reloaded.session.token().await.as_deref().map(String::as_str), Some(DEMO_TOKEN));
    }

    #[tokio::test]
    async fn test_login_backend_failure_is_generic() {
        let state = app(Arc::new(MemoryTokenStore::new()));
        let err = login(&state, &FailingBackend { unauthorized: false }, "a@b.c", "pw")
            .await
            .unwrap_err();
        assert_eq!(err, MSG_LOGIN_FAILED);
        assert!(!state.session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = Arc::new(MemoryTokenStore::new());
        let state = app(store.clone());
        login(&state, &mock(), "ops@stomaton.io", "pw").await.unwrap();

        logout(&state).await.unwrap();

        assert!(!state.session.is_authenticated().await);
        assert_eq!(store.load(TOKEN_STORAGE_KEY).unwrap(), None);
        assert!(state.navigator.is_at_sign_in());
        assert!(!state.navigator.session_was_expired());
        assert_eq!(restore_session(&app(store)).await, SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_protected_command_redirects_when_signed_out() {
        let state = app(Arc::new(MemoryTokenStore::new()));

        let err = knowledge_gaps(&state, &mock(), SourceFilter::All).await.unwrap_err();

        assert_eq!(err, MSG_NOT_SIGNED_IN);
        assert!(state.navigator.is_at_sign_in());
        assert!(!state.navigator.session_was_expired());
    }

    #[tokio::test]
    async fn test_protected_commands_when_signed_in() {
        let state = app(Arc::new(MemoryTokenStore::new()));
        login(&state, &mock(), "ops@stomaton.io", "pw").await.unwrap();

        let out = knowledge_gaps(&state, &mock(), "telegram".parse().unwrap()).await.unwrap();
        assert!(out.contains("Jeremejevite"));
        assert_eq!(state.navigator.current(), Route::KnowledgeGaps);

        let out = generate(&state, &mock(), "Sunstone", true, true).await.unwrap();
        assert!(out.contains("== Sunstone"));
        assert!(out.contains("== FAQs =="));

        let out = delete_document(&state, &mock(), "doc-003").await.unwrap();
        assert!(out.starts_with("Documents (3)"));
    }

    #[tokio::test]
    async fn test_generate_validation_error_fails_command() {
        let state = app(Arc::new(MemoryTokenStore::new()));
        state.session.set_token("tok".into()).await;

        let err = generate(&state, &mock(), "", false, false).await.unwrap_err();
        assert!(err.contains("Please enter a stone name"));
    }

    #[tokio::test]
    async fn test_upload_documents_from_disk() {
        let state = app(Arc::new(MemoryTokenStore::new()));
        state.session.set_token("tok".into()).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("painite_2024.txt");
        std::fs::write(&path, b"borate mineral").unwrap();

        let out = upload_documents(&state, &mock(), &[path]).await.unwrap();
        assert!(out.starts_with("Documents (5)"));
        assert!(out.contains("painite_2024.txt"));

        let err = upload_documents(&state, &mock(), &[dir.path().join("missing.pdf")])
            .await
            .unwrap_err();
        assert!(err.starts_with("Could not select"));
    }

    #[tokio::test]
    async fn test_unauthorized_response_signs_out_live_session() {
        let base = spawn_platform_server().await;
        let store = Arc::new(MemoryTokenStore::new());
        let state = AppState::with_store(config(&base), store.clone());
        let backend = HttpBackend::new(state.api.clone());

        login(&state, &backend, "ops@stomaton.io", "pw").await.unwrap();
        assert_eq!(state.session.token().await.as_deref().map(String::as_str), Some(PLATFORM_TOKEN));

        // Server revokes the token
        state.session.establish("revoked".into()).await.unwrap();
        let err = knowledge_gaps(&state, &backend, SourceFilter::All).await.unwrap_err();

        assert!(err.contains("Failed to load knowledge gaps"));
        assert!(state.navigator.is_at_sign_in());
        assert!(state.navigator.session_was_expired());
        assert_eq!(state.session.token().await, None);
        assert_eq!(store.load(TOKEN_STORAGE_KEY).unwrap(), None);

        // The next protected command is refused before any request
        let err = list_documents(&state, &backend).await.unwrap_err();
        assert_eq!(err, MSG_NOT_SIGNED_IN);
    }

    #[tokio::test]
    async fn test_status_shows_claims() {
        let state = app(Arc::new(MemoryTokenStore::new()));
        assert!(status(&state).await.starts_with("Signed out"));

        state.session.set_token(DEMO_TOKEN.into()).await;
        let out = status(&state).await;
        assert!(out.starts_with("Signed in"));
        assert!(out.contains("User: STOMATON User (1234567890)"));
        assert!(out.contains("Expires: 2286-11-20"));
    }

    #[test]
    fn test_decode_claims() {
        let token = jwt("{\"sub\":\"user-123-abc\",\"iat\":1700000000}");
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user-123-abc"));
        assert_eq!(claims.name, None);
        assert_eq!(claims.exp, None);
    }

    #[test]
    fn test_decode_claims_invalid_jwt() {
        assert!(decode_claims("not-a-jwt").is_err());
        assert!(decode_claims("a.%%%.c").is_err());
        assert!(decode_claims(&jwt("[1, 2, 3]")).is_err());
    }
}
