//! Console routes and the redirect hook used by the API client.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Sign-in entry point.
pub const SIGN_IN_PATH: &str = "/login";

/// Screens the console can be on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Login,
    ContentGeneration,
    RagManagement,
    KnowledgeGaps,
    /// A path the console has no screen for.
    Other(String),
}

impl Route {
    pub fn path(&self) -> &str {
        match self {
            Route::Dashboard => "/",
            Route::Login => SIGN_IN_PATH,
            Route::ContentGeneration => "/content-generation",
            Route::RagManagement => "/rag-management",
            Route::KnowledgeGaps => "/knowledge-gaps",
            Route::Other(path) => path,
        }
    }

    pub fn from_path(path: &str) -> Self {
        match path {
            "/" => Route::Dashboard,
            SIGN_IN_PATH => Route::Login,
            "/content-generation" => Route::ContentGeneration,
            "/rag-management" => Route::RagManagement,
            "/knowledge-gaps" => Route::KnowledgeGaps,
            other => Route::Other(other.to_string()),
        }
    }
}

/// Receives navigation requests from non-view code (the API client's 401
/// handling, the auth guard).
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);

    /// The server rejected the session token. Sends the operator to sign-in.
    fn session_expired(&self) {
        self.redirect(SIGN_IN_PATH);
    }
}

/// Navigator for the terminal console: remembers the current route and
/// tells the operator when they were sent to sign in.
pub struct ConsoleNavigator {
    current: Mutex<Route>,
    expired: AtomicBool,
}

impl ConsoleNavigator {
    pub fn new(initial: Route) -> Self {
        Self {
            current: Mutex::new(initial),
            expired: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> Route {
        match self.current.lock() {
            Ok(route) => route.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_at_sign_in(&self) -> bool {
        self.current() == Route::Login
    }

    /// Whether the server ended the session during this run.
    pub fn session_was_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }
}

impl Navigator for ConsoleNavigator {
    fn redirect(&self, path: &str) {
        let route = Route::from_path(path);
        log::info!("Navigating to {}", route.path());
        match self.current.lock() {
            Ok(mut current) => *current = route,
            Err(poisoned) => *poisoned.into_inner() = route,
        }
    }

    fn session_expired(&self) {
        self.expired.store(true, Ordering::Relaxed);
        eprintln!("Session ended. Sign in again with `stomaton login`.");
        self.redirect(SIGN_IN_PATH);
    }
}
