use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::{DateTime, Utc};

/// Cookie the gate looks at when terminating sessions.
pub const SESSION_COOKIE: &str = "fleetgate_session";

#[derive(Debug, Clone)]
pub struct Session {
    pub user: String,
    pub created_at: DateTime<Utc>,
}

/// Minimal in-process session registry.
///
/// The embedding site owns login; the gate only needs lookup and revocation
/// so it can log callers out when maintenance mode is entered.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token: impl Into<String>, user: impl Into<String>) {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.insert(
            token.into(),
            Session {
                user: user.into(),
                created_at: Utc::now(),
            },
        );
    }

    pub fn is_valid(&self, token: &str) -> bool {
        let sessions = self.sessions.read().expect("session lock poisoned");
        sessions.contains_key(token)
    }

    /// Remove a session; returns true when one existed.
    pub fn revoke(&self, token: &str) -> bool {
        let mut sessions = self.sessions.write().expect("session lock poisoned");
        sessions.remove(token).is_some()
    }
}

/// Extract the session token from a Cookie header value.
pub fn session_token_from_cookies(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// Set-Cookie value that expires the session cookie on the client.
pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Max-Age=0; Path=/; HttpOnly")
}
