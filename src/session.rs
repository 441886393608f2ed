use chrono::{DateTime, Duration, Utc};
use rocket::http::{Cookie, SameSite};
use rocket::request::{FromRequest, Outcome, Request};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::color::ColorPicker;
use crate::ingest::BlogDraft;
use crate::models::settings::Settings;
use crate::models::strategy::AiFullStrategyResponse;

pub const SESSION_COOKIE: &str = "cta_session";

// ── Per-session state ─────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A one-shot message shown on the next page render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// An action waiting for the user to say yes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    OverwriteProfile { name: String, existing: String },
    DeleteProfile { name: String },
}

/// Everything that lives only as long as the browser session.
#[derive(Debug)]
pub struct SessionState {
    pub settings: Settings,
    pub draft: BlogDraft,
    pub picker: Option<ColorPicker>,
    pub selected_profile: Option<String>,
    pub pending: Option<Pending>,
    pub notice: Option<Notice>,
    /// Blocking error for the content/upload area.
    pub input_error: Option<String>,
    pub result: Option<AiFullStrategyResponse>,
    /// Error from the last generation attempt, shown in the results panel.
    pub generation_error: Option<String>,
    generating: bool,
    last_seen: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState {
            settings: Settings::default(),
            draft: BlogDraft::default(),
            picker: None,
            selected_profile: None,
            pending: None,
            notice: None,
            input_error: None,
            result: None,
            generation_error: None,
            generating: false,
            last_seen: Utc::now(),
        }
    }
}

impl SessionState {
    pub fn is_generating(&self) -> bool {
        self.generating
    }
}

// ── Store ─────────────────────────────────────────────

/// Sessions kept before the least recently seen idle one is evicted.
pub const MAX_SESSIONS: usize = 10_000;

/// In-memory session map keyed by the session cookie.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionState>>,
    idle_limit: Duration,
    capacity: usize,
}

impl SessionStore {
    pub fn new(idle_minutes: i64) -> Self {
        Self::with_capacity(idle_minutes, MAX_SESSIONS)
    }

    pub fn with_capacity(idle_minutes: i64, capacity: usize) -> Self {
        SessionStore {
            sessions: Mutex::new(HashMap::new()),
            idle_limit: Duration::minutes(idle_minutes.max(1)),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionState>> {
        self.sessions.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run `f` against the session, creating it on first use.
    pub fn with<R>(&self, id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut map = self.lock();
        if !map.contains_key(id) && map.len() >= self.capacity {
            evict_oldest(&mut map);
        }
        let state = map.entry(id.to_string()).or_default();
        state.last_seen = Utc::now();
        f(state)
    }

    /// Like [`SessionStore::with`] for read-only pages: an unknown id is
    /// not stored, `f` runs against a throwaway default state instead.
    pub fn view<R>(&self, id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut map = self.lock();
        match map.get_mut(id) {
            Some(state) => {
                state.last_seen = Utc::now();
                f(state)
            }
            None => f(&mut SessionState::default()),
        }
    }

    /// Claim the session's single generation slot. `None` while another
    /// run is in flight; the slot frees itself when the ticket drops.
    pub fn try_begin_generation(&self, id: &str) -> Option<GenerationTicket<'_>> {
        let claimed = self.with(id, |s| {
            if s.generating {
                false
            } else {
                s.generating = true;
                true
            }
        });
        claimed.then(|| GenerationTicket {
            store: self,
            id: id.to_string(),
        })
    }

    /// Drop sessions idle for longer than the limit. Returns how many went.
    pub fn sweep(&self) -> usize {
        let cutoff = Utc::now() - self.idle_limit;
        let mut map = self.lock();
        let before = map.len();
        map.retain(|_, s| s.generating || s.last_seen > cutoff);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }
}

/// Make room by dropping the least recently seen session that is not
/// mid-generation.
fn evict_oldest(map: &mut HashMap<String, SessionState>) {
    let oldest = map
        .iter()
        .filter(|(_, s)| !s.generating)
        .min_by_key(|(_, s)| s.last_seen)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        map.remove(&id);
        log::debug!("Session store full, evicted one idle session");
    }
}

pub struct GenerationTicket<'a> {
    store: &'a SessionStore,
    id: String,
}

impl Drop for GenerationTicket<'_> {
    fn drop(&mut self) {
        self.store.with(&self.id, |s| s.generating = false);
    }
}

// ── Request guard ─────────────────────────────────────

/// The caller's session id, minted and set as a cookie on first visit.
/// The cookie has no expiry so it ends with the browser session.
pub struct SessionId(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for SessionId {
    type Error = std::convert::Infallible;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let cookies = req.cookies();
        if let Some(cookie) = cookies.get_private(SESSION_COOKIE) {
            return Outcome::Success(SessionId(cookie.value().to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let mut cookie = Cookie::new(SESSION_COOKIE, id.clone());
        cookie.set_http_only(true);
        cookie.set_same_site(SameSite::Strict);
        cookie.set_path("/");
        cookies.add_private(cookie);
        Outcome::Success(SessionId(id))
    }
}
