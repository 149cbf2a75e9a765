//! Auth session storage.
//!
//! A session is the signed-in user plus the bearer token the API issued for
//! them. Stores are injected into the API client and anything else that needs
//! to know who is signed in; observers register with
//! [`SessionStore::subscribe`] and are told about every change.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "smartfarm.authToken";
/// Storage key holding the JSON-encoded user.
pub const USER_KEY: &str = "smartfarm.authUser";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(AuthUser),
    SignedOut,
}

pub type SubscriptionId = u64;

pub type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait SessionStore {
    fn get(&self) -> Option<AuthSession>;

    fn set(&self, session: AuthSession) -> Result<(), SessionError>;

    fn clear(&self) -> Result<(), SessionError>;

    fn subscribe(&self, listener: Listener) -> SubscriptionId;

    /// Returns false if `id` was not subscribed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;

    fn token(&self) -> Option<String> {
        self.get().map(|session| session.token)
    }

    fn user(&self) -> Option<AuthUser> {
        self.get().map(|session| session.user)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Arc<S> {
    fn get(&self) -> Option<AuthSession> {
        (**self).get()
    }

    fn set(&self, session: AuthSession) -> Result<(), SessionError> {
        (**self).set(session)
    }

    fn clear(&self) -> Result<(), SessionError> {
        (**self).clear()
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        (**self).subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        (**self).unsubscribe(id)
    }
}

#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Listener)>>,
}

impl Listeners {
    fn add(&self, listener: Listener) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock().push((id, listener));
        id
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    fn emit(&self, event: &SessionEvent) {
        // Snapshot so listeners may subscribe or unsubscribe while handling
        let listeners: Vec<Listener> = self.lock().iter().map(|(_, l)| Arc::clone(l)).collect();
        for listener in listeners {
            listener(event);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Listener)>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.lock().len())
            .finish()
    }
}

/// In-process store, lost when the process exits.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<AuthSession>>,
    listeners: Listeners,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<AuthSession> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, session: AuthSession) -> Result<(), SessionError> {
        let user = session.user.clone();
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session);
        self.listeners.emit(&SessionEvent::SignedIn(user));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.listeners.emit(&SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}

/// Durable key-value store kept in a JSON file.
///
/// The file holds a flat string map, with the user stored as an encoded JSON
/// string under [`USER_KEY`]. An undecodable user entry is dropped on read.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    listeners: Listeners,
}

type KeyValues = BTreeMap<String, String>;

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            listeners: Listeners::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<KeyValues, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(KeyValues::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        match serde_json::from_str(&content) {
            Ok(values) => Ok(values),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "discarding unreadable session file: {e}");
                Ok(KeyValues::new())
            }
        }
    }

    fn write(&self, values: &KeyValues) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }
        let content = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, content).map_err(io_err)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<AuthSession> {
        let mut values = match self.read() {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!("{e}");
                return None;
            }
        };

        let raw_user = values.get(USER_KEY)?.clone();
        let user = match serde_json::from_str::<AuthUser>(&raw_user) {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("removing corrupt session user: {e}");
                values.remove(USER_KEY);
                if let Err(e) = self.write(&values) {
                    tracing::warn!("{e}");
                }
                return None;
            }
        };
        let token = values.get(TOKEN_KEY)?.clone();

        Some(AuthSession { user, token })
    }

    fn set(&self, session: AuthSession) -> Result<(), SessionError> {
        let mut values = self.read()?;
        values.insert(TOKEN_KEY.to_string(), session.token);
        values.insert(USER_KEY.to_string(), serde_json::to_string(&session.user)?);
        self.write(&values)?;
        self.listeners.emit(&SessionEvent::SignedIn(session.user));
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut values = self.read()?;
        let had_keys = values.remove(TOKEN_KEY).is_some() | values.remove(USER_KEY).is_some();
        if had_keys {
            self.write(&values)?;
        }
        self.listeners.emit(&SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.remove(id)
    }
}
