//! # VELIXA SESSION
//!
//! **EXPLICITLY OWNED AUTH STATE**
//!
//! The token and the signed-in user live in an `AuthSession`, created at
//! start-up with [`AuthSession::restore`] and torn down with
//! [`AuthSession::clear`]. Handlers that need it borrow it.

use crate::config::SessionConfig;
use crate::errors::VelixaError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod storage;

pub use storage::{FileStorage, MemoryStorage, SessionStorage, STORAGE_CORRUPT};

pub const TOKEN_KEY: &str = "velixa_auth_token";
pub const USER_INFO_KEY: &str = "velixa_user_info";

/// Profile of the signed-in user as the backend reports it. Fields the
/// client does not model are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserInfo {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            email: None,
            extra: Map::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

pub struct AuthSession<S: SessionStorage> {
    storage: S,
    token: Option<String>,
    user: Option<UserInfo>,
}

impl<S: SessionStorage> AuthSession<S> {
    /// Reads any persisted token and user. Corrupt user JSON is an error.
    pub fn restore(storage: S) -> Result<Self, VelixaError> {
        let token = storage.get(TOKEN_KEY)?;
        let user = match storage.get(USER_INFO_KEY)? {
            Some(raw) => Some(serde_json::from_str(&raw)?),
            None => None,
        };
        log::debug!(
            "Restored session (token: {}, user: {})",
            token.is_some(),
            user.is_some()
        );
        Ok(Self {
            storage,
            token,
            user,
        })
    }

    pub fn establish(&mut self, token: &str, user: UserInfo) -> Result<(), VelixaError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.token = Some(token.to_string());
        self.update_user(user)
    }

    pub fn update_user(&mut self, user: UserInfo) -> Result<(), VelixaError> {
        self.storage
            .set(USER_INFO_KEY, &serde_json::to_string(&user)?)?;
        self.user = Some(user);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Forgets token and user, in storage and then in memory.
    ///
    /// Each field is dropped only once its key is gone from storage, so a
    /// failed removal leaves memory agreeing with what the next `restore`
    /// would read. Both removals are attempted; the first error is returned.
    pub fn clear(&mut self) -> Result<(), VelixaError> {
        let token_removed = self.storage.remove(TOKEN_KEY);
        if token_removed.is_ok() {
            self.token = None;
        }
        let user_removed = self.storage.remove(USER_INFO_KEY);
        if user_removed.is_ok() {
            self.user = None;
        }
        token_removed.and(user_removed)?;
        log::debug!("Session cleared");
        Ok(())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// Storage chosen by configuration: a file when a path is set.
pub fn storage_from_config(config: &SessionConfig) -> Box<dyn SessionStorage> {
    match &config.storage_path {
        Some(path) => Box::new(FileStorage::new(path)),
        None => Box::new(MemoryStorage::new()),
    }
}

impl SessionStorage for Box<dyn SessionStorage> {
    fn get(&self, key: &str) -> Result<Option<String>, VelixaError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), VelixaError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), VelixaError> {
        (**self).remove(key)
    }
}
