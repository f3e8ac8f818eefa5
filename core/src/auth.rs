//! # VELIXA AUTH FLOWS
//!
//! **FORM SUBMIT -> VALIDATE -> BACKEND -> SESSION -> NOTIFY**
//!
//! Invalid forms come back as `VelixaError::InvalidForm` without a
//! notification; the caller renders the per-field messages inline. Backend
//! failures are notified and then propagated.

use crate::config::ValidationConfig;
use crate::errors::VelixaError;
use crate::notification::NotificationSink;
use crate::session::{AuthSession, SessionStorage, UserInfo};
use crate::types::{display_string, DataRecord};
use crate::validation::{login_rules, profile_rules, registration_rules, FormValidator, Validator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub const LOGIN_SUCCESS: &str = "Login successful!";
pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";
pub const REGISTER_SUCCESS: &str = "Registration successful! Please log in.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const LOGGED_OUT: &str = "You have been logged out.";
pub const SESSION_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Failed to update profile.";

pub const INVALID_RESPONSE: &str = "VELIXA_AUTH_INVALID_RESPONSE";
pub const NOT_AUTHENTICATED: &str = "VELIXA_AUTH_NOT_AUTHENTICATED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// **AUTH BACKEND CONTRACT**
///
/// The remote API as the auth flows see it. Errors should carry a
/// user-presentable message; an empty one falls back to the stock text.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, VelixaError>;
    async fn register(&self, registration: &Registration) -> Result<(), VelixaError>;
    async fn fetch_profile(&self, token: &str) -> Result<UserInfo, VelixaError>;
    async fn update_profile(
        &self,
        token: &str,
        changes: &DataRecord,
    ) -> Result<UserInfo, VelixaError>;
}

fn field_text(record: &DataRecord, field: &str) -> String {
    record.get(field).map(display_string).unwrap_or_default()
}

fn failure_message(err: &VelixaError, fallback: &str) -> String {
    let message = err.user_message();
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}

pub struct AuthService<B, S: SessionStorage, N> {
    backend: B,
    session: AuthSession<S>,
    notifier: N,
    login_form: FormValidator,
    registration_form: FormValidator,
    profile_form: FormValidator,
}

impl<B, S, N> AuthService<B, S, N>
where
    B: AuthBackend,
    S: SessionStorage,
    N: NotificationSink,
{
    pub fn new(backend: B, session: AuthSession<S>, notifier: N, config: &ValidationConfig) -> Self {
        Self {
            backend,
            session,
            notifier,
            login_form: FormValidator::new(login_rules()),
            registration_form: FormValidator::new(registration_rules(config)),
            profile_form: FormValidator::new(profile_rules(config)),
        }
    }

    pub fn session(&self) -> &AuthSession<S> {
        &self.session
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub async fn login(&mut self, record: &DataRecord) -> Result<UserInfo, VelixaError> {
        let record = self.login_form.validate(record.clone())?;
        let credentials = Credentials {
            username: field_text(&record, "username"),
            password: field_text(&record, "password"),
        };

        let outcome = match self.backend.login(&credentials).await {
            Ok(response) if response.token.is_empty() => Err(VelixaError::backend(
                INVALID_RESPONSE,
                "Invalid login response",
            )),
            Ok(response) => self
                .session
                .establish(&response.token, response.user.clone())
                .map(|_| response.user),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(user) => {
                log::debug!("User {} logged in", user.username);
                self.notifier.success(LOGIN_SUCCESS);
                Ok(user)
            }
            Err(err) => {
                log::error!("Login error: {}", err);
                self.notifier.error(&failure_message(&err, LOGIN_FAILED));
                Err(err)
            }
        }
    }

    pub async fn register(&mut self, record: &DataRecord) -> Result<(), VelixaError> {
        let record = self.registration_form.validate(record.clone())?;
        let registration = Registration {
            username: field_text(&record, "username"),
            email: field_text(&record, "email"),
            password: field_text(&record, "password"),
        };

        match self.backend.register(&registration).await {
            Ok(()) => {
                self.notifier.success(REGISTER_SUCCESS);
                Ok(())
            }
            Err(err) => {
                log::error!("Registration error: {}", err);
                self.notifier.error(&failure_message(&err, REGISTER_FAILED));
                Err(err)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), VelixaError> {
        self.session.clear()?;
        self.notifier.info(LOGGED_OUT);
        Ok(())
    }

    /// The backend rejected the token.
    pub fn session_expired(&mut self) -> Result<(), VelixaError> {
        self.session.clear()?;
        self.notifier.warning(SESSION_EXPIRED);
        Ok(())
    }

    /// Stored user first, then the backend profile. Never fails.
    pub async fn current_user(&mut self) -> Option<UserInfo> {
        if let Some(user) = self.session.user() {
            return Some(user.clone());
        }
        let token = self.session.token()?.to_string();

        let fetched = match self.backend.fetch_profile(&token).await {
            Ok(user) => self.session.update_user(user.clone()).map(|_| user),
            Err(err) => Err(err),
        };
        match fetched {
            Ok(user) => Some(user),
            Err(err) => {
                log::error!("Get current user error: {}", err);
                None
            }
        }
    }

    pub async fn update_profile(&mut self, record: &DataRecord) -> Result<UserInfo, VelixaError> {
        let record = self.profile_form.validate(record.clone())?;

        let outcome = match self.session.token().map(str::to_string) {
            Some(token) => match self.backend.update_profile(&token, &record).await {
                Ok(user) => self.session.update_user(user.clone()).map(|_| user),
                Err(err) => Err(err),
            },
            None => Err(VelixaError::session(
                NOT_AUTHENTICATED,
                "Not logged in",
            )),
        };

        match outcome {
            Ok(user) => {
                self.notifier.success(PROFILE_UPDATED);
                Ok(user)
            }
            Err(err) => {
                log::error!("Update profile error: {}", err);
                self.notifier
                    .error(&failure_message(&err, PROFILE_UPDATE_FAILED));
                Err(err)
            }
        }
    }
}
