//! # VELIXA NOTIFICATIONS
//!
//! **TRANSIENT USER FEEDBACK BY SEVERITY**
//!
//! `NotificationSink` is the contract form handlers report through.
//! `NotificationCenter` is the in-process implementation: it tracks what is
//! on screen, draws through a `NotificationSurface`, and closes each
//! notification after its duration on the tokio runtime.
//!
//! A center without a surface, or whose surface fails, logs the problem and
//! hands back a detached handle. Callers carry on either way.

use crate::config::NotificationConfig;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

pub mod surface;

pub use surface::{MemorySurface, NotificationSurface, TerminalSurface};

pub type NotificationId = u64;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationOptions {
    /// Zero keeps the notification until it is dismissed.
    pub duration: Duration,
    pub closable: bool,
}

impl NotificationOptions {
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_closable(mut self, closable: bool) -> Self {
        self.closable = closable;
        self
    }

    pub fn persistent() -> Self {
        Self::default().with_duration(Duration::ZERO)
    }
}

impl Default for NotificationOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            closable: true,
        }
    }
}

impl From<&NotificationConfig> for NotificationOptions {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            duration: Duration::from_millis(config.default_duration_ms),
            closable: config.closable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub options: NotificationOptions,
}

/// Opaque reference to a shown notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationHandle {
    id: NotificationId,
    attached: bool,
}

impl NotificationHandle {
    fn attached(id: NotificationId) -> Self {
        Self { id, attached: true }
    }

    fn detached(id: NotificationId) -> Self {
        Self {
            id,
            attached: false,
        }
    }

    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// False when nothing was rendered.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

/// **NOTIFICATION SINK CONTRACT**
pub trait NotificationSink: Send + Sync {
    fn show(
        &self,
        kind: NotificationKind,
        message: &str,
        options: NotificationOptions,
    ) -> NotificationHandle;

    /// Early close through the notification's close action. Returns false
    /// if it is already gone or has no close action.
    fn dismiss(&self, handle: &NotificationHandle) -> bool;

    fn default_options(&self) -> NotificationOptions {
        NotificationOptions::default()
    }

    fn success(&self, message: &str) -> NotificationHandle {
        self.show(NotificationKind::Success, message, self.default_options())
    }

    fn error(&self, message: &str) -> NotificationHandle {
        self.show(NotificationKind::Error, message, self.default_options())
    }

    fn warning(&self, message: &str) -> NotificationHandle {
        self.show(NotificationKind::Warning, message, self.default_options())
    }

    fn info(&self, message: &str) -> NotificationHandle {
        self.show(NotificationKind::Info, message, self.default_options())
    }
}

struct CenterInner {
    surface: Option<Arc<dyn NotificationSurface>>,
    active: Mutex<HashMap<NotificationId, Notification>>,
    next_id: AtomicU64,
    defaults: NotificationOptions,
}

impl CenterInner {
    fn close(&self, id: NotificationId) -> bool {
        let removed = self.active.lock().remove(&id);
        if removed.is_none() {
            return false;
        }
        if let Some(surface) = &self.surface {
            if let Err(err) = surface.remove(id) {
                log::warn!("Failed to remove notification {}: {}", id, err);
            }
        }
        true
    }
}

/// **NOTIFICATION CENTER**
///
/// Cheap to clone; clones share the same active set.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<CenterInner>,
}

impl NotificationCenter {
    pub fn new(surface: impl NotificationSurface + 'static) -> Self {
        Self::build(Some(Arc::new(surface)), NotificationOptions::default())
    }

    pub fn with_defaults(
        surface: impl NotificationSurface + 'static,
        defaults: NotificationOptions,
    ) -> Self {
        Self::build(Some(Arc::new(surface)), defaults)
    }

    /// A center with nowhere to draw.
    pub fn detached() -> Self {
        Self::build(None, NotificationOptions::default())
    }

    fn build(surface: Option<Arc<dyn NotificationSurface>>, defaults: NotificationOptions) -> Self {
        log::debug!("Creating NotificationCenter (attached: {})", surface.is_some());
        Self {
            inner: Arc::new(CenterInner {
                surface,
                active: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                defaults,
            }),
        }
    }

    /// Notifications currently on screen, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        let mut active: Vec<Notification> = self.inner.active.lock().values().cloned().collect();
        active.sort_by_key(|n| n.id);
        active
    }

    pub fn is_active(&self, handle: &NotificationHandle) -> bool {
        self.inner.active.lock().contains_key(&handle.id)
    }

    /// Programmatic close, regardless of `closable`.
    pub fn close(&self, handle: &NotificationHandle) -> bool {
        self.inner.close(handle.id)
    }

    pub fn clear(&self) {
        let ids: Vec<NotificationId> = self.inner.active.lock().keys().copied().collect();
        for id in ids {
            self.inner.close(id);
        }
    }

    fn schedule_close(&self, id: NotificationId, after: Duration) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner: Weak<CenterInner> = Arc::downgrade(&self.inner);
                runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    if let Some(inner) = inner.upgrade() {
                        inner.close(id);
                    }
                });
            }
            Err(_) => {
                log::debug!(
                    "No async runtime, notification {} stays until dismissed",
                    id
                );
            }
        }
    }
}

impl NotificationSink for NotificationCenter {
    fn show(
        &self,
        kind: NotificationKind,
        message: &str,
        options: NotificationOptions,
    ) -> NotificationHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        let Some(surface) = &self.inner.surface else {
            log::error!("Notification container not found, dropping {}: {}", kind, message);
            return NotificationHandle::detached(id);
        };

        let notification = Notification {
            id,
            kind,
            message: message.to_string(),
            options,
        };
        if let Err(err) = surface.render(&notification) {
            log::error!("Failed to render notification {}: {}", id, err);
            return NotificationHandle::detached(id);
        }

        self.inner.active.lock().insert(id, notification);
        if !options.duration.is_zero() {
            self.schedule_close(id, options.duration);
        }

        NotificationHandle::attached(id)
    }

    fn dismiss(&self, handle: &NotificationHandle) -> bool {
        let closable = match self.inner.active.lock().get(&handle.id) {
            Some(notification) => notification.options.closable,
            None => return false,
        };
        closable && self.inner.close(handle.id)
    }

    fn default_options(&self) -> NotificationOptions {
        self.inner.defaults
    }
}
