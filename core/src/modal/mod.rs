//! # VELIXA MODALS
//!
//! **ASYNCHRONOUS DIALOGS WITH BUTTONS**
//!
//! `ModalSink` is the contract callers await on. `ModalManager` is the
//! in-process implementation: each open dialog holds a oneshot sender, the
//! caller awaits the matching [`Deferred`], and whoever drives the screen
//! answers through `press`, `accept`, `cancel`, `set_input` and `dismiss`.
//!
//! Every dialog is a title, a body and a row of buttons. Confirm, alert and
//! prompt are that same dialog with stock buttons and a mapping from the
//! pressed button to their answer.
//!
//! Every dialog resolves exactly once. Dismissal (backdrop, escape, close
//! button, timeout) counts as the negative answer.

use crate::errors::VelixaError;
use async_trait::async_trait;
use deferred::Resolution;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

pub mod deferred;
pub mod options;

pub use deferred::Deferred;
pub use options::{AlertOptions, ConfirmOptions, DialogBehavior, ModalOptions, PromptOptions};

pub type ModalId = u64;

pub const MODAL_NOT_FOUND: &str = "VELIXA_MODAL_NOT_FOUND";
pub const MODAL_NOT_CLOSABLE: &str = "VELIXA_MODAL_NOT_CLOSABLE";
pub const MODAL_NO_INPUT: &str = "VELIXA_MODAL_NO_INPUT";
pub const MODAL_NO_BUTTON: &str = "VELIXA_MODAL_NO_BUTTON";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DialogKind {
    Custom,
    Confirm,
    Alert,
    Prompt,
}

/// Ways a dialog closes without a button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Backdrop,
    Escape,
    CloseButton,
    /// Auto-dismiss timer. Honoured even when the dialog is not closable.
    Timeout,
}

/// What the screen needs to draw a dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogSnapshot {
    pub id: ModalId,
    pub kind: DialogKind,
    pub title: String,
    pub body: String,
    /// Button labels, primary first.
    pub buttons: Vec<String>,
    /// Current prompt text. `None` for every other kind.
    pub input: Option<String>,
    pub placeholder: Option<String>,
    pub closable: bool,
}

/// **MODAL SINK CONTRACT**
#[async_trait]
pub trait ModalSink: Send + Sync {
    /// Index of the pressed button, `None` when closed without one.
    async fn custom(&self, options: ModalOptions) -> Option<usize>;

    /// `true` only when the confirm button was pressed.
    async fn confirm(&self, options: ConfirmOptions) -> bool;

    /// Completes however the alert is closed.
    async fn alert(&self, options: AlertOptions);

    /// The entered text on OK (possibly empty), `None` otherwise.
    async fn prompt(&self, options: PromptOptions) -> Option<String>;
}

struct OpenDialog {
    snapshot: DialogSnapshot,
    responder: oneshot::Sender<Resolution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Press(usize),
    Cancel,
    Dismiss(DismissReason),
}

struct ManagerInner {
    dialogs: Mutex<HashMap<ModalId, OpenDialog>>,
    next_id: AtomicU64,
    defaults: DialogBehavior,
    observer: Option<mpsc::UnboundedSender<DialogSnapshot>>,
}

impl ManagerInner {
    fn resolve(&self, id: ModalId, answer: Answer) -> Result<(), VelixaError> {
        let dialog = {
            let mut dialogs = self.dialogs.lock();
            let snapshot = match dialogs.get(&id) {
                Some(dialog) => &dialog.snapshot,
                None => return Err(not_found(id)),
            };
            match answer {
                Answer::Press(index) if index >= snapshot.buttons.len() => {
                    return Err(VelixaError::presentation(
                        MODAL_NO_BUTTON,
                        format!(
                            "Modal {} has {} button(s), no button {}",
                            id,
                            snapshot.buttons.len(),
                            index
                        ),
                    ));
                }
                Answer::Dismiss(reason)
                    if reason != DismissReason::Timeout && !snapshot.closable =>
                {
                    return Err(VelixaError::presentation(
                        MODAL_NOT_CLOSABLE,
                        format!("Modal {} can only be closed with its buttons", id),
                    ));
                }
                _ => {}
            }
            match dialogs.remove(&id) {
                Some(dialog) => dialog,
                None => return Err(not_found(id)),
            }
        };

        let resolution = Resolution {
            button: match answer {
                Answer::Press(index) => Some(index),
                Answer::Cancel | Answer::Dismiss(_) => None,
            },
            input: dialog.snapshot.input,
        };
        if dialog.responder.send(resolution).is_err() {
            log::debug!("Modal {} answered after its caller went away", id);
        }
        log::debug!("Modal {} resolved with {:?}", id, answer);
        Ok(())
    }
}

fn not_found(id: ModalId) -> VelixaError {
    VelixaError::presentation(MODAL_NOT_FOUND, format!("Modal {} is not open", id))
}

/// **MODAL MANAGER**
///
/// Cheap to clone; clones share the same open dialogs. Dropping the last
/// clone resolves every pending dialog negatively.
#[derive(Clone)]
pub struct ModalManager {
    inner: Arc<ManagerInner>,
}

impl Default for ModalManager {
    fn default() -> Self {
        Self::new(DialogBehavior::default())
    }
}

impl ModalManager {
    pub fn new(defaults: DialogBehavior) -> Self {
        Self::build(defaults, None)
    }

    /// Manager plus a stream of every dialog as it opens.
    pub fn with_observer(
        defaults: DialogBehavior,
    ) -> (Self, mpsc::UnboundedReceiver<DialogSnapshot>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self::build(defaults, Some(sender)), receiver)
    }

    fn build(
        defaults: DialogBehavior,
        observer: Option<mpsc::UnboundedSender<DialogSnapshot>>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                dialogs: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                defaults,
                observer,
            }),
        }
    }

    // ========================================================================
    // OPENING
    // ========================================================================

    /// Opens a dialog with arbitrary buttons.
    pub fn open_custom(&self, options: ModalOptions) -> Deferred<Option<usize>> {
        self.open(DialogKind::Custom, options, None, |r| r.button)
    }

    pub fn open_confirm(&self, options: ConfirmOptions) -> Deferred<bool> {
        self.open(DialogKind::Confirm, options.into(), None, |r| {
            r.button == Some(0)
        })
    }

    pub fn open_alert(&self, options: AlertOptions) -> Deferred<()> {
        self.open(DialogKind::Alert, options.into(), None, |_| ())
    }

    pub fn open_prompt(&self, options: PromptOptions) -> Deferred<Option<String>> {
        let placeholder = (!options.placeholder.is_empty()).then_some(options.placeholder);
        let dialog = ModalOptions {
            title: options.title,
            content: options.label,
            buttons: vec![options.confirm_label, options.cancel_label],
            behavior: options.behavior,
        };
        let field = PromptField {
            value: options.default_value,
            placeholder,
        };
        self.open(DialogKind::Prompt, dialog, Some(field), |r| match r.button {
            Some(0) => Some(r.input.unwrap_or_default()),
            _ => None,
        })
    }

    fn open<T>(
        &self,
        kind: DialogKind,
        options: ModalOptions,
        field: Option<PromptField>,
        answer: fn(Resolution) -> T,
    ) -> Deferred<T> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let behavior = options.behavior.unwrap_or(self.inner.defaults);
        let (input, placeholder) = match field {
            Some(field) => (Some(field.value), field.placeholder),
            None => (None, None),
        };
        let snapshot = DialogSnapshot {
            id,
            kind,
            title: options.title,
            body: options.content,
            buttons: options.buttons,
            input,
            placeholder,
            closable: behavior.closable,
        };

        let (responder, receiver) = oneshot::channel();
        let announced = self.inner.observer.as_ref().map(|_| snapshot.clone());
        self.inner
            .dialogs
            .lock()
            .insert(id, OpenDialog { snapshot, responder });
        log::debug!("Opened {:?} modal {}", kind, id);

        // Announce only once the dialog can be answered.
        if let (Some(observer), Some(snapshot)) = (&self.inner.observer, announced) {
            if observer.send(snapshot).is_err() {
                log::warn!("Modal observer is gone, modal {} is not displayed", id);
            }
        }

        if let Some(after) = behavior.auto_dismiss {
            self.schedule_timeout(id, after);
        }
        Deferred::new(id, receiver, answer)
    }

    fn schedule_timeout(&self, id: ModalId, after: Duration) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let inner: Weak<ManagerInner> = Arc::downgrade(&self.inner);
                runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    if let Some(inner) = inner.upgrade() {
                        // Already answered is fine.
                        let _ = inner.resolve(id, Answer::Dismiss(DismissReason::Timeout));
                    }
                });
            }
            Err(_) => {
                log::debug!("No async runtime, modal {} will not time out", id);
            }
        }
    }

    // ========================================================================
    // ANSWERING
    // ========================================================================

    /// Presses button `index`, counted from the primary button.
    pub fn press(&self, id: ModalId, index: usize) -> Result<(), VelixaError> {
        self.inner.resolve(id, Answer::Press(index))
    }

    /// Primary button: confirm, OK.
    pub fn accept(&self, id: ModalId) -> Result<(), VelixaError> {
        self.press(id, 0)
    }

    /// Closes without a button press, whether or not the dialog is closable.
    pub fn cancel(&self, id: ModalId) -> Result<(), VelixaError> {
        self.inner.resolve(id, Answer::Cancel)
    }

    pub fn dismiss(&self, id: ModalId, reason: DismissReason) -> Result<(), VelixaError> {
        self.inner.resolve(id, Answer::Dismiss(reason))
    }

    /// Replaces the text of an open prompt.
    pub fn set_input(&self, id: ModalId, text: impl Into<String>) -> Result<(), VelixaError> {
        let mut dialogs = self.inner.dialogs.lock();
        let dialog = dialogs.get_mut(&id).ok_or_else(|| not_found(id))?;
        match dialog.snapshot.input.as_mut() {
            Some(input) => {
                *input = text.into();
                Ok(())
            }
            None => Err(VelixaError::presentation(
                MODAL_NO_INPUT,
                format!("Modal {} has no input field", id),
            )),
        }
    }

    // ========================================================================
    // INSPECTION
    // ========================================================================

    /// Open dialogs, oldest first.
    pub fn open_dialogs(&self) -> Vec<DialogSnapshot> {
        let mut open: Vec<DialogSnapshot> = self
            .inner
            .dialogs
            .lock()
            .values()
            .map(|dialog| dialog.snapshot.clone())
            .collect();
        open.sort_by_key(|snapshot| snapshot.id);
        open
    }

    pub fn is_open(&self, id: ModalId) -> bool {
        self.inner.dialogs.lock().contains_key(&id)
    }

    /// Drops every open dialog; their callers get the negative answer.
    pub fn close_all(&self) {
        let closed: Vec<OpenDialog> = self
            .inner
            .dialogs
            .lock()
            .drain()
            .map(|(_, dialog)| dialog)
            .collect();
        if !closed.is_empty() {
            log::debug!("Closed {} open modal(s)", closed.len());
        }
    }
}

struct PromptField {
    value: String,
    placeholder: Option<String>,
}

#[async_trait]
impl ModalSink for ModalManager {
    async fn custom(&self, options: ModalOptions) -> Option<usize> {
        self.open_custom(options).await
    }

    async fn confirm(&self, options: ConfirmOptions) -> bool {
        self.open_confirm(options).await
    }

    async fn alert(&self, options: AlertOptions) {
        self.open_alert(options).await
    }

    async fn prompt(&self, options: PromptOptions) -> Option<String> {
        self.open_prompt(options).await
    }
}
