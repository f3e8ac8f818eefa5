//! Per-dialog options. Defaults follow the stock dialogs: "Confirm" /
//! "Are you sure?" / "Confirm" / "Cancel", "Alert" / "OK", "Prompt" / "OK" /
//! "Cancel".

use crate::config::ModalConfig;
use std::time::Duration;

/// How a dialog may be closed without pressing a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogBehavior {
    /// Backdrop, escape and the close button are honoured.
    pub closable: bool,
    /// Resolve negatively after this long without an answer.
    pub auto_dismiss: Option<Duration>,
}

impl Default for DialogBehavior {
    fn default() -> Self {
        Self {
            closable: true,
            auto_dismiss: None,
        }
    }
}

impl From<&ModalConfig> for DialogBehavior {
    fn from(config: &ModalConfig) -> Self {
        Self {
            closable: config.closable,
            auto_dismiss: config.auto_dismiss_ms.map(Duration::from_millis),
        }
    }
}

/// A dialog with arbitrary buttons. Resolves to the index of the pressed
/// button.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalOptions {
    pub title: String,
    pub content: String,
    /// Button labels in display order.
    pub buttons: Vec<String>,
    pub behavior: Option<DialogBehavior>,
}

impl ModalOptions {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn button(mut self, label: impl Into<String>) -> Self {
        self.buttons.push(label.into());
        self
    }

    pub fn behavior(mut self, behavior: DialogBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            title: "Modal Title".to_string(),
            content: String::new(),
            buttons: Vec::new(),
            behavior: None,
        }
    }
}

impl From<ConfirmOptions> for ModalOptions {
    fn from(options: ConfirmOptions) -> Self {
        Self {
            title: options.title,
            content: options.message,
            buttons: vec![options.confirm_label, options.cancel_label],
            behavior: options.behavior,
        }
    }
}

impl From<AlertOptions> for ModalOptions {
    fn from(options: AlertOptions) -> Self {
        Self {
            title: options.title,
            content: options.message,
            buttons: vec![options.ok_label],
            behavior: options.behavior,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmOptions {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    /// Manager default when unset.
    pub behavior: Option<DialogBehavior>,
}

impl ConfirmOptions {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn behavior(mut self, behavior: DialogBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: "Confirm".to_string(),
            message: "Are you sure?".to_string(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            behavior: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertOptions {
    pub title: String,
    pub message: String,
    pub ok_label: String,
    pub behavior: Option<DialogBehavior>,
}

impl AlertOptions {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn ok_label(mut self, label: impl Into<String>) -> Self {
        self.ok_label = label.into();
        self
    }

    pub fn behavior(mut self, behavior: DialogBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

impl Default for AlertOptions {
    fn default() -> Self {
        Self {
            title: "Alert".to_string(),
            message: String::new(),
            ok_label: "OK".to_string(),
            behavior: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptOptions {
    pub title: String,
    pub label: String,
    pub default_value: String,
    pub placeholder: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub behavior: Option<DialogBehavior>,
}

impl PromptOptions {
    pub fn new(title: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn behavior(mut self, behavior: DialogBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            title: "Prompt".to_string(),
            label: String::new(),
            default_value: String::new(),
            placeholder: String::new(),
            confirm_label: "OK".to_string(),
            cancel_label: "Cancel".to_string(),
            behavior: None,
        }
    }
}
