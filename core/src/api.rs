pub use crate::auth::{AuthBackend, AuthService, Credentials, LoginResponse, Registration};
pub use crate::config::VelixaConfig;
pub use crate::errors::VelixaError;
pub use crate::modal::{
    AlertOptions, ConfirmOptions, Deferred, DialogBehavior, DismissReason, ModalManager, ModalSink,
    ModalOptions, PromptOptions,
};
pub use crate::notification::{
    NotificationCenter, NotificationKind, NotificationOptions, NotificationSink,
};
pub use crate::session::{AuthSession, FileStorage, MemoryStorage, SessionStorage, UserInfo};
pub use crate::types::{record_from_json, DataRecord};
pub use crate::validation::{
    is_empty, is_valid_email, validate_form, validate_password_strength, FieldRule,
    PasswordStrength, RuleSet, ValidationResult,
};
