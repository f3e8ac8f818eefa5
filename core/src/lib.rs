//! # VELIXA CORE LIBRARY
//!
//! **CLIENT-SIDE FORM VALIDATION AND USER FEEDBACK**
//!
//! **ARCHITECTURE**: Trait-based validation engine with notification and modal sinks
//! **GUARANTEE**: Validation is pure and never panics on input data
//! **INTEGRATION**: Auth flows wire validation, session storage and feedback together

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod logging;
pub mod modal;
pub mod notification;
pub mod session;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;
