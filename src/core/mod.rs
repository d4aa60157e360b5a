//! Core types shared across tera-jsx.
//!
//! Currently this is the error vocabulary: [`JsxError`] for typed failures and
//! [`ErrorContext`] / [`user_friendly_error`] for presenting them on the command line.

pub mod error;

pub use error::{ErrorContext, JsxError, user_friendly_error};
