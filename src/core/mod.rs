//! Core module - shared types, errors, paths and utilities

mod error;
pub mod http;
pub mod paths;
mod types;
pub mod validation;

pub use error::{LvmError, Result, format_error_with_suggestion, suggestion_for_code};
pub use types::*;
