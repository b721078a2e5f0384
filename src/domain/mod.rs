//! # Domain Layer
//!
//! Core models, errors, and pure validation rules.
//! This layer is independent of runtimes and external services.

pub mod error;
pub mod models;
pub mod services;

pub use error::*;
pub use models::*;
pub use services::*;
