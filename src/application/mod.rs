//! # Application Layer
//!
//! Service interfaces and the use cases built on them: the existence
//! checker, per-entry validation sessions, the list coordinator, and the
//! chat flow.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
