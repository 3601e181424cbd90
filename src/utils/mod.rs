//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, input sanitization and the durable metrics store.

pub mod constants;
pub mod metrics;
pub mod sanitize;

pub use constants::*;
pub use metrics::*;
pub use sanitize::*;
