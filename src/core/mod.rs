//! Core Module - Business Logic
//!
//! Heuristic risk scoring over ledger snapshots.

pub mod risk_score;

pub use risk_score::*;
