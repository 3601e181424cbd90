//! Providers Module - External Data Sources
//!
//! Ledger JSON-RPC access with sticky failover.

pub mod ledger;

pub use ledger::*;
