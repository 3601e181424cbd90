//! PX Validator API Module
//! REST API for wallet validation, metrics and ISO 20022 export

pub mod handlers;
pub mod iso_export;
pub mod middleware;
pub mod routes;
pub mod types;

pub use routes::create_router;
pub use types::*;
