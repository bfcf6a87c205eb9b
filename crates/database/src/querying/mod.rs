pub mod library;
pub mod query_builder;
pub mod service;
pub mod types;

pub use service::DatabaseQueryingService;
pub use types::*;
