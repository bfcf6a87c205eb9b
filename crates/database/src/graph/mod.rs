pub mod store;
pub mod types;

pub use store::GraphStore;
pub use types::*;
