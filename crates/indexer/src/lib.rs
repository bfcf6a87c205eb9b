pub mod analysis;
pub mod execution;
pub mod extraction;
pub mod loader;
pub mod parsing;
pub mod project;
pub mod stats;
pub mod writer;
