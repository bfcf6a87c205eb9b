pub mod java;
pub mod processor;
pub mod syntax;
