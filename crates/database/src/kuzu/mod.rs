pub mod config;
pub mod connection;
pub mod database;
pub mod store;
pub mod types;
