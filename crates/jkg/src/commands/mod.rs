pub mod index;
pub mod load;
pub mod query;
pub mod related;
