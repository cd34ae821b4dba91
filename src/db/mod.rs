pub mod memory;
pub mod models;
pub mod pg;
pub mod store;
