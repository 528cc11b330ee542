pub mod catalog;
pub mod config;
pub mod models;
pub mod passwords;
pub mod snapshot;
pub mod store;
