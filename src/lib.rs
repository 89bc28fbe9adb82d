pub mod config;
pub mod engine;
pub mod environment;
pub mod errors;
pub mod listing;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod store;
pub mod validation;
