pub mod cli;
pub mod error;
pub mod github;
pub mod graphql;
pub mod models;
pub mod pool;
pub mod rating;
pub mod render;
pub mod seed;
pub mod server;
pub mod store;
pub mod types;
