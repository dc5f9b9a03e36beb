pub mod common;
pub mod config;
pub mod indexing;
pub mod types;
pub mod vector;
pub use self::config::Config;
