//! 스카이 영혼 대백과 CLI

pub mod api;
pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod store;

pub use api::ApiClient;
pub use config::Config;
pub use error::{Result, SkySoulsError};
pub use store::FileStore;
