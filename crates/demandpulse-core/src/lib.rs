//! Shared types and configuration for demandpulse.
//!
//! Defines the post/result data model, the query parameters passed to the
//! source fetcher, the cooperative cancellation token, the env-driven
//! application config, and loaders for the bundled location/country datasets
//! and the products file.

pub mod cancel;
pub mod config;
pub mod datasets;
pub mod error;
pub mod products;
pub mod query;
pub mod types;

mod app_config;

pub use app_config::AppConfig;
pub use cancel::CancelToken;
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use query::{MaxPosts, PostQuery};
pub use types::{round2, Post, ProductResult, ScoredPost};
