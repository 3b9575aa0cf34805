//! Source fetcher for demandpulse.
//!
//! Streams social posts matching a product query from an external post-search
//! service, delivering them in batches to a caller-supplied callback. The
//! callback decides after every batch whether fetching continues, which is how
//! cooperative cancellation reaches the fetch loop. Partial results are a
//! valid outcome: both an abort and a mid-fetch error return whatever posts
//! were already accumulated.

pub mod client;
pub mod error;
pub mod source;
pub mod types;

mod retry;

pub use client::HttpPostSource;
pub use error::SourceError;
pub use source::{BatchHandler, PostSource};
pub use types::{BatchControl, FetchOutcome, FetchStatus};
