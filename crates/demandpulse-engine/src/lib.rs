//! Query orchestration for demandpulse.
//!
//! Drives the fetch → score → aggregate pipeline per product, owns the shared
//! run state (cancellation token + progress log), and exposes the
//! [`RunController`] state machine the presentation layer talks to. A run is
//! one long call on a background task; the view-refresh path only ever reads
//! the log buffer and the last results, never drives the pipeline.

pub mod controller;
pub mod error;
pub mod log;
pub mod run;

pub use controller::{RunController, RunPhase};
pub use error::EngineError;
pub use log::LogBuffer;
pub use run::{run_query, RunRequest, RunState};
