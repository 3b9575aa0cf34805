use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// A required query parameter is missing or inconsistent. The only
    /// condition that aborts a run before any fetch starts; fetch-time errors
    /// are recovered locally and interruption is not an error at all.
    #[error("validation error: {0}")]
    Validation(String),
}
