use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read products file at {path}: {source}")]
    ProductsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse products file: {0}")]
    ProductsFileParse(#[from] serde_yaml::Error),

    #[error("failed to read dataset at {path}: {source}")]
    DatasetIo {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("dataset at {path} has no {column} column")]
    DatasetMissingColumn { path: String, column: String },

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("invalid max-posts value: {0} (expected 100, 500, 1000, 2000, 5000, or none)")]
    InvalidMaxPosts(String),
}
