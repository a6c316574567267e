pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown aggregation function: {name}")]
    UnknownAggregation { name: String },

    #[error("Unknown filter operation: {name}")]
    UnknownFilterOperation { name: String },

    #[error("Invalid regular expression {pattern:?}: {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Invalid tool config: {message}")]
    InvalidConfig { message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
