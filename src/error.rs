use thiserror::Error;

/// Failures raised while fetching, reading or writing graph data.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid query pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
