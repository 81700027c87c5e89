use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Malformed report JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Unexpected report shape: {0}")]
    UnexpectedShape(String),
}
