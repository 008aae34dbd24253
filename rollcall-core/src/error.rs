use thiserror::Error;

#[derive(Error, Debug)]
pub enum RollcallError {
    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Malformed descriptor: {0}")]
    MalformedDescriptor(String),
}

pub type Result<T> = std::result::Result<T, RollcallError>;
