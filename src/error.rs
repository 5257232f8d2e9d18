use thiserror::Error;

#[derive(Error, Debug)]
pub enum VirtualMouseError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Acquisition Error: {0}")]
    Acquisition(String),

    #[error("Detector Error: {0}")]
    Detector(String),

    #[error("Dispatch Error: {0}")]
    Dispatch(String),
}

pub type VmResult<T> = Result<T, VirtualMouseError>;
