use thiserror::Error;
use std::num::{ParseFloatError, ParseIntError};

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("HTTP fetch error: {0}")]
    FetchError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateError(#[from] chrono::ParseError),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Embedded state not found: {0}")]
    StateNotFound(String),

    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse int error: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Parse float error: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;

// 用于从字符串创建错误
impl From<String> for ScraperError {
    fn from(s: String) -> Self {
        ScraperError::Unknown(s)
    }
}

// 用于从&str创建错误
impl From<&str> for ScraperError {
    fn from(s: &str) -> Self {
        ScraperError::Unknown(s.to_string())
    }
}
