//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, image codec and JSON errors, and provides semantic
//! variants for input validation and rescaling failures.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::Dimensions;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input file not found: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Image size mismatch: left {left} vs right {right}")]
    SizeMismatch { left: Dimensions, right: Dimensions },

    #[error("Invalid K matrix format in {}: expected 9 values, found {found}", path.display())]
    InvalidMatrixFormat { path: PathBuf, found: usize },

    #[error("Invalid number on line {line}: {token:?}")]
    InvalidNumber { line: usize, token: String },

    #[error("Output size {width}x{height} is degenerate for divisor {divisor}")]
    DegenerateOutputSize { width: u32, height: u32, divisor: u32 },

    #[error("Invalid argument: {arg}={value}")]
    InvalidArgument { arg: &'static str, value: String },

    #[error("Resize error: {0}")]
    Resize(String),
}

impl Error {
    pub fn resize<E: std::fmt::Display>(e: E) -> Self {
        Error::Resize(e.to_string())
    }
}
