use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid preset {}: {source}", path.display())]
    InvalidPreset {
        path: PathBuf,
        source: stereoscale::Error,
    },

    #[error(transparent)]
    Rescale(#[from] stereoscale::Error),
}
