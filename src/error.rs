//! Error types for swipeshot.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to open input device {}: {source}", path.display())]
    DeviceOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no multi-touch device selected: {0}")]
    DeviceSelection(String),

    #[error("device reports no multi-touch position axes")]
    NotMultiTouch,

    #[error("screenshot failed: {0}")]
    ScreenshotFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
