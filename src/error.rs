//! Startup failures. Once the frame loop is running nothing can fail except
//! terminal I/O, so this is the whole error taxonomy.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no interactive terminal is available")]
    DisplayUnavailable,

    #[error("screen must be at least {need_cols} x {need_rows} cells (found {cols} x {rows})")]
    ScreenTooSmall {
        need_cols: u16,
        need_rows: u16,
        cols: u16,
        rows: u16,
    },

    #[error("failed to load {}", path.display())]
    MissingAsset { path: PathBuf },

    #[error("failed to create {what}: {source}")]
    ResourceCreation {
        what: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

impl StartupError {
    /// Process exit status reported for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            StartupError::DisplayUnavailable => 2,
            StartupError::ScreenTooSmall { .. } => 3,
            StartupError::MissingAsset { .. } => 4,
            StartupError::ResourceCreation { .. } => 5,
            StartupError::Terminal(_) => 6,
        }
    }
}
