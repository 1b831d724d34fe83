use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum MaintError {
    #[error("missing required environment variable {0}")]
    MissingRepoUrl(String),

    #[error("failed to read index file at {0}")]
    IndexRead(PathBuf),

    #[error("failed to parse JSON index: {0}")]
    IndexParse(String),

    #[error("mirror request failed: {0}")]
    MirrorHttp(String),

    #[error("mirror returned status {status}: {message}")]
    MirrorStatus { status: u16, message: String },

    #[error("failed to parse SVG: {0}")]
    SvgParse(String),

    #[error("icon rendering failed: {0}")]
    Render(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
