//! Errors from artifact rendering and writing.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results within the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while selecting or writing artifacts.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown artifact: '{name}'. Available artifacts: linker-script, clock-assignments")]
    UnknownArtifact { name: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
