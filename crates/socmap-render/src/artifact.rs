//! Artifact trait and core abstractions for generated files.

use std::path::Path;

use tracing::info;

use crate::error::{RenderError, Result};

/// Name written into generated file headers.
pub const GENERATOR: &str = "socmap";

/// The kind of artifact to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    LinkerScript,
    ClockAssignments,
}

impl ArtifactKind {
    /// Parse an artifact kind from a string.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "linker-script" | "linker" | "ld" => Ok(ArtifactKind::LinkerScript),
            "clock-assignments" | "clocks" | "rtl" => Ok(ArtifactKind::ClockAssignments),
            _ => Err(RenderError::UnknownArtifact {
                name: s.to_string(),
            }),
        }
    }

    /// Display name for this artifact kind.
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactKind::LinkerScript => "linker-script",
            ArtifactKind::ClockAssignments => "clock-assignments",
        }
    }
}

/// A text artifact rendered from already-synthesized data.
pub trait Artifact {
    /// The kind of artifact this is.
    fn kind(&self) -> ArtifactKind;

    /// Render the full file contents.
    fn render(&self) -> String;
}

/// All available artifact kinds.
pub fn available_artifacts() -> &'static [ArtifactKind] {
    &[ArtifactKind::LinkerScript, ArtifactKind::ClockAssignments]
}

/// Render an artifact and write it to `path`, creating parent directories.
///
/// Failures are reported, never retried.
pub fn write_artifact<A: Artifact + ?Sized>(artifact: &A, path: &Path) -> Result<()> {
    let text = artifact.render();
    let to_err = |source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(to_err)?;
    }
    std::fs::write(path, text.as_bytes()).map_err(to_err)?;
    info!(
        artifact = artifact.kind().name(),
        path = %path.display(),
        bytes = text.len(),
        "wrote artifact"
    );
    Ok(())
}
