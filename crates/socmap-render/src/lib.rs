//! Artifact rendering for synthesized SoC address maps.
//!
//! Renders a [`MemoryLayout`](socmap_core::MemoryLayout) into a linker script
//! and [`ClockDomains`](socmap_core::ClockDomains) into a SystemVerilog
//! clock-assignment include. Rendering is pure formatting: identical input
//! always yields byte-identical text.

pub mod artifact;
pub mod error;
pub mod format;
pub mod linker;
pub mod rtl;

pub use artifact::{available_artifacts, write_artifact, Artifact, ArtifactKind, GENERATOR};
pub use error::RenderError;
pub use linker::{LinkerScript, PeripheralSymbols};
pub use rtl::ClockAssignments;
