//! CLI command implementations.

use std::path::PathBuf;

use anyhow::{Context, Result};
use socmap_core::BusDescriptor;

pub mod clocks;
pub mod generate;
pub mod init;
pub mod inspect;
pub mod linker;

/// Load every bus configuration, in order.
pub(crate) fn load_buses(paths: &[PathBuf]) -> Result<Vec<BusDescriptor>> {
    paths
        .iter()
        .map(|p| BusDescriptor::load_csv(p).with_context(|| format!("loading {}", p.display())))
        .collect()
}
