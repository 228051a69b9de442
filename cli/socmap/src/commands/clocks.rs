//! `socmap clocks`: clock-assignment RTL generation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use socmap_core::{ClockDomains, ClockPlan};
use socmap_render::{write_artifact, ClockAssignments};
use tracing::warn;

use crate::commands::load_buses;
use crate::manifest::SocManifest;

/// Resolve where the RTL include is written.
///
/// An explicit output wins; otherwise the configured RTL path is joined to
/// the Xilinx root (command line / `XILINX_ROOT` first, then the manifest).
pub(crate) fn resolve_output(
    project_dir: &Path,
    manifest: &SocManifest,
    output: Option<&Path>,
    xilinx_root: Option<&Path>,
) -> Result<PathBuf> {
    if let Some(output) = output {
        return Ok(output.to_path_buf());
    }
    let root = match xilinx_root {
        Some(root) => root.to_path_buf(),
        None => match manifest.xilinx_root(project_dir) {
            Some(root) => root,
            None => bail!("no RTL output location: pass --output or --xilinx-root, or set XILINX_ROOT"),
        },
    };
    Ok(root.join(&manifest.rtl.output))
}

/// A clock-assignment include ready to be written.
pub(crate) struct ClocksJob {
    domains: ClockDomains,
    output: PathBuf,
}

impl ClocksJob {
    pub(crate) fn write(&self) -> Result<()> {
        write_artifact(&ClockAssignments::new(&self.domains), &self.output)?;
        println!(
            "Generated clock assignments ({} domain binding(s)) → {}",
            self.domains.bindings.len(),
            self.output.display()
        );
        Ok(())
    }
}

/// Load the configurations, derive the clock plan and resolve the output.
///
/// Returns `None` when there is nothing to generate: no main bus (an error
/// if `strict` is set) or a disabled one.
pub(crate) fn prepare(
    project_dir: &Path,
    manifest: &SocManifest,
    inputs: &[PathBuf],
    output: Option<&Path>,
    xilinx_root: Option<&Path>,
    strict: bool,
) -> Result<Option<ClocksJob>> {
    let inputs = if inputs.is_empty() {
        manifest.bus_configs(project_dir)
    } else {
        inputs.to_vec()
    };
    let buses = load_buses(&inputs)?;

    let domains = match ClockPlan::derive(&buses).context("deriving clock domains")? {
        ClockPlan::Generated(domains) => domains,
        ClockPlan::NoMainBus if strict => {
            bail!("no main bus (CONFIG_NAME = MBUS) among {} configuration(s)", inputs.len())
        }
        ClockPlan::NoMainBus => {
            warn!(configs = inputs.len(), "no main bus configuration; clock assignments not generated");
            println!("No main bus configuration found, nothing to generate.");
            return Ok(None);
        }
        ClockPlan::MainBusDisabled => {
            warn!("main bus is disabled; clock assignments not generated");
            println!("Main bus is disabled, nothing to generate.");
            return Ok(None);
        }
    };

    let output = resolve_output(project_dir, manifest, output, xilinx_root)?;
    Ok(Some(ClocksJob { domains, output }))
}

/// Generate the clock-assignment include.
///
/// Without an active main bus there is nothing to generate; a missing main
/// bus is reported and treated as success unless `strict` is set.
pub fn run(
    project_dir: &Path,
    manifest: &SocManifest,
    inputs: &[PathBuf],
    output: Option<&Path>,
    xilinx_root: Option<&Path>,
    strict: bool,
) -> Result<()> {
    match prepare(project_dir, manifest, inputs, output, xilinx_root, strict)? {
        Some(job) => job.write(),
        None => Ok(()),
    }
}
