//! `socmap linker`: linker script generation.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use socmap_core::MemoryLayout;
use socmap_render::{write_artifact, LinkerScript, PeripheralSymbols};

use crate::commands::load_buses;
use crate::manifest::SocManifest;

/// Split positional arguments into configuration inputs and the output path.
///
/// With no positionals the manifest (or built-in defaults) supplies both.
pub(crate) fn split_positionals(
    project_dir: &Path,
    manifest: &SocManifest,
    paths: &[PathBuf],
) -> Result<(Vec<PathBuf>, PathBuf)> {
    match paths {
        [] => Ok((
            manifest.bus_configs(project_dir),
            manifest.linker_output(project_dir),
        )),
        [_] => bail!("expected one or more configuration files followed by an output path"),
        [inputs @ .., output] => Ok((inputs.to_vec(), output.clone())),
    }
}

/// A synthesized linker script ready to be written.
pub(crate) struct LinkerJob {
    layout: MemoryLayout,
    peripherals: PeripheralSymbols,
    output: PathBuf,
}

impl LinkerJob {
    pub(crate) fn write(&self) -> Result<()> {
        let script = LinkerScript::new(&self.layout).with_peripherals(self.peripherals);
        write_artifact(&script, &self.output)?;
        println!(
            "Generated linker script ({} memory region(s), boot: {}) → {}",
            self.layout.address_map.memory.len(),
            self.layout.boot().name,
            self.output.display()
        );
        Ok(())
    }
}

/// Load the configurations and synthesize the memory layout.
pub(crate) fn prepare(
    project_dir: &Path,
    manifest: &SocManifest,
    paths: &[PathBuf],
    boot_memory: Option<&str>,
    peripheral_symbols: bool,
) -> Result<LinkerJob> {
    let (inputs, output) = split_positionals(project_dir, manifest, paths)?;
    let buses = load_buses(&inputs)?;

    let selector = manifest.boot_selector(boot_memory);
    let layout = MemoryLayout::synthesize(&buses, &selector)
        .with_context(|| format!("synthesizing address map from {} configuration(s)", inputs.len()))?;

    Ok(LinkerJob {
        layout,
        peripherals: PeripheralSymbols::from_flag(peripheral_symbols || manifest.linker.peripheral_symbols),
        output,
    })
}

/// Generate the linker script.
pub fn run(
    project_dir: &Path,
    manifest: &SocManifest,
    paths: &[PathBuf],
    boot_memory: Option<&str>,
    peripheral_symbols: bool,
) -> Result<()> {
    prepare(project_dir, manifest, paths, boot_memory, peripheral_symbols)?.write()
}
