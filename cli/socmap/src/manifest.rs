//! `socmap.toml` manifest parsing and project configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use socmap_core::BootSelector;

/// Manifest file name searched for from the working directory upward.
pub const MANIFEST_FILE: &str = "socmap.toml";

/// Bus configurations used when neither the manifest nor the command line name any.
pub const DEFAULT_BUS_CONFIGS: &[&str] = &[
    "config/configs/embedded/config_main_bus.csv",
    "config/configs/embedded/config_highperformance_bus.csv",
];

/// Default linker script location.
pub const DEFAULT_LINKER_OUTPUT: &str = "sw/SoC/common/UninaSoC.ld";

/// Default RTL include location, relative to the Xilinx root.
pub const DEFAULT_RTL_OUTPUT: &str = "rtl/uninasoc_clk_assignments.svinc";

/// The top-level manifest structure for a socmap project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocManifest {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectConfig,
    /// Bus configuration inputs.
    #[serde(default)]
    pub inputs: InputsConfig,
    /// Linker script generation.
    #[serde(default)]
    pub linker: LinkerConfig,
    /// Clock-assignment RTL generation.
    #[serde(default)]
    pub rtl: RtlConfig,
}

/// Project metadata section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectConfig {
    /// Project name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Project version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Short description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            description: None,
        }
    }
}

fn default_name() -> String {
    "soc".to_string()
}

fn default_version() -> String {
    "0.1.0".to_string()
}

/// Inputs section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InputsConfig {
    /// Bus configuration CSV files, in processing order.
    #[serde(default = "default_buses")]
    pub buses: Vec<String>,
}

impl Default for InputsConfig {
    fn default() -> Self {
        Self {
            buses: default_buses(),
        }
    }
}

fn default_buses() -> Vec<String> {
    DEFAULT_BUS_CONFIGS.iter().map(|s| s.to_string()).collect()
}

/// Linker section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkerConfig {
    /// Output path of the linker script.
    #[serde(default = "default_linker_output")]
    pub output: String,
    /// Boot memory block name, or `first-memory`.
    #[serde(default)]
    pub boot_memory: Option<String>,
    /// Emit `_peripheral_<NAME>_start/_end` symbols.
    #[serde(default)]
    pub peripheral_symbols: bool,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            output: default_linker_output(),
            boot_memory: None,
            peripheral_symbols: false,
        }
    }
}

fn default_linker_output() -> String {
    DEFAULT_LINKER_OUTPUT.to_string()
}

/// RTL section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RtlConfig {
    /// Output path of the clock include, relative to the Xilinx root.
    #[serde(default = "default_rtl_output")]
    pub output: String,
    /// Xilinx hardware root; `XILINX_ROOT` / `--xilinx-root` take precedence.
    #[serde(default)]
    pub xilinx_root: Option<String>,
}

impl Default for RtlConfig {
    fn default() -> Self {
        Self {
            output: default_rtl_output(),
            xilinx_root: None,
        }
    }
}

fn default_rtl_output() -> String {
    DEFAULT_RTL_OUTPUT.to_string()
}

impl SocManifest {
    /// Search upward from `start_dir` for a `socmap.toml` file, parse and return it
    /// along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let manifest: SocManifest = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((manifest, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a manifest from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing socmap.toml")
    }

    /// Bus configuration paths resolved against the project directory.
    pub fn bus_configs(&self, project_dir: &Path) -> Vec<PathBuf> {
        self.inputs
            .buses
            .iter()
            .map(|p| project_dir.join(p))
            .collect()
    }

    /// Linker script path resolved against the project directory.
    pub fn linker_output(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.linker.output)
    }

    /// Boot selector, from an override or the manifest (default: `BRAM`).
    pub fn boot_selector(&self, override_name: Option<&str>) -> BootSelector {
        override_name
            .or(self.linker.boot_memory.as_deref())
            .map(BootSelector::parse)
            .unwrap_or_default()
    }

    /// Xilinx root from the manifest, resolved against the project directory.
    pub fn xilinx_root(&self, project_dir: &Path) -> Option<PathBuf> {
        self.rtl.xilinx_root.as_ref().map(|r| project_dir.join(r))
    }

    /// Generate the default template for `socmap init`.
    pub fn template(name: &str) -> String {
        format!(
            r#"[project]
name = "{name}"
version = "0.1.0"

[inputs]
buses = ["config/config_main_bus.csv", "config/config_highperformance_bus.csv"]

[linker]
output = "out/sw/{name}.ld"
boot-memory = "BRAM"
peripheral-symbols = true

[rtl]
xilinx-root = "out/hw"
output = "{DEFAULT_RTL_OUTPUT}"
"#
        )
    }
}
