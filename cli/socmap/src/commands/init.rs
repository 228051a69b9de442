//! `socmap init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{SocManifest, MANIFEST_FILE};

const MAIN_BUS_TEMPLATE: &str = "\
PROPERTY,VALUE
CONFIG_NAME,MBUS
PROTOCOL,AXI4
NUM_MI,5
RANGE_NAMES,BRAM DM_mem PLIC UART HBUS
RANGE_BASE_ADDR,0 10000 4000000 10000000 80000000
RANGE_ADDR_WIDTH,16 12 22 12 31
RANGE_CLOCK_DOMAINS,100 100 100 100 300
MAIN_CLOCK_DOMAIN,100
";

const HIGH_PERFORMANCE_BUS_TEMPLATE: &str = "\
PROPERTY,VALUE
CONFIG_NAME,HBUS
PROTOCOL,AXI4
NUM_MI,1
RANGE_NAMES,DDR4CH0
RANGE_BASE_ADDR,80000000
RANGE_ADDR_WIDTH,30
MAIN_CLOCK_DOMAIN,300
";

/// Create a new project at the given path.
///
/// `name` is the project name. The directory `name` is created relative to cwd.
pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    // Create directory structure
    let config_dir = project_dir.join("config");
    fs::create_dir_all(&config_dir).context("creating config/ directory")?;
    fs::create_dir_all(project_dir.join("out")).context("creating out/ directory")?;

    // Generate socmap.toml
    fs::write(project_dir.join(MANIFEST_FILE), SocManifest::template(name))
        .with_context(|| format!("writing {MANIFEST_FILE}"))?;

    // Sample bus configurations
    fs::write(config_dir.join("config_main_bus.csv"), MAIN_BUS_TEMPLATE)
        .context("writing config/config_main_bus.csv")?;
    fs::write(
        config_dir.join("config_highperformance_bus.csv"),
        HIGH_PERFORMANCE_BUS_TEMPLATE,
    )
    .context("writing config/config_highperformance_bus.csv")?;

    // Generate .gitignore
    fs::write(project_dir.join(".gitignore"), "out/\n").context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/config/config_main_bus.csv");
    println!("  {name}/config/config_highperformance_bus.csv");
    println!("  {name}/out/");
    println!("  {name}/.gitignore");

    Ok(())
}
