//! `socmap inspect`: show the synthesized address map.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::json;
use socmap_core::{ClockPlan, DeviceRange, MemoryLayout};

use crate::commands::load_buses;
use crate::manifest::SocManifest;

/// Output format of `socmap inspect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectFormat {
    Text,
    Json,
}

impl InspectFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(InspectFormat::Text),
            "json" => Ok(InspectFormat::Json),
            other => bail!("unknown format '{other}' (expected text or json)"),
        }
    }
}

/// Print the classified devices, boot block, symbols and clock bindings.
pub fn run(
    project_dir: &Path,
    manifest: &SocManifest,
    inputs: &[PathBuf],
    boot_memory: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    let format = format.map(InspectFormat::parse).transpose()?.unwrap_or(InspectFormat::Text);
    let inputs = if inputs.is_empty() {
        manifest.bus_configs(project_dir)
    } else {
        inputs.to_vec()
    };
    let buses = load_buses(&inputs)?;

    let layout = MemoryLayout::synthesize(&buses, &manifest.boot_selector(boot_memory))
        .context("synthesizing address map")?;
    let plan = ClockPlan::derive(&buses).context("deriving clock domains")?;

    println!("{}", render(&layout, &plan, format)?);
    Ok(())
}

pub(crate) fn render(layout: &MemoryLayout, plan: &ClockPlan, format: InspectFormat) -> Result<String> {
    match format {
        InspectFormat::Json => {
            let value = json!({
                "address-map": layout.address_map,
                "symbols": layout.symbols,
                "clocks": plan.domains(),
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        InspectFormat::Text => Ok(render_text(layout, plan)),
    }
}

fn device_line(device: &DeviceRange) -> String {
    format!(
        "    {:<12} 0x{:016X} - 0x{:016X} ({} bytes) [{}#{}]",
        device.name,
        device.base_address,
        device.end_address(),
        device.size,
        device.bus,
        device.slot,
    )
}

fn render_text(layout: &MemoryLayout, plan: &ClockPlan) -> String {
    let map = &layout.address_map;
    let mut lines = Vec::new();

    lines.push(format!("--- Memory ({}) ---", map.memory.len()));
    lines.extend(map.memory.iter().map(device_line));
    lines.push(format!("--- Peripherals ({}) ---", map.peripheral.len()));
    lines.extend(map.peripheral.iter().map(device_line));
    lines.push(format!("--- Buses ({}) ---", map.bus.len()));
    lines.extend(map.bus.iter().map(device_line));
    lines.push(String::new());

    lines.push(format!("--- Boot: {} ---", layout.boot().name));
    for symbol in &layout.symbols.symbols {
        lines.push(format!("    {:<20} 0x{:016X}", symbol.name, symbol.value));
    }
    lines.push(String::new());

    match plan {
        ClockPlan::Generated(domains) => {
            lines.push(format!("--- Clocks (main: {} MHz) ---", domains.main_clock_domain));
            for binding in &domains.bindings {
                lines.push(format!("    {:<12} {} MHz", binding.device, binding.clock));
            }
        }
        ClockPlan::MainBusDisabled => lines.push("--- Clocks: main bus disabled ---".to_string()),
        ClockPlan::NoMainBus => lines.push("--- Clocks: no main bus ---".to_string()),
    }

    lines.join("\n")
}
