//! Bus descriptors.
//!
//! One [`BusDescriptor`] is built per configuration source. Its three range
//! lists are parallel: entry `i` of each list describes the same device.

use std::path::Path;

use tracing::debug;

use crate::error::{Result, SocMapError};
use crate::source::{property, CsvSource, PropertySource};

/// Protocol value that marks a whole bus as inactive.
pub const DISABLED_PROTOCOL: &str = "DISABLE";

/// `CONFIG_NAME` of the main bus, the only bus carrying clock domains.
pub const MAIN_BUS_NAME: &str = "MBUS";

/// Structured configuration for one address-mapped interconnect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusDescriptor {
    /// Configuration name (e.g. "MBUS", "HBUS").
    pub config_name: Option<String>,
    /// Bus protocol; `DISABLE` excludes the bus from synthesis.
    pub protocol: String,
    /// Declared number of master interfaces.
    pub num_master_interfaces: usize,
    /// Device identifiers, in declaration order.
    pub range_names: Vec<String>,
    /// Base addresses as hexadecimal strings.
    pub range_base_addresses: Vec<String>,
    /// Address widths in bits; a device spans `1 << width` bytes.
    pub range_addr_widths: Vec<u32>,
    /// Clock domain label per device (main bus only).
    pub clock_domains: Option<Vec<String>>,
    /// Clock domain driving the bus itself.
    pub main_clock_domain: Option<String>,
}

impl BusDescriptor {
    /// Build a descriptor from a keyed source.
    ///
    /// A disabled bus is returned without reading any other property, so
    /// a disabled source never fails to load.
    pub fn from_source<S: PropertySource + ?Sized>(src: &S) -> Result<Self> {
        let protocol = required(src, property::PROTOCOL)?.to_string();
        let config_name = optional(src, property::CONFIG_NAME).map(str::to_string);

        if protocol == DISABLED_PROTOCOL {
            debug!(origin = src.origin(), "bus disabled; range lists not read");
            return Ok(Self {
                config_name,
                protocol,
                num_master_interfaces: 0,
                range_names: Vec::new(),
                range_base_addresses: Vec::new(),
                range_addr_widths: Vec::new(),
                clock_domains: None,
                main_clock_domain: None,
            });
        }

        let num_mi = required(src, property::NUM_MI)?;
        let num_master_interfaces =
            num_mi
                .parse::<usize>()
                .map_err(|e| SocMapError::InvalidValue {
                    origin: src.origin().to_string(),
                    property: property::NUM_MI,
                    value: num_mi.to_string(),
                    detail: e.to_string(),
                })?;

        let range_addr_widths = split_list(required(src, property::RANGE_ADDR_WIDTH)?)
            .into_iter()
            .map(|w| {
                w.parse::<u32>().map_err(|e| SocMapError::InvalidValue {
                    origin: src.origin().to_string(),
                    property: property::RANGE_ADDR_WIDTH,
                    value: w.clone(),
                    detail: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            config_name,
            protocol,
            num_master_interfaces,
            range_names: split_list(required(src, property::RANGE_NAMES)?),
            range_base_addresses: split_list(required(src, property::RANGE_BASE_ADDR)?),
            range_addr_widths,
            clock_domains: optional(src, property::RANGE_CLOCK_DOMAINS).map(split_list),
            main_clock_domain: optional(src, property::MAIN_CLOCK_DOMAIN).map(str::to_string),
        })
    }

    /// Load a descriptor from a CSV configuration file.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let src = CsvSource::load(path)?;
        Self::from_source(&src)
    }

    /// Whether this bus is excluded from all downstream processing.
    pub fn is_disabled(&self) -> bool {
        self.protocol == DISABLED_PROTOCOL
    }

    /// Whether this is the main bus.
    pub fn is_main_bus(&self) -> bool {
        self.config_name.as_deref() == Some(MAIN_BUS_NAME)
    }

    /// Label used in diagnostics: the configuration name, or `bus<index>`.
    pub fn label(&self, index: usize) -> String {
        match &self.config_name {
            Some(name) => name.clone(),
            None => format!("bus{index}"),
        }
    }

    /// Check that `NUM_MI` and the three range lists agree in length.
    pub fn check_lengths(&self, label: &str) -> Result<()> {
        let names = self.range_names.len();
        let bases = self.range_base_addresses.len();
        let widths = self.range_addr_widths.len();
        let num_mi = self.num_master_interfaces;
        if names != bases || names != widths || names != num_mi {
            return Err(SocMapError::LengthMismatch {
                bus: label.to_string(),
                num_mi,
                names,
                bases,
                widths,
            });
        }
        Ok(())
    }
}

/// Load one descriptor per CSV path, in argument order.
pub fn load_descriptors<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<BusDescriptor>> {
    paths
        .iter()
        .map(|p| BusDescriptor::load_csv(p.as_ref()))
        .collect()
}

/// Find the main-bus descriptor, if any.
pub fn find_main_bus(descriptors: &[BusDescriptor]) -> Option<&BusDescriptor> {
    descriptors.iter().find(|d| d.is_main_bus())
}

fn required<'a, S: PropertySource + ?Sized>(src: &'a S, name: &'static str) -> Result<&'a str> {
    src.property(name)
        .ok_or_else(|| SocMapError::MissingProperty {
            origin: src.origin().to_string(),
            property: name,
        })
}

fn optional<'a, S: PropertySource + ?Sized>(src: &'a S, name: &'static str) -> Option<&'a str> {
    src.property(name).filter(|v| !v.trim().is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
