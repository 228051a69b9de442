//! Address-space synthesis.
//!
//! Flattens the parallel range lists of every active bus into a classified
//! [`AddressMap`]. Overlapping ranges are not detected.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::BusDescriptor;
use crate::error::{Result, SocMapError};

/// Devices whose exact name marks them as memory.
pub const MEMORY_DEVICE_NAMES: &[&str] = &["BRAM", "HBM"];

/// Name prefix of DDR4 memory channels.
pub const DDR_CHANNEL_PREFIX: &str = "DDR4CH";

/// Name suffix of bus-to-bus bridges.
pub const BUS_SUFFIX: &str = "BUS";

/// Linker permissions given to every memory device.
// TODO: derive per-device permissions once the config carries them (e.g. BRAM as rx).
pub const MEMORY_PERMISSIONS: &str = "xrw";

/// Category of a declared address range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    Memory,
    Peripheral,
    /// Bridge to another bus; excluded from generated artifacts.
    Bus,
}

impl DeviceCategory {
    /// Lowercase display name.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCategory::Memory => "memory",
            DeviceCategory::Peripheral => "peripheral",
            DeviceCategory::Bus => "bus",
        }
    }
}

/// Classify a device by name.
///
/// Memory names take precedence over the bus suffix; anything else is a
/// peripheral.
pub fn classify(name: &str) -> DeviceCategory {
    if MEMORY_DEVICE_NAMES.contains(&name) || name.starts_with(DDR_CHANNEL_PREFIX) {
        DeviceCategory::Memory
    } else if name.ends_with(BUS_SUFFIX) {
        DeviceCategory::Bus
    } else {
        DeviceCategory::Peripheral
    }
}

/// One classified address range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeviceRange {
    /// Device name (e.g. "BRAM", "UART0").
    pub name: String,
    /// Derived category.
    pub category: DeviceCategory,
    /// Resolved base address.
    pub base_address: u64,
    /// Size in bytes (`1 << width`).
    pub size: u64,
    /// Label of the owning bus.
    pub bus: String,
    /// Position within the owning bus's range lists.
    pub slot: usize,
}

impl DeviceRange {
    /// Linker permissions; only memory devices carry them.
    pub fn permissions(&self) -> Option<&'static str> {
        match self.category {
            DeviceCategory::Memory => Some(MEMORY_PERMISSIONS),
            _ => None,
        }
    }

    /// One past the last address of the range.
    pub fn end_address(&self) -> u64 {
        self.base_address + self.size
    }
}

/// The classified device list, partitioned by category in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressMap {
    pub memory: Vec<DeviceRange>,
    pub peripheral: Vec<DeviceRange>,
    pub bus: Vec<DeviceRange>,
}

impl AddressMap {
    /// Build the map from every active bus descriptor.
    ///
    /// Disabled buses are skipped entirely. A length mismatch in any active
    /// bus aborts the build.
    pub fn build(descriptors: &[BusDescriptor]) -> Result<Self> {
        let mut map = AddressMap::default();

        for (index, desc) in descriptors.iter().enumerate() {
            let label = desc.label(index);
            if desc.is_disabled() {
                debug!(bus = %label, "skipping disabled bus");
                continue;
            }
            desc.check_lengths(&label)?;

            let ranges = desc
                .range_names
                .iter()
                .zip(&desc.range_base_addresses)
                .zip(&desc.range_addr_widths);
            for (slot, ((name, base), width)) in ranges.enumerate() {
                let range = resolve_range(name, base, *width, &label, slot)?;
                debug!(
                    bus = %label,
                    device = %range.name,
                    category = range.category.name(),
                    base = range.base_address,
                    size = range.size,
                    "classified range"
                );
                map.push(range);
            }
        }

        Ok(map)
    }

    fn push(&mut self, range: DeviceRange) {
        match range.category {
            DeviceCategory::Memory => self.memory.push(range),
            DeviceCategory::Peripheral => self.peripheral.push(range),
            DeviceCategory::Bus => self.bus.push(range),
        }
    }

    /// Look up a memory device by name (first match).
    pub fn memory_region(&self, name: &str) -> Option<&DeviceRange> {
        self.memory.iter().find(|d| d.name == name)
    }

    /// Look up any device by name (first match, memory first).
    pub fn device(&self, name: &str) -> Option<&DeviceRange> {
        self.devices().find(|d| d.name == name)
    }

    /// Iterate all devices: memory, then peripherals, then buses.
    pub fn devices(&self) -> impl Iterator<Item = &DeviceRange> {
        self.memory
            .iter()
            .chain(self.peripheral.iter())
            .chain(self.bus.iter())
    }

    /// Total number of classified devices.
    pub fn len(&self) -> usize {
        self.memory.len() + self.peripheral.len() + self.bus.len()
    }

    /// Whether no device was classified.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sum of all memory device sizes in bytes.
    pub fn total_memory(&self) -> u64 {
        self.memory.iter().map(|d| d.size).sum()
    }
}

/// Parse a base-16 address, accepting an optional `0x` prefix.
pub fn parse_hex_address(value: &str) -> Option<u64> {
    let digits = value.trim();
    let digits = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
        .unwrap_or(digits);
    if digits.is_empty() || digits.starts_with('+') {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}

fn resolve_range(name: &str, base: &str, width: u32, bus: &str, slot: usize) -> Result<DeviceRange> {
    let base_address = parse_hex_address(base).ok_or_else(|| SocMapError::InvalidBaseAddress {
        device: name.to_string(),
        value: base.to_string(),
    })?;
    let size = 1u64
        .checked_shl(width)
        .ok_or_else(|| SocMapError::InvalidAddressWidth {
            device: name.to_string(),
            width,
        })?;
    if base_address.checked_add(size).is_none() {
        return Err(SocMapError::AddressOverflow {
            device: name.to_string(),
            base: base_address,
            size,
        });
    }

    Ok(DeviceRange {
        name: name.to_string(),
        category: classify(name),
        base_address,
        size,
        bus: bus.to_string(),
        slot,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus(name: &str, protocol: &str, names: &str, bases: &str, widths: &str) -> BusDescriptor {
        let range_names: Vec<String> = names.split_whitespace().map(String::from).collect();
        BusDescriptor {
            config_name: Some(name.to_string()),
            protocol: protocol.to_string(),
            num_master_interfaces: range_names.len(),
            range_names,
            range_base_addresses: bases.split_whitespace().map(String::from).collect(),
            range_addr_widths: widths
                .split_whitespace()
                .map(|w| w.parse().unwrap())
                .collect(),
            clock_domains: None,
            main_clock_domain: None,
        }
    }

    #[test]
    fn classify_memory_names() {
        assert_eq!(classify("BRAM"), DeviceCategory::Memory);
        assert_eq!(classify("HBM"), DeviceCategory::Memory);
        assert_eq!(classify("DDR4CH0"), DeviceCategory::Memory);
        assert_eq!(classify("DDR4CH12"), DeviceCategory::Memory);
    }

    #[test]
    fn classify_bus_suffix() {
        assert_eq!(classify("MBUS"), DeviceCategory::Bus);
        assert_eq!(classify("HBUS"), DeviceCategory::Bus);
        assert_eq!(classify("BUS"), DeviceCategory::Bus);
    }

    #[test]
    fn classify_everything_else_is_peripheral() {
        assert_eq!(classify("UART0"), DeviceCategory::Peripheral);
        assert_eq!(classify("PLIC"), DeviceCategory::Peripheral);
        assert_eq!(classify("BRAM1"), DeviceCategory::Peripheral);
        assert_eq!(classify("DDR"), DeviceCategory::Peripheral);
        assert_eq!(classify("BUSY"), DeviceCategory::Peripheral);
        assert_eq!(classify(""), DeviceCategory::Peripheral);
    }

    #[test]
    fn build_reference_scenario() {
        let buses = [bus("MBUS", "AXI4", "BRAM UART0 MBUS", "0 10000000 20000000", "16 12 16")];
        let map = AddressMap::build(&buses).unwrap();

        assert_eq!(map.memory.len(), 1);
        let bram = &map.memory[0];
        assert_eq!(bram.name, "BRAM");
        assert_eq!(bram.base_address, 0x0);
        assert_eq!(bram.size, 0x10000);
        assert_eq!(bram.permissions(), Some("xrw"));

        assert_eq!(map.peripheral.len(), 1);
        let uart = &map.peripheral[0];
        assert_eq!(uart.name, "UART0");
        assert_eq!(uart.base_address, 0x1000_0000);
        assert_eq!(uart.size, 0x1000);
        assert_eq!(uart.permissions(), None);

        assert_eq!(map.bus.len(), 1);
        assert_eq!(map.bus[0].name, "MBUS");
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn disabled_bus_contributes_nothing() {
        let mut hbus = bus("HBUS", "DISABLE", "HBM DDR4CH0", "0", "30 30 30");
        hbus.num_master_interfaces = 7;
        let map = AddressMap::build(&[hbus]).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn slots_are_local_to_each_bus() {
        let buses = [
            bus("MBUS", "AXI4", "BRAM UART0 HBUS", "0 10000000 80000000", "16 12 31"),
            bus("HBUS", "AXI4", "DDR4CH0 HBM", "80000000 100000000", "30 30"),
        ];
        let map = AddressMap::build(&buses).unwrap();
        let ddr = map.memory_region("DDR4CH0").unwrap();
        assert_eq!(ddr.bus, "HBUS");
        assert_eq!(ddr.slot, 0);
        let hbm = map.memory_region("HBM").unwrap();
        assert_eq!(hbm.slot, 1);
        assert_eq!(map.device("UART0").unwrap().slot, 1);
    }

    #[test]
    fn encounter_order_is_preserved() {
        let buses = [
            bus("MBUS", "AXI4", "UART0 BRAM GPIO HBUS", "10000 0 20000 80000000", "12 16 12 31"),
            bus("HBUS", "AXI4", "DDR4CH1 DDR4CH0", "c0000000 80000000", "30 30"),
        ];
        let map = AddressMap::build(&buses).unwrap();
        let memory: Vec<&str> = map.memory.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(memory, vec!["BRAM", "DDR4CH1", "DDR4CH0"]);
        let peripherals: Vec<&str> = map.peripheral.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(peripherals, vec!["UART0", "GPIO"]);
        assert_eq!(map.total_memory(), 0x10000 + 2 * 0x4000_0000);
    }

    #[test]
    fn length_mismatch_aborts() {
        let mut mbus = bus("MBUS", "AXI4", "BRAM UART0", "0 10000000", "16 12");
        mbus.range_addr_widths.pop();
        let err = AddressMap::build(&[mbus]).unwrap_err();
        assert!(matches!(err, SocMapError::LengthMismatch { widths: 1, names: 2, .. }));
    }

    #[test]
    fn invalid_base_address() {
        let mbus = bus("MBUS", "AXI4", "BRAM", "zz", "16");
        let err = AddressMap::build(&[mbus]).unwrap_err();
        assert!(matches!(err, SocMapError::InvalidBaseAddress { .. }));
    }

    #[test]
    fn width_too_large() {
        let mbus = bus("MBUS", "AXI4", "HBM", "0", "64");
        let err = AddressMap::build(&[mbus]).unwrap_err();
        assert!(matches!(err, SocMapError::InvalidAddressWidth { width: 64, .. }));
    }

    #[test]
    fn range_overflow() {
        let mbus = bus("MBUS", "AXI4", "HBM", "ffffffffffffff00", "12");
        let err = AddressMap::build(&[mbus]).unwrap_err();
        assert!(matches!(err, SocMapError::AddressOverflow { .. }));
    }

    #[test]
    fn parse_hex_forms() {
        assert_eq!(parse_hex_address("0"), Some(0));
        assert_eq!(parse_hex_address("10000000"), Some(0x1000_0000));
        assert_eq!(parse_hex_address("0x80000000"), Some(0x8000_0000));
        assert_eq!(parse_hex_address("0XaBc"), Some(0xabc));
        assert_eq!(parse_hex_address(""), None);
        assert_eq!(parse_hex_address("0x"), None);
        assert_eq!(parse_hex_address("+10"), None);
        assert_eq!(parse_hex_address("g00"), None);
    }

    #[test]
    fn serializes_to_json() {
        let buses = [bus("MBUS", "AXI4", "BRAM UART0", "0 10000000", "16 12")];
        let map = AddressMap::build(&buses).unwrap();
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["memory"][0]["name"], "BRAM");
        assert_eq!(json["peripheral"][0]["category"], "peripheral");
        assert_eq!(json["memory"][0]["base-address"], 0);
    }
}
