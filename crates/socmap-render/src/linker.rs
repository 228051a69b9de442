//! Linker script rendering.
//!
//! Produces a `MEMORY` block with one region per memory device, the boot
//! symbols, optional peripheral base symbols, and a fixed `SECTIONS` layout
//! that anchors `.vector_table` and `.text` in the boot memory block.

use std::fmt;

use socmap_core::{DeviceRange, MemoryLayout};

use crate::artifact::{Artifact, ArtifactKind, GENERATOR};
use crate::format::{hex, hex_u64};

/// Whether peripherals get `_peripheral_<NAME>_start/_end` symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PeripheralSymbols {
    #[default]
    Omit,
    Emit,
}

impl PeripheralSymbols {
    pub fn from_flag(enabled: bool) -> Self {
        if enabled {
            PeripheralSymbols::Emit
        } else {
            PeripheralSymbols::Omit
        }
    }
}

/// The linker script artifact.
#[derive(Debug, Clone, Copy)]
pub struct LinkerScript<'a> {
    layout: &'a MemoryLayout,
    peripherals: PeripheralSymbols,
}

impl<'a> LinkerScript<'a> {
    pub fn new(layout: &'a MemoryLayout) -> Self {
        Self {
            layout,
            peripherals: PeripheralSymbols::Omit,
        }
    }

    /// Select the peripheral symbol profile.
    pub fn with_peripherals(mut self, peripherals: PeripheralSymbols) -> Self {
        self.peripherals = peripherals;
        self
    }

    fn write_memory(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for region in &self.layout.address_map.memory {
            writeln!(
                f,
                "\t{} ({}): ORIGIN = {}, LENGTH = {}",
                region.name,
                region.permissions().unwrap_or_default(),
                hex_u64(region.base_address),
                hex(region.size),
            )?;
        }
        Ok(())
    }

    fn write_symbols(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.layout.symbols.symbols {
            writeln!(f, "{} = {};", symbol.name, hex_u64(symbol.value))?;
        }
        Ok(())
    }

    fn write_peripherals(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "/* Peripherals */")?;
        for device in &self.layout.address_map.peripheral {
            write_peripheral(f, device)?;
        }
        Ok(())
    }
}

fn write_peripheral(f: &mut fmt::Formatter<'_>, device: &DeviceRange) -> fmt::Result {
    writeln!(
        f,
        "_peripheral_{}_start = {};",
        device.name,
        hex_u64(device.base_address)
    )?;
    writeln!(
        f,
        "_peripheral_{}_end = {};",
        device.name,
        hex_u64(device.end_address())
    )
}

impl fmt::Display for LinkerScript<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let boot = &self.layout.boot().name;

        writeln!(f, "/* Auto-generated with {GENERATOR} */")?;
        writeln!(f)?;
        writeln!(f, "MEMORY")?;
        writeln!(f, "{{")?;
        self.write_memory(f)?;
        writeln!(f, "}}")?;
        writeln!(f)?;
        writeln!(f, "/* Global symbols */")?;
        self.write_symbols(f)?;
        if self.peripherals == PeripheralSymbols::Emit {
            self.write_peripherals(f)?;
        }
        writeln!(f)?;
        writeln!(f, "SECTIONS")?;
        writeln!(f, "{{")?;
        writeln!(f, "    .vector_table _vector_table_start :")?;
        writeln!(f, "    {{")?;
        writeln!(f, "        KEEP(*(.vector_table))")?;
        writeln!(f, "    }}> {boot}")?;
        writeln!(f)?;
        writeln!(f, "    .text :")?;
        writeln!(f, "    {{")?;
        writeln!(f, "        . = ALIGN(32);")?;
        writeln!(f, "        _text_start = .;")?;
        writeln!(f, "        *(.text.handlers)")?;
        writeln!(f, "        *(.text.start)")?;
        writeln!(f, "        *(.text)")?;
        writeln!(f, "        *(.text*)")?;
        writeln!(f, "        . = ALIGN(32);")?;
        writeln!(f, "        _text_end = .;")?;
        writeln!(f, "    }}> {boot}")?;
        writeln!(f, "}}")
    }
}

impl Artifact for LinkerScript<'_> {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::LinkerScript
    }

    fn render(&self) -> String {
        self.to_string()
    }
}
