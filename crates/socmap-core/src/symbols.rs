//! Boot block selection and global linker symbols.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address_space::{AddressMap, DeviceRange};
use crate::descriptor::BusDescriptor;
use crate::error::{Result, SocMapError};

/// Memory block that holds the vector table and initial stack.
pub const BOOT_MEMORY_BLOCK: &str = "BRAM";

/// Bytes kept free between the stack top and the end of the boot block.
pub const STACK_TOP_RESERVE: u64 = 0x10;

/// Required alignment of the initial stack pointer.
pub const STACK_ALIGNMENT: u64 = 16;

/// Number of interrupt vector entries.
pub const VECTOR_TABLE_ENTRIES: u64 = 32;

/// Size of one vector entry in bytes.
pub const VECTOR_ENTRY_BYTES: u64 = 4;

/// Total vector table size in bytes.
pub const VECTOR_TABLE_BYTES: u64 = VECTOR_TABLE_ENTRIES * VECTOR_ENTRY_BYTES;

pub const STACK_START: &str = "_stack_start";
pub const VECTOR_TABLE_START: &str = "_vector_table_start";
pub const VECTOR_TABLE_END: &str = "_vector_table_end";

/// Policy choosing the boot memory block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BootSelector {
    /// The memory device with this exact name.
    Named(String),
    /// The first memory device in encounter order.
    FirstMemory,
}

impl Default for BootSelector {
    fn default() -> Self {
        BootSelector::Named(BOOT_MEMORY_BLOCK.to_string())
    }
}

impl BootSelector {
    /// Parse a selector: `first-memory`, or a memory block name.
    pub fn parse(s: &str) -> Self {
        match s {
            "first-memory" | "first" => BootSelector::FirstMemory,
            name => BootSelector::Named(name.to_string()),
        }
    }

    /// Pick the boot block from the classified memory list.
    pub fn select<'a>(&self, map: &'a AddressMap) -> Result<&'a DeviceRange> {
        let found = match self {
            BootSelector::Named(name) => map.memory_region(name),
            BootSelector::FirstMemory => map.memory.first(),
        };
        found.ok_or_else(|| SocMapError::BootMemoryNotFound {
            name: self.to_string(),
        })
    }
}

impl fmt::Display for BootSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootSelector::Named(name) => f.write_str(name),
            BootSelector::FirstMemory => f.write_str("first-memory"),
        }
    }
}

/// A named integer constant written into the linker script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSymbol {
    pub name: String,
    pub value: u64,
}

impl GlobalSymbol {
    fn new(name: &str, value: u64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Symbols derived from the boot memory block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SymbolTable {
    /// The selected boot memory block.
    pub boot: DeviceRange,
    /// `_stack_start`, `_vector_table_start`, `_vector_table_end`, in that order.
    pub symbols: Vec<GlobalSymbol>,
}

impl SymbolTable {
    /// Derive the global symbols from a boot block.
    pub fn derive(boot: &DeviceRange) -> Result<Self> {
        let required = VECTOR_TABLE_BYTES + STACK_TOP_RESERVE;
        if boot.size < required {
            return Err(SocMapError::BootMemoryTooSmall {
                name: boot.name.clone(),
                size: boot.size,
                required,
            });
        }

        let base = boot.base_address;
        // Equal to `end - 0x10` whenever the base is 16-byte aligned; only an
        // unaligned base moves the stack further down.
        let stack_start = (boot.end_address() - STACK_TOP_RESERVE) & !(STACK_ALIGNMENT - 1);
        let symbols = vec![
            GlobalSymbol::new(STACK_START, stack_start),
            GlobalSymbol::new(VECTOR_TABLE_START, base),
            GlobalSymbol::new(VECTOR_TABLE_END, base + VECTOR_TABLE_BYTES),
        ];
        debug!(boot = %boot.name, stack_start, "derived boot symbols");

        Ok(Self {
            boot: boot.clone(),
            symbols,
        })
    }

    /// Look up a symbol value by name.
    pub fn value(&self, name: &str) -> Option<u64> {
        self.symbols.iter().find(|s| s.name == name).map(|s| s.value)
    }
}

/// Everything the linker script is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MemoryLayout {
    pub address_map: AddressMap,
    pub symbols: SymbolTable,
}

impl MemoryLayout {
    /// Classify every active bus, select the boot block and derive symbols.
    pub fn synthesize(descriptors: &[BusDescriptor], selector: &BootSelector) -> Result<Self> {
        let address_map = AddressMap::build(descriptors)?;
        let boot = selector.select(&address_map)?;
        let symbols = SymbolTable::derive(boot)?;
        Ok(Self {
            address_map,
            symbols,
        })
    }

    /// The selected boot memory block.
    pub fn boot(&self) -> &DeviceRange {
        &self.symbols.boot
    }
}
