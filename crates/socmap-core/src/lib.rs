//! Address-space synthesis for SoC bus configurations.
//!
//! Turns declarative per-bus configuration into the data the generated
//! artifacts are rendered from:
//! - **Descriptors:** one [`BusDescriptor`] per configuration source
//! - **Address map:** devices classified as memory, peripheral or bus
//! - **Symbols:** boot block selection, stack pointer and vector table bounds
//! - **Clocks:** per-device clock-domain bindings of the main bus

pub mod address_space;
pub mod clocks;
pub mod descriptor;
pub mod error;
pub mod source;
pub mod symbols;

pub use address_space::{classify, AddressMap, DeviceCategory, DeviceRange};
pub use clocks::{ClockDomainBinding, ClockDomains, ClockPlan};
pub use descriptor::{find_main_bus, load_descriptors, BusDescriptor};
pub use error::{Result, SocMapError};
pub use source::{CsvSource, PropertySource};
pub use symbols::{BootSelector, GlobalSymbol, MemoryLayout, SymbolTable};
