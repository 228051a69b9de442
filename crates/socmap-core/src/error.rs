//! Error types for bus configuration loading and address-space synthesis.

use std::path::PathBuf;

/// Errors that can occur while loading bus descriptors or synthesizing the map.
#[derive(Debug, thiserror::Error)]
pub enum SocMapError {
    /// I/O error reading a configuration source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration source not found.
    #[error("configuration file not found: {}", path.display())]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// A CSV record could not be split into fields.
    #[error("{origin}:{line}: malformed CSV record: {detail}")]
    Csv {
        /// Source the record came from.
        origin: String,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        detail: String,
    },

    /// A property required by an active bus is absent.
    #[error("{origin}: missing required property '{property}'")]
    MissingProperty {
        /// Source that lacks the property.
        origin: String,
        /// Property name (e.g. `RANGE_NAMES`).
        property: &'static str,
    },

    /// A property value could not be interpreted.
    #[error("{origin}: invalid value '{value}' for property '{property}': {detail}")]
    InvalidValue {
        /// Source holding the value.
        origin: String,
        /// Property name.
        property: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        detail: String,
    },

    /// The parallel range lists of an active bus disagree in length.
    #[error(
        "bus '{bus}': range lists are inconsistent \
         (NUM_MI = {num_mi}, RANGE_NAMES = {names}, RANGE_BASE_ADDR = {bases}, RANGE_ADDR_WIDTH = {widths})"
    )]
    LengthMismatch {
        /// Bus label.
        bus: String,
        /// Declared master interface count.
        num_mi: usize,
        /// Number of range names.
        names: usize,
        /// Number of base addresses.
        bases: usize,
        /// Number of address widths.
        widths: usize,
    },

    /// A base address is not a base-16 integer.
    #[error("device '{device}': invalid base address '{value}'")]
    InvalidBaseAddress {
        /// Device name.
        device: String,
        /// The unparsable address string.
        value: String,
    },

    /// An address width does not describe a representable byte range.
    #[error("device '{device}': address width {width} exceeds 63 bits")]
    InvalidAddressWidth {
        /// Device name.
        device: String,
        /// The declared width.
        width: u32,
    },

    /// `base + size` does not fit the 64-bit address space.
    #[error("device '{device}': range 0x{base:x} + 0x{size:x} overflows the address space")]
    AddressOverflow {
        /// Device name.
        device: String,
        /// Base address.
        base: u64,
        /// Range size in bytes.
        size: u64,
    },

    /// The configured boot memory block is not among the memory devices.
    #[error("boot memory block '{name}' is not a configured memory device")]
    BootMemoryNotFound {
        /// Requested block name (or `first-memory`).
        name: String,
    },

    /// The boot memory block cannot hold the vector table and stack reserve.
    #[error("boot memory block '{name}' is too small ({size} bytes, need at least {required})")]
    BootMemoryTooSmall {
        /// Block name.
        name: String,
        /// Block size in bytes.
        size: u64,
        /// Minimum size in bytes.
        required: u64,
    },
}

/// Result type for socmap-core operations.
pub type Result<T> = std::result::Result<T, SocMapError>;
