//! Keyed configuration sources.
//!
//! A bus configuration is a flat table of `PROPERTY,VALUE` records. This
//! module provides the [`PropertySource`] capability used to build
//! [`BusDescriptor`](crate::descriptor::BusDescriptor)s, and a CSV-backed
//! implementation of it.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, SocMapError};

/// Property names understood by the descriptor loader.
pub mod property {
    pub const CONFIG_NAME: &str = "CONFIG_NAME";
    pub const PROTOCOL: &str = "PROTOCOL";
    pub const NUM_MI: &str = "NUM_MI";
    pub const RANGE_NAMES: &str = "RANGE_NAMES";
    pub const RANGE_BASE_ADDR: &str = "RANGE_BASE_ADDR";
    pub const RANGE_ADDR_WIDTH: &str = "RANGE_ADDR_WIDTH";
    pub const RANGE_CLOCK_DOMAINS: &str = "RANGE_CLOCK_DOMAINS";
    pub const MAIN_CLOCK_DOMAIN: &str = "MAIN_CLOCK_DOMAIN";
}

/// Read access to a keyed configuration source.
pub trait PropertySource {
    /// Look up the raw value of a property.
    fn property(&self, name: &str) -> Option<&str>;

    /// Human-readable origin used in diagnostics (usually a file path).
    fn origin(&self) -> &str;
}

impl PropertySource for HashMap<String, String> {
    fn property(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }

    fn origin(&self) -> &str {
        "<memory>"
    }
}

/// A configuration source parsed from CSV text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSource {
    origin: String,
    properties: HashMap<String, String>,
}

impl CsvSource {
    /// Load and parse a CSV configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SocMapError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Self::from_reader(file, path.display().to_string())
    }

    /// Parse CSV text. The first field of each record is the property name,
    /// the second its value; further fields are ignored.
    pub fn parse(content: &str, origin: impl Into<String>) -> Result<Self> {
        Self::from_reader(content.as_bytes(), origin)
    }

    /// Parse CSV records from any reader.
    pub fn from_reader<R: Read>(reader: R, origin: impl Into<String>) -> Result<Self> {
        let origin = origin.into();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut properties = HashMap::new();
        for record in rdr.records() {
            let record = record.map_err(|e| csv_error(&origin, e))?;
            // Blank and whitespace-only lines carry no key.
            let Some(key) = record.get(0).filter(|k| !k.is_empty()) else {
                continue;
            };
            let value = record.get(1).unwrap_or_default();
            properties
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }

        Ok(Self { origin, properties })
    }

    /// Number of distinct properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the source holds no properties.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl PropertySource for CsvSource {
    fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    fn origin(&self) -> &str {
        &self.origin
    }
}

fn csv_error(origin: &str, err: csv::Error) -> SocMapError {
    let line = err
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or_default();
    let detail = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => SocMapError::Io(e),
        _ => SocMapError::Csv {
            origin: origin.to_string(),
            line,
            detail,
        },
    }
}
