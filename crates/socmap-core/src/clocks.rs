//! Clock-domain derivation for the main bus.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::address_space::DDR_CHANNEL_PREFIX;
use crate::descriptor::{find_main_bus, BusDescriptor};
use crate::error::{Result, SocMapError};
use crate::source::property;

/// Bridge to the high-performance bus, which is clocked separately.
pub const HIGH_PERFORMANCE_BUS: &str = "HBUS";

/// A device and the clock domain that drives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockDomainBinding {
    /// Device name; becomes the `<device>_clk` / `<device>_rstn` signal prefix.
    pub device: String,
    /// Clock label, e.g. "100" for `clk_100MHz`.
    pub clock: String,
}

/// Clock wiring of the main bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClockDomains {
    /// Clock label aliased to `main_clk` / `main_rstn`.
    pub main_clock_domain: String,
    /// One binding per templated device, in range order.
    pub bindings: Vec<ClockDomainBinding>,
}

/// Outcome of clock-domain derivation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockPlan {
    /// The main bus was found and its domains derived.
    Generated(ClockDomains),
    /// The main bus is present but `DISABLE`d; it contributes no bindings.
    MainBusDisabled,
    /// No descriptor is tagged as the main bus; there is nothing to generate.
    NoMainBus,
}

/// Whether a device has dedicated clock wiring and is left out of the
/// templated bindings.
pub fn has_dedicated_clock(name: &str) -> bool {
    name == HIGH_PERFORMANCE_BUS || name.starts_with(DDR_CHANNEL_PREFIX)
}

impl ClockDomains {
    /// Derive the clock wiring of an active main-bus descriptor.
    ///
    /// The range lists must agree in length. Clock labels are paired with
    /// range names position by position.
    pub(crate) fn derive(main_bus: &BusDescriptor) -> Result<Self> {
        let label = main_bus.label(0);
        main_bus.check_lengths(&label)?;

        let main_clock_domain = main_bus.main_clock_domain.clone().ok_or_else(|| {
            SocMapError::MissingProperty {
                origin: label,
                property: property::MAIN_CLOCK_DOMAIN,
            }
        })?;

        let clocks = main_bus.clock_domains.as_deref().unwrap_or_default();
        if clocks.len() != main_bus.range_names.len() {
            warn!(
                clocks = clocks.len(),
                ranges = main_bus.range_names.len(),
                "RANGE_CLOCK_DOMAINS and RANGE_NAMES differ in length; extra entries ignored"
            );
        }

        let bindings = clocks
            .iter()
            .zip(&main_bus.range_names)
            .filter(|(_, name)| !has_dedicated_clock(name))
            .map(|(clock, name)| ClockDomainBinding {
                device: name.clone(),
                clock: clock.clone(),
            })
            .collect::<Vec<_>>();
        debug!(count = bindings.len(), "derived clock-domain bindings");

        Ok(Self {
            main_clock_domain,
            bindings,
        })
    }
}

impl ClockPlan {
    /// Locate the main bus among the descriptors and derive its clocks.
    ///
    /// A disabled main bus is reported before any of its other fields are
    /// looked at.
    pub fn derive(descriptors: &[BusDescriptor]) -> Result<Self> {
        match find_main_bus(descriptors) {
            Some(main_bus) if main_bus.is_disabled() => {
                debug!("main bus disabled; no clock-domain bindings");
                Ok(ClockPlan::MainBusDisabled)
            }
            Some(main_bus) => Ok(ClockPlan::Generated(ClockDomains::derive(main_bus)?)),
            None => Ok(ClockPlan::NoMainBus),
        }
    }

    /// The derived domains, if any.
    pub fn domains(&self) -> Option<&ClockDomains> {
        match self {
            ClockPlan::Generated(domains) => Some(domains),
            ClockPlan::MainBusDisabled | ClockPlan::NoMainBus => None,
        }
    }
}
