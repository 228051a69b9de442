//! SystemVerilog clock and reset assignments.

use std::fmt;

use socmap_core::{ClockDomainBinding, ClockDomains};

use crate::artifact::{Artifact, ArtifactKind, GENERATOR};

/// The clock-assignment RTL include.
#[derive(Debug, Clone, Copy)]
pub struct ClockAssignments<'a> {
    domains: &'a ClockDomains,
}

impl<'a> ClockAssignments<'a> {
    pub fn new(domains: &'a ClockDomains) -> Self {
        Self { domains }
    }
}

fn write_binding(f: &mut fmt::Formatter<'_>, binding: &ClockDomainBinding) -> fmt::Result {
    let ClockDomainBinding { device, clock } = binding;
    writeln!(f, "logic {device}_clk;")?;
    writeln!(f, "assign {device}_clk = clk_{clock}MHz;")?;
    writeln!(f, "logic {device}_rstn;")?;
    writeln!(f, "assign {device}_rstn = rstn_{clock}MHz;")
}

impl fmt::Display for ClockAssignments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let main = &self.domains.main_clock_domain;

        writeln!(f, "// This file is auto-generated with {GENERATOR}")?;
        writeln!(f)?;
        writeln!(f, "/////////////////////////////////////////")?;
        writeln!(f, "// Clocks declaration and assignments  //")?;
        writeln!(f, "/////////////////////////////////////////")?;
        writeln!(f, "assign main_clk = clk_{main}MHz;")?;
        writeln!(f, "assign main_rstn = rstn_{main}MHz;")?;
        writeln!(f, "logic clk_300MHz;")?;
        writeln!(f, "logic rstn_300MHz;")?;
        writeln!(f)?;
        for binding in &self.domains.bindings {
            write_binding(f, binding)?;
        }
        writeln!(f)?;
        writeln!(f, "logic HBUS_clk;")
    }
}

impl Artifact for ClockAssignments<'_> {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ClockAssignments
    }

    fn render(&self) -> String {
        self.to_string()
    }
}
