//! End-to-end: CSV bus configurations to rendered artifacts.

use std::path::{Path, PathBuf};

use socmap_core::symbols::{STACK_START, VECTOR_TABLE_END, VECTOR_TABLE_START};
use socmap_core::{
    load_descriptors, BootSelector, ClockPlan, DeviceCategory, MemoryLayout, SocMapError,
};
use socmap_render::{write_artifact, Artifact, ClockAssignments, LinkerScript, PeripheralSymbols};

const MAIN_BUS: &str = "\
PROPERTY,VALUE
CONFIG_NAME,MBUS
PROTOCOL,AXI4
NUM_MI,3
RANGE_NAMES,BRAM UART0 MBUS
RANGE_BASE_ADDR,0 10000000 20000000
RANGE_ADDR_WIDTH,16 12 16
RANGE_CLOCK_DOMAINS,100 100 100
MAIN_CLOCK_DOMAIN,100
";

const DISABLED_HBUS: &str = "\
CONFIG_NAME,HBUS
PROTOCOL,DISABLE
NUM_MI,2
RANGE_NAMES,DDR4CH0 HBM
RANGE_BASE_ADDR,80000000
RANGE_ADDR_WIDTH,30 30 30
";

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn reference_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.csv", MAIN_BUS);

    let buses = load_descriptors(&[main]).unwrap();
    let layout = MemoryLayout::synthesize(&buses, &BootSelector::default()).unwrap();

    let map = &layout.address_map;
    assert_eq!(map.memory.len(), 1);
    assert_eq!(map.memory[0].name, "BRAM");
    assert_eq!(map.memory[0].base_address, 0x0);
    assert_eq!(map.memory[0].size, 0x10000);
    assert_eq!(map.peripheral.len(), 1);
    assert_eq!(map.peripheral[0].name, "UART0");
    assert_eq!(map.peripheral[0].base_address, 0x1000_0000);
    assert_eq!(map.peripheral[0].size, 0x1000);
    assert_eq!(map.bus[0].category, DeviceCategory::Bus);

    assert_eq!(layout.symbols.value(STACK_START), Some(0xfff0));
    assert_eq!(layout.symbols.value(VECTOR_TABLE_START), Some(0x0));
    assert_eq!(layout.symbols.value(VECTOR_TABLE_END), Some(0x80));

    let script = LinkerScript::new(&layout).render();
    assert!(script.contains("BRAM (xrw): ORIGIN = 0x0000000000000000, LENGTH = 0x10000"));
    assert!(!script.contains("MBUS"));
    assert!(!script.contains("UART0"));
}

#[test]
fn disabled_bus_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.csv", MAIN_BUS);
    let hbus = write(dir.path(), "hbus.csv", DISABLED_HBUS);

    let buses = load_descriptors(&[main, hbus]).unwrap();
    let layout = MemoryLayout::synthesize(&buses, &BootSelector::default()).unwrap();
    assert!(layout.address_map.device("DDR4CH0").is_none());
    assert!(layout.address_map.device("HBM").is_none());
    assert_eq!(layout.address_map.len(), 3);
}

#[test]
fn clock_scenario_excludes_hbus() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.csv",
        "CONFIG_NAME,MBUS\nPROTOCOL,AXI4\nNUM_MI,2\nRANGE_NAMES,UART0 HBUS\n\
         RANGE_BASE_ADDR,10000000 80000000\nRANGE_ADDR_WIDTH,12 31\n\
         RANGE_CLOCK_DOMAINS,100 50\nMAIN_CLOCK_DOMAIN,100\n",
    );
    let buses = load_descriptors(&[main]).unwrap();
    let plan = ClockPlan::derive(&buses).unwrap();
    let domains = plan.domains().unwrap();
    assert_eq!(domains.bindings.len(), 1);
    assert_eq!(domains.bindings[0].device, "UART0");
    assert_eq!(domains.bindings[0].clock, "100");

    let rtl = ClockAssignments::new(domains).render();
    assert!(rtl.contains("assign UART0_clk = clk_100MHz;\n"));
    assert!(!rtl.contains("assign HBUS_clk"));
}

#[test]
fn missing_main_bus_is_named_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let hbus = write(dir.path(), "hbus.csv", DISABLED_HBUS);
    let buses = load_descriptors(&[hbus]).unwrap();
    assert_eq!(ClockPlan::derive(&buses).unwrap(), ClockPlan::NoMainBus);
}

#[test]
fn length_mismatch_aborts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(
        dir.path(),
        "main.csv",
        "PROTOCOL,AXI4\nNUM_MI,3\nRANGE_NAMES,BRAM UART0 MBUS\n\
         RANGE_BASE_ADDR,0 10000000\nRANGE_ADDR_WIDTH,16 12 16\n",
    );
    let out = dir.path().join("out.ld");

    let buses = load_descriptors(&[bad]).unwrap();
    let result = MemoryLayout::synthesize(&buses, &BootSelector::default());
    assert!(matches!(result, Err(SocMapError::LengthMismatch { .. })));
    if let Ok(layout) = result {
        write_artifact(&LinkerScript::new(&layout), &out).unwrap();
    }
    assert!(!out.exists());
}

#[test]
fn generation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(dir.path(), "main.csv", MAIN_BUS);
    let hbus = write(dir.path(), "hbus.csv", DISABLED_HBUS);
    let paths = [main, hbus];

    let render = |out: &Path| {
        let buses = load_descriptors(&paths).unwrap();
        let layout = MemoryLayout::synthesize(&buses, &BootSelector::default()).unwrap();
        let script = LinkerScript::new(&layout).with_peripherals(PeripheralSymbols::Emit);
        write_artifact(&script, out).unwrap();
        std::fs::read(out).unwrap()
    };

    let first = render(&dir.path().join("a.ld"));
    let second = render(&dir.path().join("b.ld"));
    assert_eq!(first, second);
}

#[test]
fn clock_mismatch_aborts_before_output() {
    let dir = tempfile::tempdir().unwrap();
    let bad = write(
        dir.path(),
        "main.csv",
        "CONFIG_NAME,MBUS\nPROTOCOL,AXI4\nNUM_MI,3\nRANGE_NAMES,UART0 HBUS\n\
         RANGE_BASE_ADDR,10000000\nRANGE_ADDR_WIDTH,12 31 16\n\
         RANGE_CLOCK_DOMAINS,100 50\nMAIN_CLOCK_DOMAIN,100\n",
    );
    let out = dir.path().join("clk.svinc");

    let buses = load_descriptors(&[bad]).unwrap();
    let result = ClockPlan::derive(&buses);
    assert!(matches!(result, Err(SocMapError::LengthMismatch { .. })));
    if let Ok(ClockPlan::Generated(domains)) = &result {
        write_artifact(&ClockAssignments::new(domains), &out).unwrap();
    }
    assert!(!out.exists());
}

#[test]
fn disabled_main_bus_has_no_clock_bindings() {
    let dir = tempfile::tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.csv",
        "CONFIG_NAME,MBUS\nPROTOCOL,DISABLE\nNUM_MI,2\nRANGE_NAMES,UART0 GPIO\n\
         RANGE_BASE_ADDR,10000000\nRANGE_CLOCK_DOMAINS,100 20\nMAIN_CLOCK_DOMAIN,100\n",
    );

    let buses = load_descriptors(&[main]).unwrap();
    let plan = ClockPlan::derive(&buses).unwrap();
    assert_eq!(plan, ClockPlan::MainBusDisabled);
    assert!(plan.domains().is_none());
    assert!(MemoryLayout::synthesize(&buses, &BootSelector::default()).is_err());
}
