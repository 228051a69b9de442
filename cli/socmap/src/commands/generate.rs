//! `socmap generate`: every artifact configured in the manifest.

use std::path::Path;

use anyhow::Result;
use socmap_render::{available_artifacts, ArtifactKind};

use crate::commands::{clocks, linker};
use crate::manifest::SocManifest;

/// Generate the linker script and the clock-assignment include, or only the
/// artifact named by `only`.
///
/// Every selected artifact is synthesized before any file is written.
pub fn run(
    project_dir: &Path,
    manifest: &SocManifest,
    only: Option<&str>,
    xilinx_root: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let kinds = match only {
        Some(name) => vec![ArtifactKind::parse(name)?],
        None => available_artifacts().to_vec(),
    };

    let mut linker_job = None;
    let mut clocks_job = None;
    for kind in kinds {
        match kind {
            ArtifactKind::LinkerScript => {
                linker_job = Some(linker::prepare(project_dir, manifest, &[], None, false)?);
            }
            ArtifactKind::ClockAssignments => {
                clocks_job = clocks::prepare(project_dir, manifest, &[], None, xilinx_root, strict)?;
            }
        }
    }

    if let Some(job) = linker_job {
        job.write()?;
    }
    if let Some(job) = clocks_job {
        job.write()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::init::create_project;

    fn demo_project(dir: &Path) -> (SocManifest, std::path::PathBuf) {
        let project = dir.join("demo");
        create_project(&project, "demo").unwrap();
        SocManifest::find_and_load(&project).unwrap().unwrap()
    }

    #[test]
    fn generates_both_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, project) = demo_project(dir.path());

        run(&project, &manifest, None, None, true).unwrap();

        assert!(project.join("out/sw/demo.ld").is_file());
        assert!(project
            .join("out/hw/rtl/uninasoc_clk_assignments.svinc")
            .is_file());
    }

    #[test]
    fn only_one_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, project) = demo_project(dir.path());

        run(&project, &manifest, Some("linker-script"), None, false).unwrap();

        assert!(project.join("out/sw/demo.ld").is_file());
        assert!(!project.join("out/hw").exists());
    }

    #[test]
    fn unknown_artifact_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, project) = demo_project(dir.path());

        let err = run(&project, &manifest, Some("bitstream"), None, false).unwrap_err();
        assert!(err.to_string().contains("unknown artifact"));
    }

    #[test]
    fn xilinx_root_override() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, project) = demo_project(dir.path());
        let root = dir.path().join("xilinx");

        run(&project, &manifest, None, Some(root.as_path()), false).unwrap();

        assert!(root.join("rtl/uninasoc_clk_assignments.svinc").is_file());
        assert!(!project.join("out/hw").exists());
    }

    #[test]
    fn clock_failure_leaves_no_linker_script() {
        let dir = tempfile::tempdir().unwrap();
        let (mut manifest, project) = demo_project(dir.path());
        manifest.rtl.xilinx_root = None;

        let err = run(&project, &manifest, None, None, false).unwrap_err();
        assert!(err.to_string().contains("no RTL output location"));
        assert!(!project.join("out/sw/demo.ld").exists());
    }

    #[test]
    fn mismatched_main_bus_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (manifest, project) = demo_project(dir.path());
        let main_bus = project.join("config/config_main_bus.csv");
        let content = std::fs::read_to_string(&main_bus).unwrap();
        std::fs::write(&main_bus, content.replace("16 12 22 12 31", "16 12 22 12")).unwrap();

        assert!(run(&project, &manifest, None, None, false).is_err());
        assert!(!project.join("out/sw/demo.ld").exists());
        assert!(!project.join("out/hw").exists());
    }
}
