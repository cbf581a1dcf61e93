//! Squashfs backend: external `mksquashfs` / `mount` / `umount`.
//!
//! The production technology for serving archives to a web server: a
//! loop-mounted squashfs image is read-only at the filesystem level, and
//! `umount` fails with `EBUSY` while a reader still holds files open,
//! which is exactly the deferral signal retention wants.

use crate::backend::ArchiveBackend;
use crate::error::{BackendError, BackendResult};
use std::path::Path;
use std::process::Command;

/// Backend shelling out to the squashfs toolchain.
#[derive(Debug, Default, Clone, Copy)]
pub struct SquashfsBackend;

fn run_tool(mut cmd: Command, tool: &str) -> BackendResult<()> {
    let output = cmd.output().map_err(|source| BackendError::Spawn {
        tool: tool.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(BackendError::Tool {
            tool: tool.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

impl ArchiveBackend for SquashfsBackend {
    fn image_extension(&self) -> &'static str {
        "sqsh"
    }

    fn pack(&self, source: &Path, image: &Path) -> BackendResult<()> {
        let mut cmd = Command::new("mksquashfs");
        cmd.arg(source).arg(image).args(["-noappend", "-quiet"]);
        run_tool(cmd, "mksquashfs")
    }

    fn mount(&self, image: &Path, mount_point: &Path) -> BackendResult<()> {
        let mut cmd = Command::new("mount");
        cmd.args(["-o", "loop,ro"]).arg(image).arg(mount_point);
        run_tool(cmd, "mount")
    }

    fn unmount(&self, mount_point: &Path) -> BackendResult<()> {
        let mut cmd = Command::new("umount");
        cmd.arg(mount_point);
        run_tool(cmd, "umount")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mount/umount need root and loop devices; only the failure paths are
    // exercisable in a plain test environment.

    #[test]
    fn missing_tool_reports_spawn_error() {
        let mut cmd = Command::new("runvault-no-such-tool");
        cmd.arg("x");
        let err = run_tool(cmd, "runvault-no-such-tool").unwrap_err();
        assert!(matches!(err, BackendError::Spawn { .. }));
    }

    #[test]
    fn failing_tool_reports_status_and_stderr() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo boom >&2; exit 3"]);
        let err = run_tool(cmd, "sh").unwrap_err();
        match err {
            BackendError::Tool { tool, stderr, .. } => {
                assert_eq!(tool, "sh");
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
