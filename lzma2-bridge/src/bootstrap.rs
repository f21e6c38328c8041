//! Makes sure the native codec library exists before anything loads it.
//!
//! If the artifact is missing from the runtime directory, the cargo project
//! that produces it is built in release mode and the result is copied over.
//! Within one process the crate root serializes bootstrapping; there is no
//! lock between processes and no build timeout.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::config::BootstrapConfig;
use crate::error::BootstrapError;

/// What [`ensure_library`] found or did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent(PathBuf),
    Built(PathBuf),
}

impl BootstrapOutcome {
    pub fn path(&self) -> &Path {
        match self {
            BootstrapOutcome::AlreadyPresent(path) | BootstrapOutcome::Built(path) => path,
        }
    }
}

/// Something that can produce the release build of the native project.
pub trait Toolchain {
    /// Run a release build with `project_root` as working directory and
    /// block until it exits.
    fn build_release(&self, project_root: &Path) -> Result<(), BootstrapError>;
}

/// Runs `cargo build --release`, inheriting stdout/stderr.
#[derive(Debug, Clone)]
pub struct CargoToolchain {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Default for CargoToolchain {
    fn default() -> Self {
        Self {
            // Set by cargo when the host itself runs under cargo
            program: env::var_os("CARGO").unwrap_or_else(|| OsString::from("cargo")),
            args: vec![OsString::from("build"), OsString::from("--release")],
        }
    }
}

impl Toolchain for CargoToolchain {
    fn build_release(&self, project_root: &Path) -> Result<(), BootstrapError> {
        let program = self.program.to_string_lossy().into_owned();
        debug!("Running {} {:?} in {}", program, self.args, project_root.display());

        let status = Command::new(&self.program)
            .args(&self.args)
            .current_dir(project_root)
            .status()
            .map_err(|source| BootstrapError::Spawn { program, source })?;

        if !status.success() {
            return Err(BootstrapError::BuildFailed { status });
        }
        Ok(())
    }
}

/// Ensure the artifact named by `config` exists, building it with
/// `toolchain` when it does not.
pub fn ensure_library(
    config: &BootstrapConfig,
    toolchain: &dyn Toolchain,
) -> Result<BootstrapOutcome, BootstrapError> {
    let artifact = config.artifact_path();
    if artifact.exists() {
        debug!("Native library present at {}", artifact.display());
        return Ok(BootstrapOutcome::AlreadyPresent(artifact));
    }

    info!(
        "Native library missing at {}, building {}",
        artifact.display(),
        config.project_root.display()
    );
    toolchain.build_release(&config.project_root)?;

    install(&config.build_output_path(), &config.runtime_dir, &artifact)?;
    info!("Installed native library to {}", artifact.display());

    Ok(BootstrapOutcome::Built(artifact))
}

fn install(built: &Path, runtime_dir: &Path, artifact: &Path) -> Result<(), BootstrapError> {
    let bytes = fs::read(built).map_err(|source| BootstrapError::ReadArtifact {
        path: built.to_path_buf(),
        source,
    })?;

    fs::create_dir_all(runtime_dir).map_err(|source| BootstrapError::CreateDir {
        path: runtime_dir.to_path_buf(),
        source,
    })?;

    // Staged next to the destination and renamed over it, so a copy another
    // process already mapped is never truncated
    let write_err = |source: io::Error| BootstrapError::WriteArtifact {
        path: artifact.to_path_buf(),
        source,
    };
    let mut staged = NamedTempFile::new_in(runtime_dir).map_err(write_err)?;
    staged.write_all(&bytes).map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }
    staged.persist(artifact).map_err(|e| write_err(e.error))?;
    Ok(())
}
