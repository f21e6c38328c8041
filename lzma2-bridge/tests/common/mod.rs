//! Helpers shared by the tests that load the real codec library from disk.

#![allow(dead_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use lzma2_bridge::{BootstrapConfig, BootstrapError, Platform, Toolchain};

fn is_codec_library(file_name: &str) -> bool {
    let name = Platform::current().library_file_name();
    let Some((stem, ext)) = name.split_once('.') else {
        return false;
    };
    // cargo suffixes dependency artifacts with `-<hash>`
    file_name == name
        || (file_name.starts_with(&format!("{stem}-")) && file_name.ends_with(&format!(".{ext}")))
}

fn find_in(dir: &Path) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(is_codec_library)
        })
}

/// Path of a compiled `lzma2-native` cdylib.
///
/// The dev-dependency build normally leaves one next to the test binary;
/// otherwise the crate is built into a separate target directory.
pub fn native_library() -> PathBuf {
    let exe = env::current_exe().expect("test binary path");
    let deps = exe.parent().expect("deps directory");
    if let Some(found) = find_in(deps).or_else(|| deps.parent().and_then(find_in)) {
        return found;
    }

    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let target_dir = workspace.join("target").join("bridge-tests");
    let cargo = env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
    let status = Command::new(cargo)
        .args(["build", "--package", "lzma2-native", "--target-dir"])
        .arg(&target_dir)
        .current_dir(&workspace)
        .status()
        .expect("run cargo");
    assert!(status.success(), "building lzma2-native failed: {status}");

    find_in(&target_dir.join("debug")).expect("lzma2-native cdylib after build")
}

/// Stands in for `cargo build --release` by copying an already built
/// library into `<project_root>/target/release`.
pub struct CopyBuild {
    source: PathBuf,
    delay: Duration,
    builds: AtomicUsize,
}

impl CopyBuild {
    pub fn new(source: PathBuf) -> Self {
        Self::slow(source, Duration::ZERO)
    }

    pub fn slow(source: PathBuf, delay: Duration) -> Self {
        Self { source, delay, builds: AtomicUsize::new(0) }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl Toolchain for CopyBuild {
    fn build_release(&self, project_root: &Path) -> Result<(), BootstrapError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);

        let release = project_root.join("target").join("release");
        fs::create_dir_all(&release).unwrap();
        fs::copy(&self.source, release.join(Platform::current().library_file_name())).unwrap();
        Ok(())
    }
}

/// Always fails the way a missing cargo would.
pub struct MissingCargo;

impl Toolchain for MissingCargo {
    fn build_release(&self, _project_root: &Path) -> Result<(), BootstrapError> {
        Err(BootstrapError::Spawn {
            program: "cargo".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "cargo not installed"),
        })
    }
}

pub fn config_in(dir: &Path) -> BootstrapConfig {
    BootstrapConfig::default()
        .with_runtime_dir(dir.join("app").join("bin"))
        .with_project_root(dir.join("project"))
}
