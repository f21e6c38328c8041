use std::env;
use std::path::{Path, PathBuf};

use crate::platform::Platform;

/// Overrides the directory the artifact is installed into.
pub const RUNTIME_DIR_ENV: &str = "LZMA2_RUNTIME_DIR";
/// Overrides the cargo project the artifact is built from.
pub const PROJECT_ROOT_ENV: &str = "LZMA2_PROJECT_ROOT";

/// Where the native library lives at runtime and where it is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Directory holding the loadable artifact (relative paths resolve
    /// against the process working directory).
    pub runtime_dir: PathBuf,

    /// Cargo project that produces the artifact in `target/release`.
    pub project_root: PathBuf,

    /// Selects the artifact file name.
    pub platform: Platform,
}

/// `runtime_dir` defaults to `bin` under the working directory.
///
/// `project_root` defaults to the workspace this crate was compiled in, as an
/// absolute path fixed at compile time. A binary moved away from its source
/// tree can only rebuild the artifact if `project_root` is set explicitly
/// (`with_project_root`, `LZMA2_PROJECT_ROOT` or `--project-root`);
/// an artifact already present in `runtime_dir` needs no project at all.
impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            runtime_dir: PathBuf::from("bin"),
            project_root: default_project_root(),
            platform: Platform::current(),
        }
    }
}

/// The workspace one level above this crate's own directory.
fn default_project_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..")
}

impl BootstrapConfig {
    /// Defaults, overridden by `LZMA2_RUNTIME_DIR` / `LZMA2_PROJECT_ROOT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(RUNTIME_DIR_ENV) {
            config.runtime_dir = dir;
        }
        if let Some(root) = lookup(PROJECT_ROOT_ENV) {
            config.project_root = root;
        }
        config
    }

    pub fn with_runtime_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.runtime_dir = dir.into();
        self
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// `<runtime_dir>/<library file name>`
    pub fn artifact_path(&self) -> PathBuf {
        self.runtime_dir.join(self.platform.library_file_name())
    }

    /// `<project_root>/target/release/<library file name>`
    pub fn build_output_path(&self) -> PathBuf {
        self.project_root
            .join("target")
            .join("release")
            .join(self.platform.library_file_name())
    }
}
