use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Which native entry point a call goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Compress => "compress",
            Operation::Decompress => "decompress",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-call codec errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("lzma2 {op}: empty input")]
    EmptyInput { op: Operation },

    /// The code is the native library's own status, passed through untouched.
    #[error("lzma2 {op} failed: {code}")]
    NativeCall { op: Operation, code: i32 },
}

/// Failures while making the native artifact available
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Native library build failed with status: {status}")]
    BuildFailed { status: ExitStatus },

    #[error("Failed to read built library {}: {source}", path.display())]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write library to {}: {source}", path.display())]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while opening the artifact
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to load {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("Missing symbol {name}: {source}")]
    Symbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },
}

/// Errors from bringing up a codec handle
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),

    #[error(transparent)]
    Load(#[from] LoadError),
}
