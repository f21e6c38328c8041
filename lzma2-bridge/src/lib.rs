//! LZMA2 bridge - loads the native `lzma2` codec library, building and
//! installing it first if it is missing, and exchanges buffers with it.
//!
//! Hosts call [`init`] (or [`init_or_abort`]) once at startup. The free
//! functions [`compress`] and [`decompress`] fall back to
//! `init_or_abort(BootstrapConfig::from_env())` when nothing was initialized
//! yet, so bootstrap always finishes before the first codec call.

use std::sync::{Mutex, OnceLock, PoisonError};

pub mod bootstrap;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod native;
pub mod platform;

pub use bootstrap::{ensure_library, BootstrapOutcome, CargoToolchain, Toolchain};
pub use codec::Lzma2Codec;
pub use config::BootstrapConfig;
pub use error::{BootstrapError, CodecError, Error, LoadError, Operation};
pub use native::{NativeApi, NativeLibrary};
pub use platform::Platform;

static CODEC: OnceLock<Lzma2Codec> = OnceLock::new();
// Held for the whole check-bootstrap-load-store sequence
static INIT: Mutex<()> = Mutex::new(());

/// Bootstrap and load the process-wide codec.
///
/// Only the first successful call does any work; later calls return the
/// same codec and ignore `config`. Concurrent callers wait for the one
/// bootstrap in flight instead of starting their own.
pub fn init(config: &BootstrapConfig) -> Result<&'static Lzma2Codec, Error> {
    init_with(config, &CargoToolchain::default())
}

/// [`init`] building with `toolchain` when the artifact is missing.
pub fn init_with(config: &BootstrapConfig, toolchain: &dyn Toolchain) -> Result<&'static Lzma2Codec, Error> {
    if let Some(codec) = CODEC.get() {
        return Ok(codec);
    }

    // CODEC is only written on success, so a lock poisoned by a panicking
    // initializer guards nothing stale
    let _guard = INIT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(codec) = CODEC.get() {
        return Ok(codec);
    }

    let codec = Lzma2Codec::open_with(config, toolchain)?;
    Ok(CODEC.get_or_init(|| codec))
}

/// [`init`], treating failure as fatal: the host cannot run without the
/// codec.
pub fn init_or_abort(config: &BootstrapConfig) -> &'static Lzma2Codec {
    init_or_abort_with(config, &CargoToolchain::default())
}

pub fn init_or_abort_with(config: &BootstrapConfig, toolchain: &dyn Toolchain) -> &'static Lzma2Codec {
    match init_with(config, toolchain) {
        Ok(codec) => codec,
        Err(e) => panic!("Failed to initialize native lzma2 library: {e}"),
    }
}

fn global() -> &'static Lzma2Codec {
    match CODEC.get() {
        Some(codec) => codec,
        None => init_or_abort(&BootstrapConfig::from_env()),
    }
}

/// Compress `input` with the process-wide codec.
pub fn compress(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    global().compress(input)
}

/// Decompress `input` with the process-wide codec.
pub fn decompress(input: &[u8]) -> Result<Vec<u8>, CodecError> {
    global().decompress(input)
}
