use std::ptr;

use libc::size_t;

use crate::bootstrap::{ensure_library, CargoToolchain, Toolchain};
use crate::buffer::{NativeBuffer, TransientInput};
use crate::config::BootstrapConfig;
use crate::error::{CodecError, Error, Operation};
use crate::native::{NativeApi, NativeLibrary};

/// Compress/decompress through a native codec library.
///
/// Every call either returns bytes fully copied into host memory or an
/// error, and in both cases leaves no native allocation behind.
#[derive(Debug)]
pub struct Lzma2Codec<A: NativeApi = NativeLibrary> {
    api: A,
}

impl Lzma2Codec<NativeLibrary> {
    /// Bootstrap the artifact described by `config` and load it.
    pub fn open(config: &BootstrapConfig) -> Result<Self, Error> {
        Self::open_with(config, &CargoToolchain::default())
    }

    /// [`Lzma2Codec::open`] building with `toolchain` when the artifact is missing.
    pub fn open_with(config: &BootstrapConfig, toolchain: &dyn Toolchain) -> Result<Self, Error> {
        let outcome = ensure_library(config, toolchain)?;
        let library = NativeLibrary::load(outcome.path())?;
        Ok(Self::with_api(library))
    }
}

impl<A: NativeApi> Lzma2Codec<A> {
    pub fn with_api(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.call(Operation::Compress, input)
    }

    pub fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        self.call(Operation::Decompress, input)
    }

    fn call(&self, op: Operation, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        if input.is_empty() {
            return Err(CodecError::EmptyInput { op });
        }

        let transient = TransientInput::copy_from(input);
        let mut out_ptr: *mut u8 = ptr::null_mut();
        let mut out_len: size_t = 0;

        let entry = self.api.entry_point(op);
        let code = unsafe { entry(transient.as_ptr(), transient.len(), &mut out_ptr, &mut out_len) };
        drop(transient);

        // Owned before the status is checked so a failing call still frees it
        let output = unsafe { NativeBuffer::from_raw(out_ptr, out_len, self.api.free_fn()) };

        if code != 0 {
            return Err(CodecError::NativeCall { op, code });
        }

        Ok(output.map(NativeBuffer::into_host).unwrap_or_default())
    }
}
