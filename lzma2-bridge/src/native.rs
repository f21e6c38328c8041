//! C-ABI surface of the native codec library and its dynamic loader.

use std::path::{Path, PathBuf};

use libc::{c_int, c_void, size_t};
use libloading::{Library, Symbol};

use crate::error::{LoadError, Operation};

/// `int fn(const uint8_t *input, size_t input_len, uint8_t **out_ptr, size_t *out_len)`
pub type CodecFn = unsafe extern "C" fn(*const u8, size_t, *mut *mut u8, *mut size_t) -> c_int;

/// `void fn(void *ptr)`
pub type FreeFn = unsafe extern "C" fn(*mut c_void);

/// Entry points the codec bridge calls into.
pub trait NativeApi: Send + Sync {
    fn entry_point(&self, op: Operation) -> CodecFn;

    /// Releases buffers returned by either entry point.
    fn free_fn(&self) -> FreeFn;
}

/// The codec library opened from disk.
pub struct NativeLibrary {
    compress: CodecFn,
    decompress: CodecFn,
    free: FreeFn,
    path: PathBuf,
    // Keeps the function pointers above valid
    _lib: Library,
}

impl NativeLibrary {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let lib = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        // Copy the raw pointers out so the symbols stop borrowing `lib`
        let (compress, decompress, free) = {
            let compress: Symbol<CodecFn> = unsafe { lib.get(b"lzma2_compress\0") }
                .map_err(|source| LoadError::Symbol { name: "lzma2_compress", source })?;
            let decompress: Symbol<CodecFn> = unsafe { lib.get(b"lzma2_decompress\0") }
                .map_err(|source| LoadError::Symbol { name: "lzma2_decompress", source })?;
            let free: Symbol<FreeFn> = unsafe { lib.get(b"lzma2_free\0") }
                .map_err(|source| LoadError::Symbol { name: "lzma2_free", source })?;
            (*compress, *decompress, *free)
        };

        Ok(Self {
            compress,
            decompress,
            free,
            path: path.to_path_buf(),
            _lib: lib,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NativeApi for NativeLibrary {
    fn entry_point(&self, op: Operation) -> CodecFn {
        match op {
            Operation::Compress => self.compress,
            Operation::Decompress => self.decompress,
        }
    }

    fn free_fn(&self) -> FreeFn {
        self.free
    }
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary").field("path", &self.path).finish()
    }
}
