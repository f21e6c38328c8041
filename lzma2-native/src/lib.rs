//! LZMA2 codec exported over a C ABI.
//!
//! Output buffers are allocated with `malloc` and must be released with
//! [`lzma2_free`] once the caller has copied them.

use std::io::{self, Read, Write};
use std::ptr;
use std::slice;

use libc::{c_int, c_void, size_t};
use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

/// One of the pointer arguments was null.
pub const LZMA2_ERR_NULL_PTR: c_int = 1;
/// The encoder or decoder rejected the stream.
pub const LZMA2_ERR_IO: c_int = 2;
/// `malloc` could not provide the output buffer.
pub const LZMA2_ERR_ALLOC: c_int = 3;

const PRESET: u32 = 6;

fn encode(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut encoder = XzEncoder::new(Vec::new(), PRESET);
    encoder.write_all(input)?;
    encoder.finish()
}

fn decode(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut decoder = XzDecoder::new(input);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

/// Hand `data` to the caller through the out parameters.
///
/// An empty result is reported as a null pointer with zero length.
unsafe fn export(data: &[u8], out_ptr: *mut *mut u8, out_len: *mut size_t) -> c_int {
    if data.is_empty() {
        *out_ptr = ptr::null_mut();
        *out_len = 0;
        return 0;
    }

    let mem = libc::malloc(data.len()) as *mut u8;
    if mem.is_null() {
        return LZMA2_ERR_ALLOC;
    }
    ptr::copy_nonoverlapping(data.as_ptr(), mem, data.len());
    *out_ptr = mem;
    *out_len = data.len();
    0
}

unsafe fn run(
    codec: fn(&[u8]) -> io::Result<Vec<u8>>,
    input_ptr: *const u8,
    input_len: size_t,
    out_ptr: *mut *mut u8,
    out_len: *mut size_t,
) -> c_int {
    if input_ptr.is_null() || out_ptr.is_null() || out_len.is_null() {
        return LZMA2_ERR_NULL_PTR;
    }

    let input = slice::from_raw_parts(input_ptr, input_len);
    match codec(input) {
        Ok(data) => export(&data, out_ptr, out_len),
        Err(_) => LZMA2_ERR_IO,
    }
}

/// Compress `input_len` bytes at `input_ptr` into a new xz/LZMA2 stream.
///
/// # Safety
/// `input_ptr` must point to `input_len` readable bytes; `out_ptr` and
/// `out_len` must be valid for writes.
#[no_mangle]
pub unsafe extern "C" fn lzma2_compress(
    input_ptr: *const u8,
    input_len: size_t,
    out_ptr: *mut *mut u8,
    out_len: *mut size_t,
) -> c_int {
    run(encode, input_ptr, input_len, out_ptr, out_len)
}

/// Decompress a complete xz/LZMA2 stream.
///
/// # Safety
/// Same contract as [`lzma2_compress`].
#[no_mangle]
pub unsafe extern "C" fn lzma2_decompress(
    input_ptr: *const u8,
    input_len: size_t,
    out_ptr: *mut *mut u8,
    out_len: *mut size_t,
) -> c_int {
    run(decode, input_ptr, input_len, out_ptr, out_len)
}

/// Release a buffer returned by [`lzma2_compress`] or [`lzma2_decompress`].
///
/// # Safety
/// `ptr` must be null or a pointer produced by this library that has not
/// been freed yet.
#[no_mangle]
pub unsafe extern "C" fn lzma2_free(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    libc::free(ptr);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(
        f: unsafe extern "C" fn(*const u8, size_t, *mut *mut u8, *mut size_t) -> c_int,
        input: &[u8],
    ) -> Result<Vec<u8>, c_int> {
        let mut out_ptr: *mut u8 = ptr::null_mut();
        let mut out_len: size_t = 0;
        let code = unsafe { f(input.as_ptr(), input.len(), &mut out_ptr, &mut out_len) };
        if code != 0 {
            return Err(code);
        }
        if out_ptr.is_null() {
            return Ok(Vec::new());
        }
        let data = unsafe { slice::from_raw_parts(out_ptr, out_len) }.to_vec();
        unsafe { lzma2_free(out_ptr as *mut c_void) };
        Ok(data)
    }

    #[test]
    fn test_roundtrip() {
        let data = b"LZMA2 roundtrip test payload: The quick brown fox jumps over the lazy dog.";
        let compressed = call(lzma2_compress, data).unwrap();
        assert!(!compressed.is_empty());
        let decompressed = call(lzma2_decompress, &compressed).unwrap();
        assert_eq!(data.as_slice(), decompressed.as_slice());
    }

    #[test]
    fn test_compressible_input_shrinks() {
        let data = vec![b'a'; 64 * 1024];
        let compressed = call(lzma2_compress, &data).unwrap();
        assert!(compressed.len() < data.len() / 10);
        assert_eq!(call(lzma2_decompress, &compressed).unwrap(), data);
    }

    #[test]
    fn test_empty_stream_decodes_to_null() {
        // An xz stream of zero bytes is still a valid, non-empty container
        let compressed = call(lzma2_compress, &[]).unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(call(lzma2_decompress, &compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_corrupt_input_is_io_error() {
        assert_eq!(call(lzma2_decompress, b"definitely not xz"), Err(LZMA2_ERR_IO));
    }

    #[test]
    fn test_null_pointers_rejected() {
        let mut out_ptr: *mut u8 = ptr::null_mut();
        let mut out_len: size_t = 0;
        let code = unsafe { lzma2_compress(ptr::null(), 4, &mut out_ptr, &mut out_len) };
        assert_eq!(code, LZMA2_ERR_NULL_PTR);

        let input = [1u8, 2, 3];
        let code = unsafe { lzma2_decompress(input.as_ptr(), input.len(), ptr::null_mut(), &mut out_len) };
        assert_eq!(code, LZMA2_ERR_NULL_PTR);

        let code = unsafe { lzma2_compress(input.as_ptr(), input.len(), &mut out_ptr, ptr::null_mut()) };
        assert_eq!(code, LZMA2_ERR_NULL_PTR);
    }

    #[test]
    fn test_free_null_is_noop() {
        unsafe { lzma2_free(ptr::null_mut()) };
    }
}
