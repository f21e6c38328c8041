//! Ownership wrappers for memory that crosses the foreign boundary.

use std::alloc::{handle_alloc_error, Layout};
use std::ptr::{self, NonNull};
use std::slice;

use libc::c_void;

use crate::native::FreeFn;

/// C-heap copy of caller input, alive for one native call.
pub(crate) struct TransientInput {
    ptr: NonNull<u8>,
    len: usize,
}

impl TransientInput {
    /// `input` must not be empty.
    pub(crate) fn copy_from(input: &[u8]) -> Self {
        debug_assert!(!input.is_empty());
        let raw = unsafe { libc::malloc(input.len()) } as *mut u8;
        let Some(ptr) = NonNull::new(raw) else {
            handle_alloc_error(Layout::array::<u8>(input.len()).unwrap_or(Layout::new::<u8>()));
        };
        unsafe { ptr::copy_nonoverlapping(input.as_ptr(), ptr.as_ptr(), input.len()) };
        Self { ptr, len: input.len() }
    }

    pub(crate) fn as_ptr(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

impl Drop for TransientInput {
    fn drop(&mut self) {
        unsafe { libc::free(self.ptr.as_ptr() as *mut c_void) };
    }
}

/// Output buffer still owned by the native library.
///
/// The only way to read it is [`NativeBuffer::into_host`], which consumes the
/// wrapper; dropping it unread releases it as well. Either way the native
/// `free` runs exactly once.
pub struct NativeBuffer {
    ptr: NonNull<u8>,
    len: usize,
    free: FreeFn,
}

impl NativeBuffer {
    /// Take ownership of `ptr`, or `None` if it is null.
    ///
    /// # Safety
    /// A non-null `ptr` must point to `len` readable bytes allocated by the
    /// library that `free` belongs to, and nobody else may release it.
    pub unsafe fn from_raw(ptr: *mut u8, len: usize, free: FreeFn) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr, len, free })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy into host memory, then release the native original.
    pub fn into_host(self) -> Vec<u8> {
        let host = unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }.to_vec();
        drop(self);
        host
    }
}

impl Drop for NativeBuffer {
    fn drop(&mut self) {
        unsafe { (self.free)(self.ptr.as_ptr() as *mut c_void) };
    }
}
