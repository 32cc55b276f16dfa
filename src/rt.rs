//! A small runtime that executes emitted machine code.
//!
//! Code is written into a writable anonymous mapping, then the mapping is
//! sealed read-execute (`W^X`) before a function pointer into it is handed
//! out. The mapping is sized to fit the compiled Brainfuck program, which
//! for larger sources can exceed a single page.

use core::ffi::c_void;
use core::num::NonZeroUsize;
use nix::sys::mman::{mmap, mprotect, munmap, MapFlags, ProtFlags};

const PAGE_SIZE: usize = 4096;

fn round_up_to_page(len: usize) -> usize {
    (len + PAGE_SIZE - 1) / PAGE_SIZE * PAGE_SIZE
}

/// A `mmap`ed runtime with an executable code page.
pub struct Runtime {
    buf: *mut c_void,
    len: usize,
}

impl Runtime {
    /// Create a new, empty [`Runtime`].
    pub fn new() -> Runtime {
        Runtime {
            buf: std::ptr::null_mut(),
            len: 0,
        }
    }

    /// Copy `code` into a fresh anonymous mapping, seal it read-execute and
    /// reinterpret the mapping as `F`.
    ///
    /// # Safety
    ///
    /// The caller must ensure `F` matches the calling convention and
    /// signature that `code` actually implements.
    pub unsafe fn add_code<F>(&mut self, code: impl AsRef<[u8]>) -> F {
        let code = code.as_ref();
        let map_len = NonZeroUsize::new(round_up_to_page(code.len()).max(PAGE_SIZE)).unwrap();
        let buf = unsafe {
            mmap(
                None,
                map_len,
                ProtFlags::PROT_WRITE,
                MapFlags::MAP_PRIVATE | MapFlags::MAP_ANONYMOUS,
                0, /* fd */
                0, /* off */
            )
            .expect("failed to mmap runtime code buffer")
        };

        // Copy over code.
        unsafe { std::ptr::copy_nonoverlapping(code.as_ptr(), buf.cast(), code.len()) };

        unsafe {
            // Remove write permissions from the code buffer and allow
            // read-execute from it.
            mprotect(buf, map_len.get(), ProtFlags::PROT_READ | ProtFlags::PROT_EXEC)
                .expect("failed to mprotect Runtime code buffer to RX");
        }

        self.buf = buf;
        self.len = map_len.get();

        unsafe { std::mem::transmute_copy(&self.buf) }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if !self.buf.is_null() {
            unsafe {
                munmap(self.buf, self.len).expect("failed to munmap Runtime code buffer");
            }
        }
    }
}
