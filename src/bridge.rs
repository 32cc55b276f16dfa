//! `extern "C"` entry points the JIT-compiled code calls into for `.`/`,`.
//!
//! These are the only functions the compiled Brainfuck program ever calls
//! out to; both are traced at `trace!` level, which is ambient
//! observability and changes no behavior.

use std::io::{Read, Write};

/// Write one byte to stdout and flush immediately, matching the original
/// runtime's unbuffered `putchar`/`fflush` pair.
pub extern "C" fn bf_put(c: u8) {
    log::trace!("bf_put({c:#04x})");
    let mut stdout = std::io::stdout();
    stdout
        .write_all(&[c])
        .expect("failed to write to stdout");
    stdout.flush().expect("failed to flush stdout");
}

/// Read one byte from stdin, EOF -> 0.
pub extern "C" fn bf_get() -> i32 {
    let mut buf = [0u8; 1];
    let byte = match std::io::stdin().read(&mut buf) {
        Ok(0) | Err(_) => 0,
        Ok(_) => buf[0],
    };
    log::trace!("bf_get() -> {byte:#04x}");
    byte as i32
}
