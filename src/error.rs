//! The crate's error type, covering every fatal condition the pipeline can hit.

use thiserror::Error;

/// Any fatal condition raised while compiling or running a Brainfuck program.
#[derive(Debug, Error)]
pub enum Error {
    /// The source file could not be opened or read.
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    /// A syntax error in the source, reported at its originating byte offset.
    #[error("syntax error at offset {pos}: {message}")]
    Syntax { pos: usize, message: String },

    /// A fatal error raised by the emitter, e.g. an unresolved jump target or
    /// an exhausted code buffer.
    #[error("emitter error: {message}")]
    Emitter { message: String },
}
