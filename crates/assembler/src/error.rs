//! Error types for the WVM assembler.

use thiserror::Error;

/// Errors produced while assembling text into bytecode. Lines are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A mnemonic that names no opcode.
    #[error("line {line}: unknown mnemonic '{token}'")]
    UnknownMnemonic { line: usize, token: String },

    /// A `PUSHn` or `DB` without its immediate.
    #[error("line {line}: {mnemonic} expects an immediate")]
    MissingImmediate { line: usize, mnemonic: &'static str },

    /// A numeric literal that could not be parsed.
    #[error("line {line}: invalid number '{token}'")]
    InvalidNumber { line: usize, token: String },

    /// An immediate wider than the instruction allows.
    #[error("line {line}: {mnemonic} immediate does not fit in {width} byte(s)")]
    ImmediateTooLarge {
        line: usize,
        mnemonic: &'static str,
        width: usize,
    },

    /// A token where none was expected.
    #[error("line {line}: unexpected token '{token}'")]
    UnexpectedToken { line: usize, token: String },
}
