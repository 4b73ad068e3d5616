//! Validation errors.
//!
//! Every positional error carries the byte offset (`at`) of the offending
//! instruction. The validator collects all errors, not just the first.

use thiserror::Error;
use wvm_common::Opcode;

/// Problems found by static analysis of bytecode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Code exceeds the maximum deployable size.
    #[error("code is {size} bytes, limit is {limit}")]
    CodeTooLarge { size: usize, limit: usize },

    /// A byte outside push data that names no opcode.
    #[error("undefined opcode {byte:#04x} at offset {at}")]
    UndefinedOpcode { at: usize, byte: u8 },

    /// A recognized opcode that the interpreter does not execute.
    #[error("unsupported opcode {opcode} at offset {at}")]
    UnsupportedOpcode { at: usize, opcode: Opcode },

    /// A push whose immediate runs past the end of the code.
    #[error("{opcode} at offset {at} is missing {missing} immediate byte(s)")]
    TruncatedPush {
        at: usize,
        opcode: Opcode,
        missing: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = ValidationError::UndefinedOpcode { at: 3, byte: 0x0c };
        assert_eq!(e.to_string(), "undefined opcode 0x0c at offset 3");

        let e = ValidationError::TruncatedPush {
            at: 0,
            opcode: Opcode::Push2,
            missing: 1,
        };
        assert_eq!(
            e.to_string(),
            "PUSH2 at offset 0 is missing 1 immediate byte(s)"
        );

        let e = ValidationError::CodeTooLarge {
            size: 30000,
            limit: 24576,
        };
        assert_eq!(e.to_string(), "code is 30000 bytes, limit is 24576");
    }
}
