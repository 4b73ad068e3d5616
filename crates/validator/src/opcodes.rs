//! Per-instruction checks: undefined bytes, unsupported opcodes and
//! truncated push immediates.

use crate::error::ValidationError;
use wvm_common::instructions;

/// Run the opcode checks over every instruction outside push data.
pub fn check_opcodes(code: &[u8]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for instr in instructions(code) {
        let Some(opcode) = instr.opcode else {
            errors.push(ValidationError::UndefinedOpcode {
                at: instr.pc,
                byte: instr.byte,
            });
            continue;
        };

        if !opcode.is_supported() {
            errors.push(ValidationError::UnsupportedOpcode {
                at: instr.pc,
                opcode,
            });
        }

        if instr.is_truncated() {
            errors.push(ValidationError::TruncatedPush {
                at: instr.pc,
                opcode,
                missing: instr.immediate_size() - instr.immediate.len(),
            });
        }
    }

    errors
}
