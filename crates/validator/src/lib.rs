//! WVM validator: static analysis for bytecode.
//!
//! [`JumpDestinations::analyze`] is the control-flow analysis the
//! interpreter depends on. [`validate`] additionally runs strict checks
//! that the interpreter itself tolerates at runtime (an undefined byte only
//! faults if reached, a truncated push reads zeros). It collects ALL
//! errors, not just the first.
//!
//! # Usage
//!
//! ```
//! use wvm_validator::validate;
//!
//! // PUSH1 0x04, JUMP, INVALID, JUMPDEST, STOP
//! let analysis = validate(&[0x60, 0x04, 0x56, 0xfe, 0x5b, 0x00]).unwrap();
//! assert!(analysis.jump_destinations.contains(4));
//! assert_eq!(analysis.instruction_count, 5);
//! ```
//!
//! # Passes
//!
//! 1. **Limits**: code size
//! 2. **Opcodes**: undefined bytes, unsupported opcodes, truncated pushes

pub mod error;
pub mod jumpdest;
pub mod limits;
pub mod opcodes;

pub use error::ValidationError;
pub use jumpdest::JumpDestinations;
pub use limits::MAX_CODE_SIZE;

use tracing::debug;
use wvm_common::instructions;

/// Facts about a piece of code that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub jump_destinations: JumpDestinations,
    /// Number of instructions, counting each push with its immediate as one.
    pub instruction_count: usize,
}

/// Validate `code`.
///
/// Returns the [`Analysis`] if every check passes, or all errors found.
pub fn validate(code: &[u8]) -> Result<Analysis, Vec<ValidationError>> {
    let mut all_errors = Vec::new();

    // Pass 1: Limits
    all_errors.extend(limits::check_limits(code));

    // Pass 2: Opcodes
    all_errors.extend(opcodes::check_opcodes(code));

    if !all_errors.is_empty() {
        debug!(
            code_len = code.len(),
            errors = all_errors.len(),
            "validation failed"
        );
        return Err(all_errors);
    }

    let analysis = Analysis {
        jump_destinations: JumpDestinations::analyze(code),
        instruction_count: instructions(code).count(),
    };
    debug!(
        code_len = code.len(),
        instructions = analysis.instruction_count,
        jump_destinations = analysis.jump_destinations.len(),
        "validation passed"
    );
    Ok(analysis)
}
