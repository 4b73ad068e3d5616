//! Faults raised during execution.
//!
//! A fault halts the current frame immediately. It never unwinds past the
//! interpreter: the loop turns it into [`Status::Fault`](crate::Status) and
//! records the program counter in the outcome.

use thiserror::Error;
use wvm_common::Word;

/// Conditions that abort execution of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Fault {
    /// A push would exceed the 1024-slot stack.
    #[error("stack overflow")]
    StackOverflow,

    /// An operation needed more operands than the stack holds.
    #[error("stack underflow")]
    StackUnderflow,

    /// Remaining gas could not cover the next charge.
    #[error("out of gas")]
    OutOfGas,

    /// The byte at the program counter is undefined, unsupported, or the
    /// designated `INVALID` instruction.
    #[error("invalid opcode {0:#04x}")]
    InvalidOpcode(u8),

    /// A jump targeted an offset that is not a `JUMPDEST` outside push data.
    #[error("invalid jump destination {0}")]
    InvalidJumpDestination(Word),

    /// A memory offset or size exceeded the configured ceiling.
    #[error("memory limit exceeded")]
    MemoryLimitExceeded,

    /// `RETURNDATACOPY` read past the end of the return data buffer.
    #[error("return data out of bounds")]
    ReturnDataOutOfBounds,

    /// A state-changing operation ran inside a static call.
    #[error("state change in static context")]
    StaticStateChange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Fault::OutOfGas.to_string(), "out of gas");
        assert_eq!(Fault::InvalidOpcode(0xfe).to_string(), "invalid opcode 0xfe");
        assert_eq!(
            Fault::InvalidJumpDestination(Word::from(7)).to_string(),
            "invalid jump destination 7"
        );
    }
}
