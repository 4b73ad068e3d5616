//! Shared types for the word VM.
//!
//! - [`Opcode`]: the instruction set, with byte values and mnemonics
//! - [`Word`]: the 256-bit machine word and its arithmetic helpers
//! - [`instructions`]: a decoder that walks bytecode one instruction at a
//!   time, skipping push immediates
//! - [`DecodeError`]: errors from decoding bytes or mnemonics

pub mod bytecode;
pub mod error;
pub mod opcode;
pub mod word;

pub use bytecode::{instructions, Instruction, Instructions};
pub use error::DecodeError;
pub use opcode::Opcode;
pub use word::{Address, Word};
