//! The capability interface between the interpreter and the world state.
//!
//! The interpreter owns stack, memory, gas and control flow. Everything
//! else (accounts, storage, logs, hashing, nested calls) is reached through
//! a [`Host`].

use wvm_common::{Address, Word};

use crate::outcome::ExecutionOutcome;

/// Which call opcode produced a [`CallRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
}

/// A nested call, fully resolved by the calling frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    pub kind: CallKind,
    /// Storage context of the callee.
    pub address: Address,
    /// `CALLER` as seen by the callee.
    pub caller: Address,
    /// Account whose code runs.
    pub code_address: Address,
    /// `CALLVALUE` as seen by the callee. Transferred from `caller` to
    /// `address` only for [`CallKind::Call`].
    pub value: Word,
    pub input: Vec<u8>,
    /// Gas handed to the callee, stipend included.
    pub gas: u64,
    pub is_static: bool,
    pub depth: usize,
}

/// Result of a nested call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    pub outcome: ExecutionOutcome,
    /// Gas the callee consumed out of [`CallRequest::gas`].
    pub gas_used: u64,
}

/// World-state services used by the interpreter.
pub trait Host {
    fn sload(&mut self, address: Address, key: Word) -> Word;
    fn sstore(&mut self, address: Address, key: Word, value: Word);

    fn tload(&mut self, address: Address, key: Word) -> Word;
    fn tstore(&mut self, address: Address, key: Word, value: Word);

    fn balance(&mut self, address: Address) -> Word;
    fn code_size(&mut self, address: Address) -> usize;
    /// Keccak-256 of the account's code, or zero for an empty account.
    fn code_hash(&mut self, address: Address) -> Word;
    fn code(&mut self, address: Address) -> Vec<u8>;

    /// Hash of a recent block. Only called for the 256 blocks preceding
    /// the current one.
    fn block_hash(&mut self, number: u64) -> Word;

    fn log(&mut self, address: Address, topics: &[Word], data: &[u8]);

    fn keccak256(&mut self, data: &[u8]) -> Word;

    fn call(&mut self, request: CallRequest) -> CallResult;
}
