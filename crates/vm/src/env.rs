//! Execution context: the block and transaction a frame runs in, and the
//! call that started the frame.

use wvm_common::{Address, Word};

/// Transaction and block values exposed by the environment opcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub origin: Address,
    pub gas_price: Word,
    pub coinbase: Address,
    pub timestamp: u64,
    pub number: u64,
    pub prevrandao: Word,
    pub gas_limit: u64,
    pub chain_id: u64,
    pub base_fee: Word,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            origin: Address::zero(),
            gas_price: Word::zero(),
            coinbase: Address::zero(),
            timestamp: 0,
            number: 0,
            prevrandao: Word::zero(),
            gas_limit: 30_000_000,
            chain_id: 1,
            base_fee: Word::zero(),
        }
    }
}

/// The frame-level context of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext<'a> {
    /// Account whose storage the frame reads and writes.
    pub address: Address,
    pub caller: Address,
    /// Value sent with the call.
    pub value: Word,
    pub input: &'a [u8],
    pub env: &'a Environment,
    /// Set inside `STATICCALL`: state changes fault.
    pub is_static: bool,
    /// Call nesting depth, 0 for the outermost frame.
    pub depth: usize,
}

impl<'a> CallContext<'a> {
    /// A top-level, non-static call with zero addresses and no value.
    pub fn new(input: &'a [u8], env: &'a Environment) -> Self {
        Self {
            address: Address::zero(),
            caller: env.origin,
            value: Word::zero(),
            input,
            env,
            is_static: false,
            depth: 0,
        }
    }

    pub fn with_address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    pub fn with_caller(mut self, caller: Address) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_value(mut self, value: Word) -> Self {
        self.value = value;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }
}
