//! A self-contained [`Host`] backed by hash maps.
//!
//! Used by [`execute`](crate::execute), the tests, the benchmarks and the
//! CLI. Nested calls run on a fresh [`Interpreter`] per frame against this
//! same host; a call that does not succeed rolls back its state changes.
//!
//! Each nested frame recurses on the native stack. Every
//! [`FRAMES_PER_THREAD`] levels the next frame starts on its own thread with
//! a [`FRAME_THREAD_STACK`] byte stack, so the full call depth fits no matter
//! how small the calling thread's stack is.

use std::collections::HashMap;
use std::panic;
use std::thread;

use sha3::{Digest, Keccak256};
use tracing::{debug, warn};
use wvm_common::{Address, Word};

use crate::config::Config;
use crate::env::{CallContext, Environment};
use crate::host::{CallKind, CallRequest, CallResult, Host};
use crate::interpreter::Interpreter;
use crate::outcome::{ExecutionOutcome, Status};
use crate::program::Program;

/// Nesting levels that share one native thread.
pub const FRAMES_PER_THREAD: usize = 8;

/// Stack size of a thread started for a nested frame.
pub const FRAME_THREAD_STACK: usize = 4 * 1024 * 1024;

/// One account's balance and code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub balance: Word,
    pub code: Program,
}

/// A storage write, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageWrite {
    pub address: Address,
    pub key: Word,
    pub value: Word,
}

/// An emitted log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub address: Address,
    pub topics: Vec<Word>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
struct State {
    accounts: HashMap<Address, Account>,
    storage: HashMap<(Address, Word), Word>,
    transient: HashMap<(Address, Word), Word>,
    storage_writes: Vec<StorageWrite>,
    logs: Vec<LogRecord>,
}

/// Reference host with all state in memory.
#[derive(Debug, Clone)]
pub struct InMemoryHost<'c> {
    config: &'c Config,
    env: Environment,
    state: State,
    block_hashes: HashMap<u64, Word>,
}

impl InMemoryHost<'static> {
    /// A host using the shared default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::shared())
    }
}

impl Default for InMemoryHost<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'c> InMemoryHost<'c> {
    /// A host whose nested calls run under `config`.
    pub fn with_config(config: &'c Config) -> Self {
        Self {
            config,
            env: Environment::default(),
            state: State::default(),
            block_hashes: HashMap::new(),
        }
    }

    /// Environment seen by nested frames.
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = env;
        self
    }

    /// Install an account with `code` and `balance`.
    pub fn insert_account(&mut self, address: Address, balance: Word, code: impl Into<Program>) {
        self.state.accounts.insert(
            address,
            Account {
                balance,
                code: code.into(),
            },
        );
    }

    pub fn set_balance(&mut self, address: Address, balance: Word) {
        self.state.accounts.entry(address).or_default().balance = balance;
    }

    pub fn set_storage(&mut self, address: Address, key: Word, value: Word) {
        self.state.storage.insert((address, key), value);
    }

    pub fn set_block_hash(&mut self, number: u64, hash: Word) {
        self.block_hashes.insert(number, hash);
    }

    pub fn storage(&self, address: Address, key: Word) -> Word {
        self.state
            .storage
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    /// Every storage write that was not rolled back, oldest first.
    pub fn storage_writes(&self) -> &[StorageWrite] {
        &self.state.storage_writes
    }

    pub fn logs(&self) -> &[LogRecord] {
        &self.state.logs
    }

    /// Clear transient storage, as happens between transactions.
    pub fn clear_transient(&mut self) {
        self.state.transient.clear();
    }

    fn transfer(&mut self, from: Address, to: Address, value: Word) -> bool {
        if value.is_zero() {
            return true;
        }
        let from_balance = self.balance(from);
        if from_balance < value {
            return false;
        }
        self.set_balance(from, from_balance - value);
        let to_balance = self.balance(to);
        self.set_balance(to, to_balance.overflowing_add(value).0);
        true
    }

    /// Run a nested frame, on a fresh thread when its depth starts a new
    /// segment. `None` means the thread could not be started.
    fn run_frame(
        &mut self,
        program: &Program,
        context: &CallContext<'_>,
        gas: u64,
    ) -> Option<ExecutionOutcome> {
        let config = self.config;
        if context.depth % FRAMES_PER_THREAD != 0 {
            return Some(Interpreter::new(program, context, config, gas).run(self));
        }
        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name(format!("wvm-depth-{}", context.depth))
                .stack_size(FRAME_THREAD_STACK)
                .spawn_scoped(scope, || {
                    Interpreter::new(program, context, config, gas).run(self)
                });
            match spawned {
                Ok(handle) => match handle.join() {
                    Ok(outcome) => Some(outcome),
                    Err(payload) => panic::resume_unwind(payload),
                },
                Err(error) => {
                    warn!(depth = context.depth, %error, "cannot start frame thread");
                    None
                }
            }
        })
    }
}

/// A call that never started: nothing ran and no gas was used.
fn failed_call(gas: u64) -> CallResult {
    CallResult {
        outcome: ExecutionOutcome {
            status: Status::Revert,
            output: Vec::new(),
            gas_remaining: gas,
            pc: 0,
        },
        gas_used: 0,
    }
}

impl Host for InMemoryHost<'_> {
    fn sload(&mut self, address: Address, key: Word) -> Word {
        self.storage(address, key)
    }

    fn sstore(&mut self, address: Address, key: Word, value: Word) {
        self.state.storage.insert((address, key), value);
        self.state
            .storage_writes
            .push(StorageWrite { address, key, value });
    }

    fn tload(&mut self, address: Address, key: Word) -> Word {
        self.state
            .transient
            .get(&(address, key))
            .copied()
            .unwrap_or_default()
    }

    fn tstore(&mut self, address: Address, key: Word, value: Word) {
        self.state.transient.insert((address, key), value);
    }

    fn balance(&mut self, address: Address) -> Word {
        self.state
            .accounts
            .get(&address)
            .map(|account| account.balance)
            .unwrap_or_default()
    }

    fn code_size(&mut self, address: Address) -> usize {
        self.state
            .accounts
            .get(&address)
            .map_or(0, |account| account.code.len())
    }

    fn code_hash(&mut self, address: Address) -> Word {
        let code = self.code(address);
        if code.is_empty() && !self.state.accounts.contains_key(&address) {
            return Word::zero();
        }
        self.keccak256(&code)
    }

    fn code(&mut self, address: Address) -> Vec<u8> {
        self.state
            .accounts
            .get(&address)
            .map(|account| account.code.code().to_vec())
            .unwrap_or_default()
    }

    fn block_hash(&mut self, number: u64) -> Word {
        self.block_hashes.get(&number).copied().unwrap_or_default()
    }

    fn log(&mut self, address: Address, topics: &[Word], data: &[u8]) {
        self.state.logs.push(LogRecord {
            address,
            topics: topics.to_vec(),
            data: data.to_vec(),
        });
    }

    fn keccak256(&mut self, data: &[u8]) -> Word {
        Word::from_big_endian(&Keccak256::digest(data))
    }

    fn call(&mut self, request: CallRequest) -> CallResult {
        if request.depth > self.config.call_depth_limit {
            return failed_call(request.gas);
        }

        let checkpoint = self.state.clone();

        if request.kind == CallKind::Call
            && !self.transfer(request.caller, request.address, request.value)
        {
            debug!(depth = request.depth, "call failed: insufficient balance");
            return failed_call(request.gas);
        }

        let program = self
            .state
            .accounts
            .get(&request.code_address)
            .map(|account| account.code.clone())
            .unwrap_or_default();

        let env = self.env.clone();
        let context = CallContext {
            address: request.address,
            caller: request.caller,
            value: request.value,
            input: &request.input,
            env: &env,
            is_static: request.is_static,
            depth: request.depth,
        };
        let Some(outcome) = self.run_frame(&program, &context, request.gas) else {
            self.state = checkpoint;
            return failed_call(request.gas);
        };

        if !outcome.is_success() {
            self.state = checkpoint;
        }
        let gas_used = match outcome.status {
            Status::Fault(_) => request.gas,
            _ => request.gas - outcome.gas_remaining,
        };
        debug!(
            depth = request.depth,
            kind = ?request.kind,
            status = %outcome.status,
            gas_used,
            "nested call finished"
        );
        CallResult { outcome, gas_used }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keccak_of_empty_input() {
        let mut host = InMemoryHost::new();
        let expected = Word::from_big_endian(&[
            0xc5, 0xd2, 0x46, 0x01, 0x86, 0xf7, 0x23, 0x3c, 0x92, 0x7e, 0x7d, 0xb2, 0xdc, 0xc7,
            0x03, 0xc0, 0xe5, 0x00, 0xb6, 0x53, 0xca, 0x82, 0x27, 0x3b, 0x7b, 0xfa, 0xd8, 0x04,
            0x5d, 0x85, 0xa4, 0x70,
        ]);
        assert_eq!(host.keccak256(&[]), expected);
    }

    #[test]
    fn storage_writes_are_recorded() {
        let mut host = InMemoryHost::new();
        let address = Address::repeat_byte(1);
        host.sstore(address, Word::one(), Word::from(2));
        assert_eq!(host.sload(address, Word::one()), Word::from(2));
        assert_eq!(
            host.storage_writes(),
            &[StorageWrite {
                address,
                key: Word::one(),
                value: Word::from(2),
            }]
        );
    }

    #[test]
    fn unknown_account_is_empty() {
        let mut host = InMemoryHost::new();
        let nobody = Address::repeat_byte(9);
        assert_eq!(host.balance(nobody), Word::zero());
        assert_eq!(host.code_size(nobody), 0);
        assert_eq!(host.code_hash(nobody), Word::zero());
    }

    #[test]
    fn call_to_empty_account_succeeds() {
        let mut host = InMemoryHost::new();
        let result = host.call(CallRequest {
            kind: CallKind::Call,
            address: Address::repeat_byte(2),
            caller: Address::zero(),
            code_address: Address::repeat_byte(2),
            value: Word::zero(),
            input: Vec::new(),
            gas: 1000,
            is_static: false,
            depth: 1,
        });
        assert_eq!(result.outcome.status, Status::Stop);
        assert_eq!(result.gas_used, 0);
    }

    #[test]
    fn value_transfer_without_funds_fails() {
        let mut host = InMemoryHost::new();
        let result = host.call(CallRequest {
            kind: CallKind::Call,
            address: Address::repeat_byte(2),
            caller: Address::repeat_byte(1),
            code_address: Address::repeat_byte(2),
            value: Word::from(5),
            input: Vec::new(),
            gas: 1000,
            is_static: false,
            depth: 1,
        });
        assert_eq!(result.outcome.status, Status::Revert);
    }

    #[test]
    fn transient_storage_clears() {
        let mut host = InMemoryHost::new();
        host.tstore(Address::zero(), Word::one(), Word::one());
        assert_eq!(host.tload(Address::zero(), Word::one()), Word::one());
        host.clear_transient();
        assert_eq!(host.tload(Address::zero(), Word::one()), Word::zero());
    }
}
