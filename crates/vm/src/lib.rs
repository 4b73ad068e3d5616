//! WVM: a gas-metered stack machine over 256-bit words.
//!
//! The machine has:
//! - An operand stack of up to 1024 words
//! - Linear memory that grows in 32-byte words and is paid for in gas
//! - A jump table that fixes every opcode's stack effect and base cost
//! - A [`Host`] for storage, accounts, logs, hashing and nested calls
//!
//! Execution never panics and never returns an error: every run ends in an
//! [`ExecutionOutcome`] whose [`Status`] is `Stop`, `Return`, `Revert` or a
//! [`Fault`].
//!
//! # Usage
//!
//! ```
//! use wvm_vm::{execute, Status};
//!
//! // PUSH1 1, PUSH1 2, ADD, POP, STOP
//! let code = [0x60, 0x01, 0x60, 0x02, 0x01, 0x50, 0x00];
//! let outcome = execute(&code, &[], 10_000);
//! assert_eq!(outcome.status, Status::Stop);
//! assert_eq!(outcome.gas_remaining, 10_000 - 11);
//! ```
//!
//! For repeated execution of one program, build a [`Program`] once and run
//! it through [`Interpreter`] with a reused [`CallFrame`].

pub mod config;
pub mod env;
pub mod error;
pub mod frame;
pub mod gas;
pub mod host;
pub mod in_memory;
pub mod interpreter;
pub mod memory;
pub mod outcome;
pub mod program;
pub mod stack;
pub mod table;

pub use config::Config;
pub use env::{CallContext, Environment};
pub use error::Fault;
pub use frame::CallFrame;
pub use gas::{GasMeter, GasSchedule};
pub use host::{CallKind, CallRequest, CallResult, Host};
pub use in_memory::InMemoryHost;
pub use interpreter::Interpreter;
pub use memory::Memory;
pub use outcome::{ExecutionOutcome, Status};
pub use program::Program;
pub use stack::{Stack, STACK_LIMIT};
pub use table::{JumpTable, OpInfo};

/// Run `bytecode` with `input` as call data and `gas_budget` gas.
///
/// Uses the shared default [`Config`], a default [`Environment`] and a
/// fresh [`InMemoryHost`].
pub fn execute(bytecode: &[u8], input: &[u8], gas_budget: u64) -> ExecutionOutcome {
    let config = Config::shared();
    let program = Program::new(bytecode);
    let env = Environment::default();
    let context = CallContext::new(input, &env);
    let mut host = InMemoryHost::new();
    Interpreter::new(&program, &context, config, gas_budget).run(&mut host)
}
