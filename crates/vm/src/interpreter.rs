//! The fetch-decode-execute loop and opcode handlers.
//!
//! One step:
//!
//! 1. If the program counter is at or past the end of the code, stop.
//! 2. Fetch the byte and look up its [`OpInfo`].
//! 3. Charge the base gas.
//! 4. Check the stack against the descriptor.
//! 5. Run the handler, which charges any dynamic gas before mutating.
//!
//! A halt (normal or fault) is final: later calls to [`Interpreter::step`]
//! return the same outcome without running anything.

use tracing::{debug, trace};
use wvm_common::word::{self, WORD_BYTES};
use wvm_common::{Opcode, Word};

use crate::config::Config;
use crate::env::CallContext;
use crate::error::Fault;
use crate::frame::CallFrame;
use crate::host::{CallKind, CallRequest, Host};
use crate::memory::Memory;
use crate::outcome::{ExecutionOutcome, Status};
use crate::program::Program;
use crate::stack::{Stack, STACK_LIMIT};
use crate::table::OpInfo;

/// Number of blocks before the current one that `BLOCKHASH` can see.
const BLOCK_HASH_WINDOW: u64 = 256;

/// What the loop does after a handler returns.
enum Flow {
    /// Advance past the instruction and its immediate.
    Next,
    /// Continue at a validated jump destination.
    Jump(usize),
    /// End the frame.
    Halt(Status, Vec<u8>),
}

/// Executes one frame of one program.
pub struct Interpreter<'a> {
    program: &'a Program,
    context: &'a CallContext<'a>,
    config: &'a Config,
    frame: CallFrame,
    outcome: Option<ExecutionOutcome>,
}

impl<'a> Interpreter<'a> {
    /// A fresh frame with `gas` to spend.
    pub fn new(
        program: &'a Program,
        context: &'a CallContext<'a>,
        config: &'a Config,
        gas: u64,
    ) -> Self {
        Self::with_frame(program, context, config, CallFrame::new(gas))
    }

    /// Run on a caller-supplied frame, typically one recovered with
    /// [`Interpreter::into_frame`] and then [`CallFrame::reset`].
    pub fn with_frame(
        program: &'a Program,
        context: &'a CallContext<'a>,
        config: &'a Config,
        frame: CallFrame,
    ) -> Self {
        Self {
            program,
            context,
            config,
            frame,
            outcome: None,
        }
    }

    /// Step until the frame halts.
    pub fn run<H: Host + ?Sized>(&mut self, host: &mut H) -> ExecutionOutcome {
        loop {
            if let Some(outcome) = self.step(host) {
                return outcome;
            }
        }
    }

    /// Execute one instruction. Returns the outcome once the frame has halted.
    pub fn step<H: Host + ?Sized>(&mut self, host: &mut H) -> Option<ExecutionOutcome> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }

        let program = self.program;
        let config = self.config;
        let code = program.code();
        let pc = self.frame.pc;
        let Some(&byte) = code.get(pc) else {
            return Some(self.halt(Status::Stop, Vec::new()));
        };
        let info = config.table.get(byte);

        match self.execute(byte, info, host) {
            Ok(Flow::Next) => {
                let width = info.opcode.map_or(0, |op| op.immediate_size());
                self.frame.pc = (pc + 1 + width).min(code.len());
                None
            }
            Ok(Flow::Jump(target)) => {
                self.frame.pc = target;
                None
            }
            Ok(Flow::Halt(status, output)) => Some(self.halt(status, output)),
            Err(fault) => Some(self.halt(Status::Fault(fault), Vec::new())),
        }
    }

    pub fn pc(&self) -> usize {
        self.frame.pc
    }

    pub fn stack(&self) -> &Stack {
        &self.frame.stack
    }

    pub fn memory(&self) -> &Memory {
        &self.frame.memory
    }

    pub fn gas_remaining(&self) -> u64 {
        self.frame.gas.remaining()
    }

    pub fn return_data(&self) -> &[u8] {
        &self.frame.return_data
    }

    pub fn frame(&self) -> &CallFrame {
        &self.frame
    }

    /// The outcome, if the frame has halted.
    pub fn outcome(&self) -> Option<&ExecutionOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_halted(&self) -> bool {
        self.outcome.is_some()
    }

    /// Give the frame back for reuse.
    pub fn into_frame(self) -> CallFrame {
        self.frame
    }

    fn halt(&mut self, status: Status, output: Vec<u8>) -> ExecutionOutcome {
        let outcome = ExecutionOutcome {
            status,
            output,
            gas_remaining: self.frame.gas.remaining(),
            pc: self.frame.pc,
        };
        debug!(
            %status,
            pc = outcome.pc,
            gas_remaining = outcome.gas_remaining,
            output_len = outcome.output.len(),
            depth = self.context.depth,
            "halted"
        );
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn execute<H: Host + ?Sized>(
        &mut self,
        byte: u8,
        info: &OpInfo,
        host: &mut H,
    ) -> Result<Flow, Fault> {
        let Some(opcode) = info.opcode else {
            return Err(Fault::InvalidOpcode(byte));
        };

        trace!(
            pc = self.frame.pc,
            %opcode,
            gas = self.frame.gas.remaining(),
            depth = self.frame.stack.len(),
            "step"
        );

        self.frame.gas.charge(info.base_gas)?;

        let depth = self.frame.stack.len();
        if depth < info.min_stack {
            return Err(Fault::StackUnderflow);
        }
        if depth - info.min_stack + info.pushes() > STACK_LIMIT {
            return Err(Fault::StackOverflow);
        }

        self.dispatch(opcode, host)
    }

    fn dispatch<H: Host + ?Sized>(&mut self, opcode: Opcode, host: &mut H) -> Result<Flow, Fault> {
        use Opcode::*;

        if let Some(n) = opcode.dup_depth() {
            self.frame.stack.dup(n - 1)?;
            return Ok(Flow::Next);
        }
        if let Some(n) = opcode.swap_depth() {
            self.frame.stack.swap(n)?;
            return Ok(Flow::Next);
        }
        if let Some(n) = opcode.log_topics() {
            return self.op_log(n, host);
        }
        if opcode.is_push() {
            return self.op_push(opcode.immediate_size());
        }

        let program = self.program;
        let ctx = self.context;
        let env = ctx.env;

        match opcode {
            Stop => return Ok(Flow::Halt(Status::Stop, Vec::new())),

            // Arithmetic
            Add => self.binary(word::add)?,
            Mul => self.binary(word::mul)?,
            Sub => self.binary(word::sub)?,
            Div => self.binary(word::div)?,
            SDiv => self.binary(word::sdiv)?,
            Mod => self.binary(word::rem)?,
            SMod => self.binary(word::smod)?,
            AddMod => self.ternary(word::addmod)?,
            MulMod => self.ternary(word::mulmod)?,
            Exp => self.op_exp()?,
            SignExtend => self.binary(word::signextend)?,

            // Comparison and bitwise logic
            Lt => self.binary(word::lt)?,
            Gt => self.binary(word::gt)?,
            SLt => self.binary(word::slt)?,
            SGt => self.binary(word::sgt)?,
            Eq => self.binary(|a, b| word::from_bool(a == b))?,
            IsZero => self.unary(|a| word::from_bool(a.is_zero()))?,
            And => self.binary(|a, b| a & b)?,
            Or => self.binary(|a, b| a | b)?,
            Xor => self.binary(|a, b| a ^ b)?,
            Not => self.unary(|a| !a)?,
            Byte => self.binary(word::byte)?,
            Shl => self.binary(word::shl)?,
            Shr => self.binary(word::shr)?,
            Sar => self.binary(word::sar)?,

            Sha3 => self.op_sha3(host)?,

            // Environment
            Address => self.push(word::from_address(ctx.address))?,
            Balance => {
                let address = word::to_address(self.pop()?);
                self.push(host.balance(address))?;
            }
            Origin => self.push(word::from_address(env.origin))?,
            Caller => self.push(word::from_address(ctx.caller))?,
            CallValue => self.push(ctx.value)?,
            CallDataLoad => {
                let offset = word::to_usize(self.pop()?).unwrap_or(usize::MAX);
                self.push(word::load_padded(ctx.input, offset))?;
            }
            CallDataSize => self.push(Word::from(ctx.input.len()))?,
            CallDataCopy => self.op_copy(ctx.input)?,
            CodeSize => self.push(Word::from(program.len()))?,
            CodeCopy => self.op_copy(program.code())?,
            GasPrice => self.push(env.gas_price)?,
            ExtCodeSize => {
                let address = word::to_address(self.pop()?);
                self.push(Word::from(host.code_size(address)))?;
            }
            ExtCodeCopy => self.op_ext_code_copy(host)?,
            ReturnDataSize => self.push(Word::from(self.frame.return_data.len()))?,
            ReturnDataCopy => self.op_return_data_copy()?,
            ExtCodeHash => {
                let address = word::to_address(self.pop()?);
                self.push(host.code_hash(address))?;
            }

            // Block information
            BlockHash => {
                let number = word::saturating_u64(self.pop()?);
                let hash = if number < env.number && env.number - number <= BLOCK_HASH_WINDOW {
                    host.block_hash(number)
                } else {
                    Word::zero()
                };
                self.push(hash)?;
            }
            Coinbase => self.push(word::from_address(env.coinbase))?,
            Timestamp => self.push(Word::from(env.timestamp))?,
            Number => self.push(Word::from(env.number))?,
            PrevRandao => self.push(env.prevrandao)?,
            GasLimit => self.push(Word::from(env.gas_limit))?,
            ChainId => self.push(Word::from(env.chain_id))?,
            SelfBalance => self.push(host.balance(ctx.address))?,
            BaseFee => self.push(env.base_fee)?,

            // Stack, memory, storage and flow
            Pop => {
                self.pop()?;
            }
            MLoad => {
                let [offset] = self.args()?;
                let (offset, _) = self.memory_access(&[(offset, Word::from(WORD_BYTES))])?;
                let value = Word::from_big_endian(&self.frame.memory.read_word(offset));
                self.frame.stack.drop_top(1)?;
                self.push(value)?;
            }
            MStore => {
                let [offset, value] = self.args()?;
                let (offset, _) = self.memory_access(&[(offset, Word::from(WORD_BYTES))])?;
                self.frame.stack.drop_top(2)?;
                self.frame.memory.write(offset, &word::to_be_bytes(value));
            }
            MStore8 => {
                let [offset, value] = self.args()?;
                let (offset, _) = self.memory_access(&[(offset, Word::one())])?;
                self.frame.stack.drop_top(2)?;
                self.frame.memory.write(offset, &[value.byte(0)]);
            }
            SLoad => {
                let key = self.pop()?;
                self.push(host.sload(ctx.address, key))?;
            }
            SStore => self.op_sstore(host)?,
            Jump => {
                let [target] = self.args()?;
                let target = self.jump_target(target)?;
                self.frame.stack.drop_top(1)?;
                return Ok(Flow::Jump(target));
            }
            JumpI => {
                let [target, condition] = self.args()?;
                if condition.is_zero() {
                    self.frame.stack.drop_top(2)?;
                } else {
                    let target = self.jump_target(target)?;
                    self.frame.stack.drop_top(2)?;
                    return Ok(Flow::Jump(target));
                }
            }
            Pc => self.push(Word::from(self.frame.pc))?,
            MSize => self.push(Word::from(self.frame.memory.len()))?,
            Gas => self.push(Word::from(self.frame.gas.remaining()))?,
            JumpDest => {}
            TLoad => {
                let key = self.pop()?;
                self.push(host.tload(ctx.address, key))?;
            }
            TStore => {
                self.require_mutable()?;
                let [key, value] = self.args()?;
                self.frame.stack.drop_top(2)?;
                host.tstore(ctx.address, key, value);
            }
            MCopy => {
                let [dst, src, size] = self.args()?;
                let ranges = self.checked_ranges(&[(dst, size), (src, size)])?;
                self.expand(&ranges, self.config.schedule.copy_cost(ranges[0].1))?;
                self.frame.stack.drop_top(3)?;
                self.frame
                    .memory
                    .copy_within(ranges[0].0, ranges[1].0, ranges[0].1);
            }

            // System
            Call => return self.op_call(CallKind::Call, host),
            CallCode => return self.op_call(CallKind::CallCode, host),
            DelegateCall => return self.op_call(CallKind::DelegateCall, host),
            StaticCall => return self.op_call(CallKind::StaticCall, host),
            Return | Revert => {
                let [offset, size] = self.args()?;
                let (offset, size) = self.memory_access(&[(offset, size)])?;
                let output = self.frame.memory.read(offset, size).to_vec();
                self.frame.stack.drop_top(2)?;
                let status = if opcode == Return {
                    Status::Return
                } else {
                    Status::Revert
                };
                return Ok(Flow::Halt(status, output));
            }
            Invalid => return Err(Fault::InvalidOpcode(Invalid as u8)),

            // Push, dup, swap and log are handled above. Unsupported opcodes
            // have no table entry and never reach dispatch.
            _ => return Err(Fault::InvalidOpcode(opcode as u8)),
        }

        Ok(Flow::Next)
    }

    // ------------------------------------------------------------------
    // Stack helpers
    // ------------------------------------------------------------------

    fn push(&mut self, value: Word) -> Result<(), Fault> {
        self.frame.stack.push(value)
    }

    fn pop(&mut self) -> Result<Word, Fault> {
        self.frame.stack.pop()
    }

    /// The top `N` words without removing them, top first. Handlers with
    /// dynamic costs read their operands this way and drop them only after
    /// the charge succeeds.
    fn args<const N: usize>(&self) -> Result<[Word; N], Fault> {
        let mut out = [Word::zero(); N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.frame.stack.peek(i)?;
        }
        Ok(out)
    }

    fn unary(&mut self, f: impl FnOnce(Word) -> Word) -> Result<(), Fault> {
        let a = self.pop()?;
        self.push(f(a))
    }

    fn binary(&mut self, f: impl FnOnce(Word, Word) -> Word) -> Result<(), Fault> {
        let a = self.pop()?;
        let b = self.pop()?;
        self.push(f(a, b))
    }

    fn ternary(&mut self, f: impl FnOnce(Word, Word, Word) -> Word) -> Result<(), Fault> {
        let a = self.pop()?;
        let b = self.pop()?;
        let c = self.pop()?;
        self.push(f(a, b, c))
    }

    // ------------------------------------------------------------------
    // Memory helpers
    // ------------------------------------------------------------------

    /// Convert `(offset, size)` pairs to native ranges, rejecting any that
    /// reach past the memory limit. Zero-size ranges become `(0, 0)` and
    /// ignore their offset.
    fn checked_ranges<const N: usize>(
        &self,
        ranges: &[(Word, Word); N],
    ) -> Result<[(usize, usize); N], Fault> {
        let limit = self.config.memory_limit;
        let mut out = [(0, 0); N];
        for (slot, &(offset, size)) in out.iter_mut().zip(ranges) {
            if size.is_zero() {
                continue;
            }
            let offset = word::to_usize(offset)
                .filter(|&o| o <= limit)
                .ok_or(Fault::MemoryLimitExceeded)?;
            let size = word::to_usize(size)
                .filter(|&s| s <= limit - offset)
                .ok_or(Fault::MemoryLimitExceeded)?;
            *slot = (offset, size);
        }
        Ok(out)
    }

    /// Charge `extra` plus the cost of growing memory to cover every range
    /// as one amount, then grow.
    fn expand(&mut self, ranges: &[(usize, usize)], extra: u64) -> Result<(), Fault> {
        let memory = &self.frame.memory;
        let current = memory.words();
        let target = ranges
            .iter()
            .map(|&(offset, size)| memory.expansion_words(offset, size))
            .max()
            .unwrap_or(current);
        let cost = self
            .config
            .schedule
            .memory_expansion_cost(current, target)
            .saturating_add(extra);
        self.frame.gas.charge(cost)?;
        for &(offset, size) in ranges {
            self.frame.memory.ensure(offset, size);
        }
        Ok(())
    }

    /// Check, price and grow for a single range.
    fn memory_access(&mut self, range: &[(Word, Word); 1]) -> Result<(usize, usize), Fault> {
        let [range] = self.checked_ranges(range)?;
        self.expand(&[range], 0)?;
        Ok(range)
    }

    // ------------------------------------------------------------------
    // Handlers
    // ------------------------------------------------------------------

    fn op_push(&mut self, width: usize) -> Result<Flow, Fault> {
        let program = self.program;
        let code = program.code();
        let start = (self.frame.pc + 1).min(code.len());
        let end = (start + width).min(code.len());
        let value = word::from_push_data(&code[start..end], width);
        self.push(value)?;
        Ok(Flow::Next)
    }

    fn op_exp(&mut self) -> Result<(), Fault> {
        let [base, exponent] = self.args()?;
        let cost = self
            .config
            .schedule
            .exp_byte
            .saturating_mul(word::byte_len(exponent) as u64);
        self.frame.gas.charge(cost)?;
        self.frame.stack.drop_top(2)?;
        self.push(word::exp(base, exponent))
    }

    fn op_sha3<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), Fault> {
        let [offset, size] = self.args()?;
        let [range] = self.checked_ranges(&[(offset, size)])?;
        self.expand(&[range], self.config.schedule.sha3_cost(range.1))?;
        let hash = host.keccak256(self.frame.memory.read(range.0, range.1));
        self.frame.stack.drop_top(2)?;
        self.push(hash)
    }

    /// `CALLDATACOPY` and `CODECOPY`: `[dest, source offset, size]`.
    fn op_copy(&mut self, source: &[u8]) -> Result<(), Fault> {
        let [dest, source_offset, size] = self.args()?;
        let [range] = self.checked_ranges(&[(dest, size)])?;
        self.expand(&[range], self.config.schedule.copy_cost(range.1))?;
        let source_offset = word::to_usize(source_offset).unwrap_or(usize::MAX);
        self.frame.stack.drop_top(3)?;
        self.frame
            .memory
            .write_padded(range.0, range.1, source, source_offset);
        Ok(())
    }

    fn op_ext_code_copy<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), Fault> {
        let [address, dest, source_offset, size] = self.args()?;
        let [range] = self.checked_ranges(&[(dest, size)])?;
        self.expand(&[range], self.config.schedule.copy_cost(range.1))?;
        let code = host.code(word::to_address(address));
        let source_offset = word::to_usize(source_offset).unwrap_or(usize::MAX);
        self.frame.stack.drop_top(4)?;
        self.frame
            .memory
            .write_padded(range.0, range.1, &code, source_offset);
        Ok(())
    }

    fn op_return_data_copy(&mut self) -> Result<(), Fault> {
        let [dest, source_offset, size] = self.args()?;
        let available = self.frame.return_data.len();
        let in_bounds = match (word::to_usize(source_offset), word::to_usize(size)) {
            (Some(offset), Some(size)) => offset
                .checked_add(size)
                .map_or(false, |end| end <= available),
            _ => false,
        };
        if !in_bounds {
            return Err(Fault::ReturnDataOutOfBounds);
        }
        let [range] = self.checked_ranges(&[(dest, size)])?;
        self.expand(&[range], self.config.schedule.copy_cost(range.1))?;
        let source_offset = word::to_usize(source_offset).unwrap_or(usize::MAX);
        self.frame.stack.drop_top(3)?;
        let frame = &mut self.frame;
        frame
            .memory
            .write_padded(range.0, range.1, &frame.return_data, source_offset);
        Ok(())
    }

    /// `SSTORE` pops the value (top) and then the key.
    fn op_sstore<H: Host + ?Sized>(&mut self, host: &mut H) -> Result<(), Fault> {
        self.require_mutable()?;
        let config = self.config;
        let schedule = &config.schedule;
        if self.frame.gas.remaining() <= schedule.sstore_sentry {
            return Err(Fault::OutOfGas);
        }
        let [value, key] = self.args()?;
        let address = self.context.address;
        let current = host.sload(address, key);
        let cost = if current == value {
            schedule.sload
        } else if current.is_zero() {
            schedule.sstore_set
        } else {
            schedule.sstore_reset
        };
        self.frame.gas.charge(cost)?;
        self.frame.stack.drop_top(2)?;
        host.sstore(address, key, value);
        Ok(())
    }

    fn op_log<H: Host + ?Sized>(&mut self, topics: usize, host: &mut H) -> Result<Flow, Fault> {
        self.require_mutable()?;
        let [offset, size] = self.args()?;
        let [range] = self.checked_ranges(&[(offset, size)])?;
        let data_cost = self
            .config
            .schedule
            .log_data
            .saturating_mul(range.1 as u64);
        self.expand(&[range], data_cost)?;
        let mut words = Vec::with_capacity(topics);
        for i in 0..topics {
            words.push(self.frame.stack.peek(2 + i)?);
        }
        self.frame.stack.drop_top(2 + topics)?;
        host.log(
            self.context.address,
            &words,
            self.frame.memory.read(range.0, range.1),
        );
        Ok(Flow::Next)
    }

    fn op_call<H: Host + ?Sized>(&mut self, kind: CallKind, host: &mut H) -> Result<Flow, Fault> {
        let ctx = self.context;
        let config = self.config;
        let schedule = &config.schedule;

        let has_value = matches!(kind, CallKind::Call | CallKind::CallCode);
        let (arity, gas, target, value, input, output) = if has_value {
            let [gas, target, value, in_offset, in_size, out_offset, out_size] = self.args()?;
            (7, gas, target, value, (in_offset, in_size), (out_offset, out_size))
        } else {
            let [gas, target, in_offset, in_size, out_offset, out_size] = self.args()?;
            (6, gas, target, Word::zero(), (in_offset, in_size), (out_offset, out_size))
        };

        let transfers_value = has_value && !value.is_zero();
        if kind == CallKind::Call && transfers_value && ctx.is_static {
            return Err(Fault::StaticStateChange);
        }

        let ranges = self.checked_ranges(&[input, output])?;
        let value_cost = if transfers_value {
            schedule.call_value
        } else {
            0
        };
        self.expand(&ranges, value_cost)?;

        let remaining = self.frame.gas.remaining();
        let forwarded = word::saturating_u64(gas).min(remaining - remaining / 64);
        let stipend = if transfers_value {
            schedule.call_stipend
        } else {
            0
        };

        let target = word::to_address(target);
        let call_input = self.frame.memory.read(ranges[0].0, ranges[0].1).to_vec();
        self.frame.stack.drop_top(arity)?;

        if ctx.depth >= config.call_depth_limit {
            self.frame.return_data.clear();
            self.push(Word::zero())?;
            return Ok(Flow::Next);
        }

        let (address, caller, apparent_value) = match kind {
            CallKind::Call => (target, ctx.address, value),
            CallKind::CallCode => (ctx.address, ctx.address, value),
            CallKind::DelegateCall => (ctx.address, ctx.caller, ctx.value),
            CallKind::StaticCall => (target, ctx.address, Word::zero()),
        };
        let request = CallRequest {
            kind,
            address,
            caller,
            code_address: target,
            value: apparent_value,
            input: call_input,
            gas: forwarded + stipend,
            is_static: ctx.is_static || kind == CallKind::StaticCall,
            depth: ctx.depth + 1,
        };

        let result = host.call(request);
        self.frame
            .gas
            .charge(result.gas_used.saturating_sub(stipend).min(forwarded))?;

        let success = result.outcome.is_success();
        let (out_offset, out_size) = ranges[1];
        let output = &result.outcome.output;
        let copied = output.len().min(out_size);
        self.frame.memory.write(out_offset, &output[..copied]);
        self.frame.return_data = result.outcome.output;
        self.push(word::from_bool(success))?;
        Ok(Flow::Next)
    }

    // ------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------

    fn jump_target(&self, target: Word) -> Result<usize, Fault> {
        if !self.program.is_valid_jump(target) {
            return Err(Fault::InvalidJumpDestination(target));
        }
        word::to_usize(target).ok_or(Fault::InvalidJumpDestination(target))
    }

    fn require_mutable(&self) -> Result<(), Fault> {
        if self.context.is_static {
            Err(Fault::StaticStateChange)
        } else {
            Ok(())
        }
    }
}
