//! The jump table: one descriptor per opcode byte.
//!
//! Built once from a [`GasSchedule`] and shared read-only by every
//! interpreter using the same [`Config`](crate::Config). The interpreter
//! consults it to charge base gas and to check the stack before the
//! handler runs, so handlers never see a short or overfull stack.

use crate::gas::GasSchedule;
use wvm_common::Opcode;

/// Static facts about one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpInfo {
    /// The handler to run. `None` means the byte faults as invalid.
    pub opcode: Option<Opcode>,
    /// Words that must be on the stack.
    pub min_stack: usize,
    /// Net change in stack depth.
    pub stack_delta: isize,
    /// Gas charged before the handler. Dynamic costs come on top.
    pub base_gas: u64,
}

impl OpInfo {
    const INVALID: OpInfo = OpInfo {
        opcode: None,
        min_stack: 0,
        stack_delta: 0,
        base_gas: 0,
    };

    /// Words pushed by the operation.
    pub fn pushes(&self) -> usize {
        (self.min_stack as isize + self.stack_delta) as usize
    }
}

/// Descriptors for all 256 byte values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpTable {
    entries: [OpInfo; 256],
}

impl JumpTable {
    pub fn new(schedule: &GasSchedule) -> Self {
        let mut entries = [OpInfo::INVALID; 256];
        for &opcode in wvm_common::opcode::ALL_OPCODES.iter() {
            if !opcode.is_supported() {
                continue;
            }
            let (pops, pushes) = stack_io(opcode);
            entries[opcode as usize] = OpInfo {
                opcode: Some(opcode),
                min_stack: pops,
                stack_delta: pushes as isize - pops as isize,
                base_gas: base_gas(opcode, schedule),
            };
        }
        Self { entries }
    }

    pub fn get(&self, byte: u8) -> &OpInfo {
        &self.entries[byte as usize]
    }
}

impl Default for JumpTable {
    fn default() -> Self {
        Self::new(&GasSchedule::default())
    }
}

/// (words popped, words pushed)
fn stack_io(opcode: Opcode) -> (usize, usize) {
    use Opcode::*;

    if let Some(n) = opcode.dup_depth() {
        return (n, n + 1);
    }
    if let Some(n) = opcode.swap_depth() {
        return (n + 1, n + 1);
    }
    if let Some(n) = opcode.log_topics() {
        return (n + 2, 0);
    }
    if opcode.is_push() {
        return (0, 1);
    }

    match opcode {
        Stop | JumpDest | Invalid => (0, 0),
        Add | Mul | Sub | Div | SDiv | Mod | SMod | Exp | SignExtend => (2, 1),
        AddMod | MulMod => (3, 1),
        Lt | Gt | SLt | SGt | Eq | And | Or | Xor | Byte | Shl | Shr | Sar => (2, 1),
        IsZero | Not => (1, 1),
        Sha3 => (2, 1),
        Address | Origin | Caller | CallValue | CallDataSize | CodeSize | GasPrice
        | ReturnDataSize => (0, 1),
        Balance | CallDataLoad | ExtCodeSize | ExtCodeHash | BlockHash => (1, 1),
        CallDataCopy | CodeCopy | ReturnDataCopy | MCopy => (3, 0),
        ExtCodeCopy => (4, 0),
        Coinbase | Timestamp | Number | PrevRandao | GasLimit | ChainId | SelfBalance
        | BaseFee => (0, 1),
        Pop | Jump => (1, 0),
        MLoad | SLoad | TLoad => (1, 1),
        MStore | MStore8 | SStore | TStore | JumpI => (2, 0),
        Pc | MSize | Gas => (0, 1),
        Call | CallCode => (7, 1),
        DelegateCall | StaticCall => (6, 1),
        Return | Revert => (2, 0),
        // Unsupported; never installed in the table.
        _ => (0, 0),
    }
}

fn base_gas(opcode: Opcode, s: &GasSchedule) -> u64 {
    use Opcode::*;

    if opcode.dup_depth().is_some() || opcode.swap_depth().is_some() {
        return s.very_low;
    }
    if let Some(n) = opcode.log_topics() {
        return s.log + s.log_topic * n as u64;
    }
    if opcode == Push0 {
        return s.base;
    }
    if opcode.is_push() {
        return s.very_low;
    }

    match opcode {
        Stop | Return | Revert | Invalid | SStore => s.zero,
        Add | Sub | Lt | Gt | SLt | SGt | Eq | IsZero | And | Or | Xor | Not | Byte | Shl
        | Shr | Sar | CallDataLoad | MLoad | MStore | MStore8 | CallDataCopy | CodeCopy
        | ReturnDataCopy | MCopy => s.very_low,
        Mul | Div | SDiv | Mod | SMod | SignExtend | SelfBalance => s.low,
        AddMod | MulMod | Jump => s.mid,
        Exp | JumpI => s.high,
        Sha3 => s.sha3,
        Address | Origin | Caller | CallValue | CallDataSize | CodeSize | GasPrice
        | ReturnDataSize | Coinbase | Timestamp | Number | PrevRandao | GasLimit | ChainId
        | BaseFee | Pop | Pc | MSize | Gas => s.base,
        Balance => s.balance,
        ExtCodeSize | ExtCodeCopy | ExtCodeHash => s.ext_code,
        BlockHash => s.blockhash,
        SLoad => s.sload,
        JumpDest => s.jumpdest,
        TLoad | TStore => s.transient,
        Call | CallCode | DelegateCall | StaticCall => s.call,
        _ => s.zero,
    }
}
