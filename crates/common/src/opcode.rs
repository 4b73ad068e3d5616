//! Opcode definitions for the WVM instruction set.
//!
//! Byte assignments follow the contract-execution instruction set the VM is
//! modeled on. Bytes not listed here are undefined and decode to
//! [`DecodeError::UndefinedOpcode`].

use std::fmt;
use std::str::FromStr;

use crate::error::DecodeError;

/// Identifies the operation to perform.
///
/// The `#[repr(u8)]` attribute pins each variant to its byte value.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opcode {
    // Stop and arithmetic
    /// Halt execution with no return data.
    Stop = 0x00,
    /// Wrapping addition.
    Add = 0x01,
    /// Wrapping multiplication.
    Mul = 0x02,
    /// Wrapping subtraction (top minus second).
    Sub = 0x03,
    /// Unsigned division; zero divisor yields zero.
    Div = 0x04,
    /// Signed division; zero divisor yields zero.
    SDiv = 0x05,
    /// Unsigned remainder; zero modulus yields zero.
    Mod = 0x06,
    /// Signed remainder taking the dividend's sign.
    SMod = 0x07,
    /// (a + b) mod n without intermediate overflow.
    AddMod = 0x08,
    /// (a * b) mod n without intermediate overflow.
    MulMod = 0x09,
    /// Wrapping exponentiation.
    Exp = 0x0a,
    /// Extend the sign of a (b+1)-byte value.
    SignExtend = 0x0b,

    // Comparison and bitwise logic
    Lt = 0x10,
    Gt = 0x11,
    SLt = 0x12,
    SGt = 0x13,
    Eq = 0x14,
    IsZero = 0x15,
    And = 0x16,
    Or = 0x17,
    Xor = 0x18,
    Not = 0x19,
    /// Big-endian byte extraction.
    Byte = 0x1a,
    Shl = 0x1b,
    Shr = 0x1c,
    /// Arithmetic (sign-filling) right shift.
    Sar = 0x1d,

    // Hashing
    /// Keccak-256 of a memory range, computed by the host.
    Sha3 = 0x20,

    // Environment
    Address = 0x30,
    Balance = 0x31,
    Origin = 0x32,
    Caller = 0x33,
    CallValue = 0x34,
    CallDataLoad = 0x35,
    CallDataSize = 0x36,
    CallDataCopy = 0x37,
    CodeSize = 0x38,
    CodeCopy = 0x39,
    GasPrice = 0x3a,
    ExtCodeSize = 0x3b,
    ExtCodeCopy = 0x3c,
    ReturnDataSize = 0x3d,
    ReturnDataCopy = 0x3e,
    ExtCodeHash = 0x3f,

    // Block information
    BlockHash = 0x40,
    Coinbase = 0x41,
    Timestamp = 0x42,
    Number = 0x43,
    PrevRandao = 0x44,
    GasLimit = 0x45,
    ChainId = 0x46,
    SelfBalance = 0x47,
    BaseFee = 0x48,

    // Stack, memory, storage and flow
    Pop = 0x50,
    MLoad = 0x51,
    MStore = 0x52,
    MStore8 = 0x53,
    SLoad = 0x54,
    SStore = 0x55,
    /// Unconditional jump to a JUMPDEST.
    Jump = 0x56,
    /// Conditional jump to a JUMPDEST.
    JumpI = 0x57,
    Pc = 0x58,
    MSize = 0x59,
    Gas = 0x5a,
    /// Marks a valid jump target.
    JumpDest = 0x5b,
    TLoad = 0x5c,
    TStore = 0x5d,
    MCopy = 0x5e,
    Push0 = 0x5f,

    // Push (immediate data follows)
    Push1 = 0x60,
    Push2 = 0x61,
    Push3 = 0x62,
    Push4 = 0x63,
    Push5 = 0x64,
    Push6 = 0x65,
    Push7 = 0x66,
    Push8 = 0x67,
    Push9 = 0x68,
    Push10 = 0x69,
    Push11 = 0x6a,
    Push12 = 0x6b,
    Push13 = 0x6c,
    Push14 = 0x6d,
    Push15 = 0x6e,
    Push16 = 0x6f,
    Push17 = 0x70,
    Push18 = 0x71,
    Push19 = 0x72,
    Push20 = 0x73,
    Push21 = 0x74,
    Push22 = 0x75,
    Push23 = 0x76,
    Push24 = 0x77,
    Push25 = 0x78,
    Push26 = 0x79,
    Push27 = 0x7a,
    Push28 = 0x7b,
    Push29 = 0x7c,
    Push30 = 0x7d,
    Push31 = 0x7e,
    Push32 = 0x7f,

    // Duplication
    Dup1 = 0x80,
    Dup2 = 0x81,
    Dup3 = 0x82,
    Dup4 = 0x83,
    Dup5 = 0x84,
    Dup6 = 0x85,
    Dup7 = 0x86,
    Dup8 = 0x87,
    Dup9 = 0x88,
    Dup10 = 0x89,
    Dup11 = 0x8a,
    Dup12 = 0x8b,
    Dup13 = 0x8c,
    Dup14 = 0x8d,
    Dup15 = 0x8e,
    Dup16 = 0x8f,

    // Exchange
    Swap1 = 0x90,
    Swap2 = 0x91,
    Swap3 = 0x92,
    Swap4 = 0x93,
    Swap5 = 0x94,
    Swap6 = 0x95,
    Swap7 = 0x96,
    Swap8 = 0x97,
    Swap9 = 0x98,
    Swap10 = 0x99,
    Swap11 = 0x9a,
    Swap12 = 0x9b,
    Swap13 = 0x9c,
    Swap14 = 0x9d,
    Swap15 = 0x9e,
    Swap16 = 0x9f,

    // Logging
    Log0 = 0xa0,
    Log1 = 0xa1,
    Log2 = 0xa2,
    Log3 = 0xa3,
    Log4 = 0xa4,

    // System
    /// Recognized but not executed by this core.
    Create = 0xf0,
    Call = 0xf1,
    CallCode = 0xf2,
    /// Halt returning a memory range.
    Return = 0xf3,
    DelegateCall = 0xf4,
    /// Recognized but not executed by this core.
    Create2 = 0xf5,
    StaticCall = 0xfa,
    /// Halt, discarding effects but returning a memory range.
    Revert = 0xfd,
    /// Designated invalid instruction.
    Invalid = 0xfe,
    /// Recognized but not executed by this core.
    SelfDestruct = 0xff,
}

/// All defined opcodes, in byte order. Useful for exhaustive testing.
pub const ALL_OPCODES: [Opcode; 147] = [
    Opcode::Stop,
    Opcode::Add,
    Opcode::Mul,
    Opcode::Sub,
    Opcode::Div,
    Opcode::SDiv,
    Opcode::Mod,
    Opcode::SMod,
    Opcode::AddMod,
    Opcode::MulMod,
    Opcode::Exp,
    Opcode::SignExtend,
    Opcode::Lt,
    Opcode::Gt,
    Opcode::SLt,
    Opcode::SGt,
    Opcode::Eq,
    Opcode::IsZero,
    Opcode::And,
    Opcode::Or,
    Opcode::Xor,
    Opcode::Not,
    Opcode::Byte,
    Opcode::Shl,
    Opcode::Shr,
    Opcode::Sar,
    Opcode::Sha3,
    Opcode::Address,
    Opcode::Balance,
    Opcode::Origin,
    Opcode::Caller,
    Opcode::CallValue,
    Opcode::CallDataLoad,
    Opcode::CallDataSize,
    Opcode::CallDataCopy,
    Opcode::CodeSize,
    Opcode::CodeCopy,
    Opcode::GasPrice,
    Opcode::ExtCodeSize,
    Opcode::ExtCodeCopy,
    Opcode::ReturnDataSize,
    Opcode::ReturnDataCopy,
    Opcode::ExtCodeHash,
    Opcode::BlockHash,
    Opcode::Coinbase,
    Opcode::Timestamp,
    Opcode::Number,
    Opcode::PrevRandao,
    Opcode::GasLimit,
    Opcode::ChainId,
    Opcode::SelfBalance,
    Opcode::BaseFee,
    Opcode::Pop,
    Opcode::MLoad,
    Opcode::MStore,
    Opcode::MStore8,
    Opcode::SLoad,
    Opcode::SStore,
    Opcode::Jump,
    Opcode::JumpI,
    Opcode::Pc,
    Opcode::MSize,
    Opcode::Gas,
    Opcode::JumpDest,
    Opcode::TLoad,
    Opcode::TStore,
    Opcode::MCopy,
    Opcode::Push0,
    Opcode::Push1,
    Opcode::Push2,
    Opcode::Push3,
    Opcode::Push4,
    Opcode::Push5,
    Opcode::Push6,
    Opcode::Push7,
    Opcode::Push8,
    Opcode::Push9,
    Opcode::Push10,
    Opcode::Push11,
    Opcode::Push12,
    Opcode::Push13,
    Opcode::Push14,
    Opcode::Push15,
    Opcode::Push16,
    Opcode::Push17,
    Opcode::Push18,
    Opcode::Push19,
    Opcode::Push20,
    Opcode::Push21,
    Opcode::Push22,
    Opcode::Push23,
    Opcode::Push24,
    Opcode::Push25,
    Opcode::Push26,
    Opcode::Push27,
    Opcode::Push28,
    Opcode::Push29,
    Opcode::Push30,
    Opcode::Push31,
    Opcode::Push32,
    Opcode::Dup1,
    Opcode::Dup2,
    Opcode::Dup3,
    Opcode::Dup4,
    Opcode::Dup5,
    Opcode::Dup6,
    Opcode::Dup7,
    Opcode::Dup8,
    Opcode::Dup9,
    Opcode::Dup10,
    Opcode::Dup11,
    Opcode::Dup12,
    Opcode::Dup13,
    Opcode::Dup14,
    Opcode::Dup15,
    Opcode::Dup16,
    Opcode::Swap1,
    Opcode::Swap2,
    Opcode::Swap3,
    Opcode::Swap4,
    Opcode::Swap5,
    Opcode::Swap6,
    Opcode::Swap7,
    Opcode::Swap8,
    Opcode::Swap9,
    Opcode::Swap10,
    Opcode::Swap11,
    Opcode::Swap12,
    Opcode::Swap13,
    Opcode::Swap14,
    Opcode::Swap15,
    Opcode::Swap16,
    Opcode::Log0,
    Opcode::Log1,
    Opcode::Log2,
    Opcode::Log3,
    Opcode::Log4,
    Opcode::Create,
    Opcode::Call,
    Opcode::CallCode,
    Opcode::Return,
    Opcode::DelegateCall,
    Opcode::Create2,
    Opcode::StaticCall,
    Opcode::Revert,
    Opcode::Invalid,
    Opcode::SelfDestruct,
];

impl TryFrom<u8> for Opcode {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            // Stop and arithmetic
            0x00 => Ok(Opcode::Stop),
            0x01 => Ok(Opcode::Add),
            0x02 => Ok(Opcode::Mul),
            0x03 => Ok(Opcode::Sub),
            0x04 => Ok(Opcode::Div),
            0x05 => Ok(Opcode::SDiv),
            0x06 => Ok(Opcode::Mod),
            0x07 => Ok(Opcode::SMod),
            0x08 => Ok(Opcode::AddMod),
            0x09 => Ok(Opcode::MulMod),
            0x0a => Ok(Opcode::Exp),
            0x0b => Ok(Opcode::SignExtend),

            // Comparison and bitwise logic
            0x10 => Ok(Opcode::Lt),
            0x11 => Ok(Opcode::Gt),
            0x12 => Ok(Opcode::SLt),
            0x13 => Ok(Opcode::SGt),
            0x14 => Ok(Opcode::Eq),
            0x15 => Ok(Opcode::IsZero),
            0x16 => Ok(Opcode::And),
            0x17 => Ok(Opcode::Or),
            0x18 => Ok(Opcode::Xor),
            0x19 => Ok(Opcode::Not),
            0x1a => Ok(Opcode::Byte),
            0x1b => Ok(Opcode::Shl),
            0x1c => Ok(Opcode::Shr),
            0x1d => Ok(Opcode::Sar),

            // Hashing
            0x20 => Ok(Opcode::Sha3),

            // Environment
            0x30 => Ok(Opcode::Address),
            0x31 => Ok(Opcode::Balance),
            0x32 => Ok(Opcode::Origin),
            0x33 => Ok(Opcode::Caller),
            0x34 => Ok(Opcode::CallValue),
            0x35 => Ok(Opcode::CallDataLoad),
            0x36 => Ok(Opcode::CallDataSize),
            0x37 => Ok(Opcode::CallDataCopy),
            0x38 => Ok(Opcode::CodeSize),
            0x39 => Ok(Opcode::CodeCopy),
            0x3a => Ok(Opcode::GasPrice),
            0x3b => Ok(Opcode::ExtCodeSize),
            0x3c => Ok(Opcode::ExtCodeCopy),
            0x3d => Ok(Opcode::ReturnDataSize),
            0x3e => Ok(Opcode::ReturnDataCopy),
            0x3f => Ok(Opcode::ExtCodeHash),

            // Block information
            0x40 => Ok(Opcode::BlockHash),
            0x41 => Ok(Opcode::Coinbase),
            0x42 => Ok(Opcode::Timestamp),
            0x43 => Ok(Opcode::Number),
            0x44 => Ok(Opcode::PrevRandao),
            0x45 => Ok(Opcode::GasLimit),
            0x46 => Ok(Opcode::ChainId),
            0x47 => Ok(Opcode::SelfBalance),
            0x48 => Ok(Opcode::BaseFee),

            // Stack, memory, storage and flow
            0x50 => Ok(Opcode::Pop),
            0x51 => Ok(Opcode::MLoad),
            0x52 => Ok(Opcode::MStore),
            0x53 => Ok(Opcode::MStore8),
            0x54 => Ok(Opcode::SLoad),
            0x55 => Ok(Opcode::SStore),
            0x56 => Ok(Opcode::Jump),
            0x57 => Ok(Opcode::JumpI),
            0x58 => Ok(Opcode::Pc),
            0x59 => Ok(Opcode::MSize),
            0x5a => Ok(Opcode::Gas),
            0x5b => Ok(Opcode::JumpDest),
            0x5c => Ok(Opcode::TLoad),
            0x5d => Ok(Opcode::TStore),
            0x5e => Ok(Opcode::MCopy),
            0x5f => Ok(Opcode::Push0),

            // Push (immediate data follows)
            0x60 => Ok(Opcode::Push1),
            0x61 => Ok(Opcode::Push2),
            0x62 => Ok(Opcode::Push3),
            0x63 => Ok(Opcode::Push4),
            0x64 => Ok(Opcode::Push5),
            0x65 => Ok(Opcode::Push6),
            0x66 => Ok(Opcode::Push7),
            0x67 => Ok(Opcode::Push8),
            0x68 => Ok(Opcode::Push9),
            0x69 => Ok(Opcode::Push10),
            0x6a => Ok(Opcode::Push11),
            0x6b => Ok(Opcode::Push12),
            0x6c => Ok(Opcode::Push13),
            0x6d => Ok(Opcode::Push14),
            0x6e => Ok(Opcode::Push15),
            0x6f => Ok(Opcode::Push16),
            0x70 => Ok(Opcode::Push17),
            0x71 => Ok(Opcode::Push18),
            0x72 => Ok(Opcode::Push19),
            0x73 => Ok(Opcode::Push20),
            0x74 => Ok(Opcode::Push21),
            0x75 => Ok(Opcode::Push22),
            0x76 => Ok(Opcode::Push23),
            0x77 => Ok(Opcode::Push24),
            0x78 => Ok(Opcode::Push25),
            0x79 => Ok(Opcode::Push26),
            0x7a => Ok(Opcode::Push27),
            0x7b => Ok(Opcode::Push28),
            0x7c => Ok(Opcode::Push29),
            0x7d => Ok(Opcode::Push30),
            0x7e => Ok(Opcode::Push31),
            0x7f => Ok(Opcode::Push32),

            // Duplication
            0x80 => Ok(Opcode::Dup1),
            0x81 => Ok(Opcode::Dup2),
            0x82 => Ok(Opcode::Dup3),
            0x83 => Ok(Opcode::Dup4),
            0x84 => Ok(Opcode::Dup5),
            0x85 => Ok(Opcode::Dup6),
            0x86 => Ok(Opcode::Dup7),
            0x87 => Ok(Opcode::Dup8),
            0x88 => Ok(Opcode::Dup9),
            0x89 => Ok(Opcode::Dup10),
            0x8a => Ok(Opcode::Dup11),
            0x8b => Ok(Opcode::Dup12),
            0x8c => Ok(Opcode::Dup13),
            0x8d => Ok(Opcode::Dup14),
            0x8e => Ok(Opcode::Dup15),
            0x8f => Ok(Opcode::Dup16),

            // Exchange
            0x90 => Ok(Opcode::Swap1),
            0x91 => Ok(Opcode::Swap2),
            0x92 => Ok(Opcode::Swap3),
            0x93 => Ok(Opcode::Swap4),
            0x94 => Ok(Opcode::Swap5),
            0x95 => Ok(Opcode::Swap6),
            0x96 => Ok(Opcode::Swap7),
            0x97 => Ok(Opcode::Swap8),
            0x98 => Ok(Opcode::Swap9),
            0x99 => Ok(Opcode::Swap10),
            0x9a => Ok(Opcode::Swap11),
            0x9b => Ok(Opcode::Swap12),
            0x9c => Ok(Opcode::Swap13),
            0x9d => Ok(Opcode::Swap14),
            0x9e => Ok(Opcode::Swap15),
            0x9f => Ok(Opcode::Swap16),

            // Logging
            0xa0 => Ok(Opcode::Log0),
            0xa1 => Ok(Opcode::Log1),
            0xa2 => Ok(Opcode::Log2),
            0xa3 => Ok(Opcode::Log3),
            0xa4 => Ok(Opcode::Log4),

            // System
            0xf0 => Ok(Opcode::Create),
            0xf1 => Ok(Opcode::Call),
            0xf2 => Ok(Opcode::CallCode),
            0xf3 => Ok(Opcode::Return),
            0xf4 => Ok(Opcode::DelegateCall),
            0xf5 => Ok(Opcode::Create2),
            0xfa => Ok(Opcode::StaticCall),
            0xfd => Ok(Opcode::Revert),
            0xfe => Ok(Opcode::Invalid),
            0xff => Ok(Opcode::SelfDestruct),

            // 0x0c..=0x0f, 0x1e..=0x1f, 0x21..=0x2f, 0x49..=0x4f,
            // 0xa5..=0xef, 0xf6..=0xf9, 0xfb..=0xfc
            _ => Err(DecodeError::UndefinedOpcode(value)),
        }
    }
}

impl Opcode {
    /// Returns the assembly mnemonic for this opcode.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Stop => "STOP",
            Opcode::Add => "ADD",
            Opcode::Mul => "MUL",
            Opcode::Sub => "SUB",
            Opcode::Div => "DIV",
            Opcode::SDiv => "SDIV",
            Opcode::Mod => "MOD",
            Opcode::SMod => "SMOD",
            Opcode::AddMod => "ADDMOD",
            Opcode::MulMod => "MULMOD",
            Opcode::Exp => "EXP",
            Opcode::SignExtend => "SIGNEXTEND",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::SLt => "SLT",
            Opcode::SGt => "SGT",
            Opcode::Eq => "EQ",
            Opcode::IsZero => "ISZERO",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Xor => "XOR",
            Opcode::Not => "NOT",
            Opcode::Byte => "BYTE",
            Opcode::Shl => "SHL",
            Opcode::Shr => "SHR",
            Opcode::Sar => "SAR",
            Opcode::Sha3 => "SHA3",
            Opcode::Address => "ADDRESS",
            Opcode::Balance => "BALANCE",
            Opcode::Origin => "ORIGIN",
            Opcode::Caller => "CALLER",
            Opcode::CallValue => "CALLVALUE",
            Opcode::CallDataLoad => "CALLDATALOAD",
            Opcode::CallDataSize => "CALLDATASIZE",
            Opcode::CallDataCopy => "CALLDATACOPY",
            Opcode::CodeSize => "CODESIZE",
            Opcode::CodeCopy => "CODECOPY",
            Opcode::GasPrice => "GASPRICE",
            Opcode::ExtCodeSize => "EXTCODESIZE",
            Opcode::ExtCodeCopy => "EXTCODECOPY",
            Opcode::ReturnDataSize => "RETURNDATASIZE",
            Opcode::ReturnDataCopy => "RETURNDATACOPY",
            Opcode::ExtCodeHash => "EXTCODEHASH",
            Opcode::BlockHash => "BLOCKHASH",
            Opcode::Coinbase => "COINBASE",
            Opcode::Timestamp => "TIMESTAMP",
            Opcode::Number => "NUMBER",
            Opcode::PrevRandao => "PREVRANDAO",
            Opcode::GasLimit => "GASLIMIT",
            Opcode::ChainId => "CHAINID",
            Opcode::SelfBalance => "SELFBALANCE",
            Opcode::BaseFee => "BASEFEE",
            Opcode::Pop => "POP",
            Opcode::MLoad => "MLOAD",
            Opcode::MStore => "MSTORE",
            Opcode::MStore8 => "MSTORE8",
            Opcode::SLoad => "SLOAD",
            Opcode::SStore => "SSTORE",
            Opcode::Jump => "JUMP",
            Opcode::JumpI => "JUMPI",
            Opcode::Pc => "PC",
            Opcode::MSize => "MSIZE",
            Opcode::Gas => "GAS",
            Opcode::JumpDest => "JUMPDEST",
            Opcode::TLoad => "TLOAD",
            Opcode::TStore => "TSTORE",
            Opcode::MCopy => "MCOPY",
            Opcode::Push0 => "PUSH0",
            Opcode::Push1 => "PUSH1",
            Opcode::Push2 => "PUSH2",
            Opcode::Push3 => "PUSH3",
            Opcode::Push4 => "PUSH4",
            Opcode::Push5 => "PUSH5",
            Opcode::Push6 => "PUSH6",
            Opcode::Push7 => "PUSH7",
            Opcode::Push8 => "PUSH8",
            Opcode::Push9 => "PUSH9",
            Opcode::Push10 => "PUSH10",
            Opcode::Push11 => "PUSH11",
            Opcode::Push12 => "PUSH12",
            Opcode::Push13 => "PUSH13",
            Opcode::Push14 => "PUSH14",
            Opcode::Push15 => "PUSH15",
            Opcode::Push16 => "PUSH16",
            Opcode::Push17 => "PUSH17",
            Opcode::Push18 => "PUSH18",
            Opcode::Push19 => "PUSH19",
            Opcode::Push20 => "PUSH20",
            Opcode::Push21 => "PUSH21",
            Opcode::Push22 => "PUSH22",
            Opcode::Push23 => "PUSH23",
            Opcode::Push24 => "PUSH24",
            Opcode::Push25 => "PUSH25",
            Opcode::Push26 => "PUSH26",
            Opcode::Push27 => "PUSH27",
            Opcode::Push28 => "PUSH28",
            Opcode::Push29 => "PUSH29",
            Opcode::Push30 => "PUSH30",
            Opcode::Push31 => "PUSH31",
            Opcode::Push32 => "PUSH32",
            Opcode::Dup1 => "DUP1",
            Opcode::Dup2 => "DUP2",
            Opcode::Dup3 => "DUP3",
            Opcode::Dup4 => "DUP4",
            Opcode::Dup5 => "DUP5",
            Opcode::Dup6 => "DUP6",
            Opcode::Dup7 => "DUP7",
            Opcode::Dup8 => "DUP8",
            Opcode::Dup9 => "DUP9",
            Opcode::Dup10 => "DUP10",
            Opcode::Dup11 => "DUP11",
            Opcode::Dup12 => "DUP12",
            Opcode::Dup13 => "DUP13",
            Opcode::Dup14 => "DUP14",
            Opcode::Dup15 => "DUP15",
            Opcode::Dup16 => "DUP16",
            Opcode::Swap1 => "SWAP1",
            Opcode::Swap2 => "SWAP2",
            Opcode::Swap3 => "SWAP3",
            Opcode::Swap4 => "SWAP4",
            Opcode::Swap5 => "SWAP5",
            Opcode::Swap6 => "SWAP6",
            Opcode::Swap7 => "SWAP7",
            Opcode::Swap8 => "SWAP8",
            Opcode::Swap9 => "SWAP9",
            Opcode::Swap10 => "SWAP10",
            Opcode::Swap11 => "SWAP11",
            Opcode::Swap12 => "SWAP12",
            Opcode::Swap13 => "SWAP13",
            Opcode::Swap14 => "SWAP14",
            Opcode::Swap15 => "SWAP15",
            Opcode::Swap16 => "SWAP16",
            Opcode::Log0 => "LOG0",
            Opcode::Log1 => "LOG1",
            Opcode::Log2 => "LOG2",
            Opcode::Log3 => "LOG3",
            Opcode::Log4 => "LOG4",
            Opcode::Create => "CREATE",
            Opcode::Call => "CALL",
            Opcode::CallCode => "CALLCODE",
            Opcode::Return => "RETURN",
            Opcode::DelegateCall => "DELEGATECALL",
            Opcode::Create2 => "CREATE2",
            Opcode::StaticCall => "STATICCALL",
            Opcode::Revert => "REVERT",
            Opcode::Invalid => "INVALID",
            Opcode::SelfDestruct => "SELFDESTRUCT",
        }
    }

    /// Number of immediate bytes that follow this opcode in the code.
    ///
    /// Only `PUSH1`..=`PUSH32` carry immediates; everything else is 1 byte wide.
    pub fn immediate_size(&self) -> usize {
        let byte = *self as u8;
        if (0x60..=0x7f).contains(&byte) {
            (byte - 0x5f) as usize
        } else {
            0
        }
    }

    /// Returns true for `PUSH0`..=`PUSH32`.
    pub fn is_push(&self) -> bool {
        (0x5f..=0x7f).contains(&(*self as u8))
    }

    /// For `DUPn`, the 1-based depth of the duplicated item.
    pub fn dup_depth(&self) -> Option<usize> {
        let byte = *self as u8;
        (0x80..=0x8f)
            .contains(&byte)
            .then(|| (byte - 0x7f) as usize)
    }

    /// For `SWAPn`, the depth of the item exchanged with the top.
    pub fn swap_depth(&self) -> Option<usize> {
        let byte = *self as u8;
        (0x90..=0x9f)
            .contains(&byte)
            .then(|| (byte - 0x8f) as usize)
    }

    /// For `LOGn`, the number of topics.
    pub fn log_topics(&self) -> Option<usize> {
        let byte = *self as u8;
        (0xa0..=0xa4)
            .contains(&byte)
            .then(|| (byte - 0xa0) as usize)
    }

    /// Returns true if this opcode always ends execution of the frame.
    pub fn is_terminator(&self) -> bool {
        matches!(
            self,
            Opcode::Stop
                | Opcode::Return
                | Opcode::Revert
                | Opcode::Invalid
                | Opcode::SelfDestruct
        )
    }

    /// Returns false for opcodes the interpreter decodes but never executes.
    ///
    /// Account creation and destruction belong to the orchestrating host, so
    /// `CREATE`, `CREATE2` and `SELFDESTRUCT` fault as invalid when reached.
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            Opcode::Create | Opcode::Create2 | Opcode::SelfDestruct
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = DecodeError;

    /// Parse a mnemonic, case-insensitively. `KECCAK256` is accepted as an
    /// alias of `SHA3` and `DIFFICULTY` as an alias of `PREVRANDAO`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        match upper.as_str() {
            "KECCAK256" => return Ok(Opcode::Sha3),
            "DIFFICULTY" => return Ok(Opcode::PrevRandao),
            _ => {}
        }
        ALL_OPCODES
            .iter()
            .copied()
            .find(|op| op.mnemonic() == upper)
            .ok_or(DecodeError::UnknownMnemonic(s.to_string()))
    }
}
