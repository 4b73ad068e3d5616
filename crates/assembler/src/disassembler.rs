//! Disassembler: bytecode to canonical assembly text.
//!
//! One instruction per line, no comments. `PUSHn` immediates are written as
//! `0x` followed by exactly `2n` hex digits. Bytes that do not decode to a
//! complete instruction (undefined opcodes and the tail of a push cut short
//! by the end of the code) are written one per line as `DB 0x..`.

use crate::parser::DATA_BYTE;
use wvm_common::instructions;

pub fn disassemble(code: &[u8]) -> String {
    let mut text = String::new();
    for instr in instructions(code) {
        match instr.opcode {
            Some(opcode) if !instr.is_truncated() => {
                text.push_str(opcode.mnemonic());
                if !instr.immediate.is_empty() {
                    text.push_str(" 0x");
                    text.push_str(&hex::encode(instr.immediate));
                }
                text.push('\n');
            }
            _ => {
                text.push_str(&format!("{DATA_BYTE} 0x{:02x}\n", instr.byte));
                for byte in instr.immediate {
                    text.push_str(&format!("{DATA_BYTE} 0x{byte:02x}\n"));
                }
            }
        }
    }
    text
}
