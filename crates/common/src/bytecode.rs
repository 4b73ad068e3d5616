//! Linear walking of raw bytecode.
//!
//! Bytecode is a flat byte string with no header. Most instructions are a
//! single byte; `PUSHn` is followed by `n` bytes of immediate data that are
//! never themselves executed. Every consumer that needs instruction
//! boundaries (jump analysis, static checks, disassembly) walks the code
//! through [`Instructions`] so the skip rule lives in exactly one place.

use crate::opcode::Opcode;

/// One instruction position in a bytecode buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction<'a> {
    /// Offset of the opcode byte.
    pub pc: usize,
    /// The raw opcode byte.
    pub byte: u8,
    /// Decoded opcode, or `None` for an undefined byte.
    pub opcode: Option<Opcode>,
    /// Immediate bytes actually present in the code. Shorter than the
    /// declared width when a push runs past the end of the code.
    pub immediate: &'a [u8],
}

impl Instruction<'_> {
    /// Declared number of immediate bytes (0 unless this is `PUSH1`..=`PUSH32`).
    pub fn immediate_size(&self) -> usize {
        self.opcode.map_or(0, |op| op.immediate_size())
    }

    /// True if the code ended before the declared immediate was complete.
    pub fn is_truncated(&self) -> bool {
        self.immediate.len() < self.immediate_size()
    }

    /// Offset of the next instruction, clamped to the code length.
    pub fn next_pc(&self) -> usize {
        self.pc + 1 + self.immediate.len()
    }
}

/// Iterator over the instructions of a bytecode buffer.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    code: &'a [u8],
    pc: usize,
}

impl<'a> Instructions<'a> {
    /// Walk `code` from offset 0.
    pub fn new(code: &'a [u8]) -> Self {
        Self { code, pc: 0 }
    }
}

impl<'a> Iterator for Instructions<'a> {
    type Item = Instruction<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let byte = *self.code.get(self.pc)?;
        let opcode = Opcode::try_from(byte).ok();
        let width = opcode.map_or(0, |op| op.immediate_size());

        let start = self.pc + 1;
        let end = (start + width).min(self.code.len());
        let instr = Instruction {
            pc: self.pc,
            byte,
            opcode,
            immediate: &self.code[start..end],
        };

        self.pc = end;
        Some(instr)
    }
}

/// Convenience constructor for [`Instructions`].
pub fn instructions(code: &[u8]) -> Instructions<'_> {
    Instructions::new(code)
}
