//! Mutable per-execution state.

use crate::gas::GasMeter;
use crate::memory::Memory;
use crate::stack::Stack;

/// Everything an execution mutates. Owned by exactly one interpreter.
///
/// A frame can be [`reset`](CallFrame::reset) and handed to a new
/// interpreter to run the same program again without reallocating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallFrame {
    pub stack: Stack,
    pub memory: Memory,
    pub gas: GasMeter,
    pub pc: usize,
    /// Output of the most recent nested call.
    pub return_data: Vec<u8>,
}

impl CallFrame {
    pub fn new(gas: u64) -> Self {
        Self {
            stack: Stack::new(),
            memory: Memory::new(),
            gas: GasMeter::new(gas),
            pc: 0,
            return_data: Vec::new(),
        }
    }

    /// Return to the initial state with a fresh gas budget, keeping
    /// allocations.
    pub fn reset(&mut self, gas: u64) {
        self.stack.clear();
        self.memory.clear();
        self.gas.reset(gas);
        self.pc = 0;
        self.return_data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wvm_common::Word;

    #[test]
    fn reset_matches_new() {
        let mut frame = CallFrame::new(100);
        frame.stack.push(Word::one()).unwrap();
        frame.memory.write(0, &[1]);
        frame.gas.charge(40).unwrap();
        frame.pc = 7;
        frame.return_data.push(9);

        frame.reset(50);
        assert_eq!(frame, CallFrame::new(50));
    }
}
