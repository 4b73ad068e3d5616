//! Jump destination analysis.
//!
//! A byte offset is a valid jump target iff it holds `JUMPDEST` and is not
//! part of a push immediate. The set is computed in one linear pass and
//! stored as a bit per code byte, so membership is O(1).

use bitvec::prelude::*;
use wvm_common::{instructions, word, Opcode, Word};

/// The valid jump targets of one bytecode buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpDestinations {
    bits: BitVec<u64, Lsb0>,
}

impl JumpDestinations {
    /// Scan `code` once, skipping push immediates.
    pub fn analyze(code: &[u8]) -> Self {
        let mut bits = bitvec![u64, Lsb0; 0; code.len()];
        for instr in instructions(code) {
            if instr.opcode == Some(Opcode::JumpDest) {
                bits.set(instr.pc, true);
            }
        }
        Self { bits }
    }

    /// True if `pc` is a jump destination.
    pub fn contains(&self, pc: usize) -> bool {
        self.bits.get(pc).map_or(false, |bit| *bit)
    }

    /// True if a stack word names a jump destination. Words too large for
    /// an offset are never valid.
    pub fn is_valid_target(&self, target: Word) -> bool {
        word::to_usize(target).map_or(false, |pc| self.contains(pc))
    }

    /// Number of jump destinations.
    pub fn len(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// Destinations in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_has_no_destinations() {
        let dests = JumpDestinations::analyze(&[]);
        assert!(dests.is_empty());
        assert!(!dests.contains(0));
    }

    #[test]
    fn plain_jumpdest() {
        // PUSH1 0x03, JUMP, JUMPDEST
        let dests = JumpDestinations::analyze(&[0x60, 0x03, 0x56, 0x5b]);
        assert_eq!(dests.iter().collect::<Vec<_>>(), vec![3]);
        assert!(dests.contains(3));
        assert!(!dests.contains(2));
    }

    #[test]
    fn jumpdest_byte_inside_push_data_is_excluded() {
        // PUSH2 0x5b5b, JUMPDEST
        let dests = JumpDestinations::analyze(&[0x61, 0x5b, 0x5b, 0x5b]);
        assert!(!dests.contains(1));
        assert!(!dests.contains(2));
        assert!(dests.contains(3));
        assert_eq!(dests.len(), 1);
    }

    #[test]
    fn truncated_push_swallows_tail() {
        // PUSH4 with only two bytes present, both 0x5b
        let dests = JumpDestinations::analyze(&[0x63, 0x5b, 0x5b]);
        assert!(dests.is_empty());
    }

    #[test]
    fn out_of_range_targets() {
        let dests = JumpDestinations::analyze(&[0x5b]);
        assert!(dests.contains(0));
        assert!(!dests.contains(1));
        assert!(dests.is_valid_target(Word::zero()));
        assert!(!dests.is_valid_target(Word::MAX));
        assert!(!dests.is_valid_target(Word::one() << 64));
    }
}
