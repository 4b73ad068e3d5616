//! Linear, byte-addressable frame memory.
//!
//! Memory starts empty and grows in whole 32-byte words. It never shrinks
//! during a frame. Growth is priced by the caller: compute the new size
//! with [`Memory::expansion_words`], charge for it, then call
//! [`Memory::ensure`]. Offsets reaching this type have already been checked
//! against the configured memory limit.

use wvm_common::word::WORD_BYTES;

/// Words needed to cover `[offset, offset + size)`. Zero-size ranges need none.
pub fn words_for(offset: usize, size: usize) -> usize {
    if size == 0 {
        0
    } else {
        offset.saturating_add(size).div_ceil(WORD_BYTES)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Memory {
    data: Vec<u8>,
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length in bytes. Always a multiple of 32.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current length in words.
    pub fn words(&self) -> usize {
        self.data.len() / WORD_BYTES
    }

    /// Length in words after covering `[offset, offset + size)`.
    pub fn expansion_words(&self, offset: usize, size: usize) -> usize {
        self.words().max(words_for(offset, size))
    }

    /// Grow to cover `[offset, offset + size)` and return the number of
    /// words added.
    pub fn ensure(&mut self, offset: usize, size: usize) -> usize {
        let current = self.words();
        let target = self.expansion_words(offset, size);
        if target > current {
            self.data.resize(target * WORD_BYTES, 0);
        }
        target - current
    }

    /// Bytes in `[offset, offset + size)`. The range must already be
    /// covered by [`Memory::ensure`]; an uncovered range reads as empty.
    pub fn read(&self, offset: usize, size: usize) -> &[u8] {
        if size == 0 {
            return &[];
        }
        self.data.get(offset..offset + size).unwrap_or_default()
    }

    /// A full word at `offset`.
    pub fn read_word(&self, offset: usize) -> [u8; WORD_BYTES] {
        let mut out = [0u8; WORD_BYTES];
        let bytes = self.read(offset, WORD_BYTES);
        out[..bytes.len()].copy_from_slice(bytes);
        out
    }

    /// Copy `bytes` to `offset`, growing first.
    pub fn write(&mut self, offset: usize, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.ensure(offset, bytes.len());
        self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    /// Write `size` bytes at `offset` taken from `source` starting at
    /// `source_offset`. Bytes past the end of `source` are written as zero.
    pub fn write_padded(&mut self, offset: usize, size: usize, source: &[u8], source_offset: usize) {
        if size == 0 {
            return;
        }
        self.ensure(offset, size);
        let dest = &mut self.data[offset..offset + size];
        let available = source.get(source_offset..).unwrap_or_default();
        let n = available.len().min(size);
        dest[..n].copy_from_slice(&available[..n]);
        dest[n..].fill(0);
    }

    /// Copy `size` bytes from `src` to `dst` within memory. Overlapping
    /// ranges behave as if copied through a temporary buffer.
    pub fn copy_within(&mut self, dst: usize, src: usize, size: usize) {
        if size == 0 {
            return;
        }
        self.ensure(dst, size);
        self.ensure(src, size);
        self.data.copy_within(src..src + size, dst);
    }

    /// Empty memory, keeping its allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let memory = Memory::new();
        assert_eq!(memory.len(), 0);
        assert_eq!(memory.words(), 0);
    }

    #[test]
    fn ensure_rounds_up_to_words() {
        let mut memory = Memory::new();
        assert_eq!(memory.ensure(0, 1), 1);
        assert_eq!(memory.len(), 32);
        assert_eq!(memory.ensure(31, 2), 1);
        assert_eq!(memory.len(), 64);
        assert_eq!(memory.ensure(0, 64), 0);
    }

    #[test]
    fn zero_size_never_grows() {
        let mut memory = Memory::new();
        assert_eq!(memory.ensure(1_000_000, 0), 0);
        assert_eq!(memory.expansion_words(1_000_000, 0), 0);
        assert!(memory.is_empty());
    }

    #[test]
    fn expansion_words_does_not_mutate() {
        let memory = Memory::new();
        assert_eq!(memory.expansion_words(64, 32), 3);
        assert!(memory.is_empty());
    }

    #[test]
    fn write_then_read() {
        let mut memory = Memory::new();
        memory.write(30, &[1, 2, 3, 4]);
        assert_eq!(memory.len(), 64);
        assert_eq!(memory.read(29, 6), &[0, 1, 2, 3, 4, 0]);
    }

    #[test]
    fn read_word_zero_filled() {
        let mut memory = Memory::new();
        memory.write(0, &[0xff]);
        let word = memory.read_word(0);
        assert_eq!(word[0], 0xff);
        assert!(word[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn write_padded_zero_fills_past_source() {
        let mut memory = Memory::new();
        memory.write(0, &[0xaa; 8]);
        memory.write_padded(0, 8, &[1, 2, 3], 1);
        assert_eq!(memory.read(0, 8), &[2, 3, 0, 0, 0, 0, 0, 0]);
        memory.write_padded(0, 2, &[1, 2, 3], 100);
        assert_eq!(memory.read(0, 2), &[0, 0]);
    }

    #[test]
    fn overlapping_copy() {
        let mut memory = Memory::new();
        memory.write(0, &[1, 2, 3, 4]);
        memory.copy_within(1, 0, 4);
        assert_eq!(memory.read(0, 5), &[1, 1, 2, 3, 4]);
    }

    #[test]
    fn clear_resets_length() {
        let mut memory = Memory::new();
        memory.ensure(0, 100);
        memory.clear();
        assert!(memory.is_empty());
    }
}
