//! The operand stack.

use crate::error::Fault;
use wvm_common::Word;

/// Maximum number of words on the stack.
pub const STACK_LIMIT: usize = 1024;

/// A bounded LIFO of words. Index 0 in `peek`, `dup` and `swap` is the top.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack {
    data: Vec<Word>,
}

impl Stack {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(STACK_LIMIT),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, value: Word) -> Result<(), Fault> {
        if self.data.len() >= STACK_LIMIT {
            return Err(Fault::StackOverflow);
        }
        self.data.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Word, Fault> {
        self.data.pop().ok_or(Fault::StackUnderflow)
    }

    /// The `n`-th word from the top without removing it.
    pub fn peek(&self, n: usize) -> Result<Word, Fault> {
        self.data
            .len()
            .checked_sub(n + 1)
            .map(|i| self.data[i])
            .ok_or(Fault::StackUnderflow)
    }

    /// Remove the top `n` words.
    pub fn drop_top(&mut self, n: usize) -> Result<(), Fault> {
        let new_len = self
            .data
            .len()
            .checked_sub(n)
            .ok_or(Fault::StackUnderflow)?;
        self.data.truncate(new_len);
        Ok(())
    }

    /// Push a copy of the `n`-th word from the top.
    pub fn dup(&mut self, n: usize) -> Result<(), Fault> {
        let value = self.peek(n)?;
        self.push(value)
    }

    /// Exchange the top word with the `n`-th word from the top.
    pub fn swap(&mut self, n: usize) -> Result<(), Fault> {
        let len = self.data.len();
        if n >= len {
            return Err(Fault::StackUnderflow);
        }
        self.data.swap(len - 1, len - 1 - n);
        Ok(())
    }

    /// Empty the stack, keeping its allocation.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Words from bottom to top.
    pub fn as_slice(&self) -> &[Word] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(n: u64) -> Word {
        Word::from(n)
    }

    #[test]
    fn push_pop_lifo() {
        let mut stack = Stack::new();
        stack.push(w(1)).unwrap();
        stack.push(w(2)).unwrap();
        assert_eq!(stack.pop(), Ok(w(2)));
        assert_eq!(stack.pop(), Ok(w(1)));
        assert_eq!(stack.pop(), Err(Fault::StackUnderflow));
    }

    #[test]
    fn overflow_at_limit() {
        let mut stack = Stack::new();
        for i in 0..STACK_LIMIT {
            stack.push(w(i as u64)).unwrap();
        }
        assert_eq!(stack.push(w(0)), Err(Fault::StackOverflow));
        assert_eq!(stack.len(), STACK_LIMIT);
    }

    #[test]
    fn peek_counts_from_top() {
        let mut stack = Stack::new();
        stack.push(w(1)).unwrap();
        stack.push(w(2)).unwrap();
        assert_eq!(stack.peek(0), Ok(w(2)));
        assert_eq!(stack.peek(1), Ok(w(1)));
        assert_eq!(stack.peek(2), Err(Fault::StackUnderflow));
    }

    #[test]
    fn dup_and_swap() {
        let mut stack = Stack::new();
        for i in 1..=3 {
            stack.push(w(i)).unwrap();
        }
        stack.dup(2).unwrap();
        assert_eq!(stack.as_slice(), &[w(1), w(2), w(3), w(1)]);
        stack.swap(1).unwrap();
        assert_eq!(stack.as_slice(), &[w(1), w(2), w(1), w(3)]);
        assert_eq!(stack.swap(4), Err(Fault::StackUnderflow));
        assert_eq!(stack.dup(4), Err(Fault::StackUnderflow));
    }

    #[test]
    fn swap_zero_is_a_no_op() {
        let mut stack = Stack::new();
        assert_eq!(stack.swap(0), Err(Fault::StackUnderflow));
        stack.push(w(7)).unwrap();
        stack.swap(0).unwrap();
        assert_eq!(stack.as_slice(), &[w(7)]);
    }

    #[test]
    fn drop_top_and_clear() {
        let mut stack = Stack::new();
        stack.push(w(1)).unwrap();
        stack.push(w(2)).unwrap();
        assert_eq!(stack.drop_top(3), Err(Fault::StackUnderflow));
        stack.drop_top(1).unwrap();
        assert_eq!(stack.as_slice(), &[w(1)]);
        stack.clear();
        assert!(stack.is_empty());
    }
}
