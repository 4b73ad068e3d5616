//! Gas accounting.
//!
//! The meter only ever decreases. Every charge happens before the side
//! effects it pays for, so an operation that cannot pay leaves no trace.

use crate::error::Fault;
use wvm_common::word::WORD_BYTES;

/// Per-operation costs. The default is the flat Istanbul-era schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasSchedule {
    pub zero: u64,
    pub base: u64,
    pub very_low: u64,
    pub low: u64,
    pub mid: u64,
    pub high: u64,
    pub jumpdest: u64,
    /// Per significant byte of the `EXP` exponent.
    pub exp_byte: u64,
    /// Linear coefficient of the memory cost.
    pub memory_word: u64,
    /// Divisor of the quadratic memory term.
    pub memory_quad_divisor: u64,
    /// Per word copied by the `*COPY` family.
    pub copy_word: u64,
    pub sha3: u64,
    pub sha3_word: u64,
    pub sload: u64,
    /// Storing a non-zero value into a zero slot.
    pub sstore_set: u64,
    /// Any other value-changing store.
    pub sstore_reset: u64,
    /// `SSTORE` faults unless more than this much gas remains.
    pub sstore_sentry: u64,
    pub balance: u64,
    pub ext_code: u64,
    pub blockhash: u64,
    pub log: u64,
    pub log_topic: u64,
    pub log_data: u64,
    pub call: u64,
    /// Surcharge for a call that transfers value.
    pub call_value: u64,
    /// Gas added to the callee of a value transfer.
    pub call_stipend: u64,
    pub transient: u64,
}

impl Default for GasSchedule {
    fn default() -> Self {
        Self {
            zero: 0,
            base: 2,
            very_low: 3,
            low: 5,
            mid: 8,
            high: 10,
            jumpdest: 1,
            exp_byte: 50,
            memory_word: 3,
            memory_quad_divisor: 512,
            copy_word: 3,
            sha3: 30,
            sha3_word: 6,
            sload: 800,
            sstore_set: 20_000,
            sstore_reset: 5_000,
            sstore_sentry: 2_300,
            balance: 700,
            ext_code: 700,
            blockhash: 20,
            log: 375,
            log_topic: 375,
            log_data: 8,
            call: 700,
            call_value: 9_000,
            call_stipend: 2_300,
            transient: 100,
        }
    }
}

impl GasSchedule {
    /// Total cost of holding `words` words of memory.
    pub fn memory_cost(&self, words: usize) -> u64 {
        let w = words as u64;
        let quadratic = w.saturating_mul(w) / self.memory_quad_divisor.max(1);
        self.memory_word.saturating_mul(w).saturating_add(quadratic)
    }

    /// Cost of growing memory from `current` to `target` words. Zero when
    /// memory does not grow.
    pub fn memory_expansion_cost(&self, current: usize, target: usize) -> u64 {
        if target <= current {
            return 0;
        }
        self.memory_cost(target) - self.memory_cost(current)
    }

    /// Cost of copying `size` bytes.
    pub fn copy_cost(&self, size: usize) -> u64 {
        self.copy_word.saturating_mul(word_count(size))
    }

    /// Dynamic part of `SHA3` over `size` bytes.
    pub fn sha3_cost(&self, size: usize) -> u64 {
        self.sha3_word.saturating_mul(word_count(size))
    }
}

/// Number of words needed to hold `size` bytes.
pub fn word_count(size: usize) -> u64 {
    size.div_ceil(WORD_BYTES) as u64
}

/// A monotonically decreasing gas counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasMeter {
    limit: u64,
    remaining: u64,
}

impl GasMeter {
    pub fn new(limit: u64) -> Self {
        Self {
            limit,
            remaining: limit,
        }
    }

    /// Deduct `amount`, or fail with `OutOfGas` leaving the meter unchanged.
    pub fn charge(&mut self, amount: u64) -> Result<(), Fault> {
        if amount > self.remaining {
            return Err(Fault::OutOfGas);
        }
        self.remaining -= amount;
        Ok(())
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn used(&self) -> u64 {
        self.limit - self.remaining
    }

    /// Restart the meter with a fresh budget.
    pub fn reset(&mut self, limit: u64) {
        *self = Self::new(limit);
    }
}
