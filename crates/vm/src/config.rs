//! Interpreter configuration.

use std::sync::OnceLock;

use crate::gas::GasSchedule;
use crate::table::JumpTable;

/// Default ceiling on frame memory: 32 MiB.
pub const DEFAULT_MEMORY_LIMIT: usize = 32 * 1024 * 1024;

/// Maximum nesting of calls.
pub const CALL_DEPTH_LIMIT: usize = 1024;

/// Everything an interpreter reads but never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub schedule: GasSchedule,
    /// Largest memory offset + size a frame may touch, in bytes.
    pub memory_limit: usize,
    pub call_depth_limit: usize,
    /// Derived from `schedule`. Rebuild through [`Config::new`] after
    /// changing the schedule.
    pub table: JumpTable,
}

impl Config {
    pub fn new(schedule: GasSchedule) -> Self {
        let table = JumpTable::new(&schedule);
        Self {
            schedule,
            memory_limit: DEFAULT_MEMORY_LIMIT,
            call_depth_limit: CALL_DEPTH_LIMIT,
            table,
        }
    }

    pub fn with_memory_limit(mut self, limit: usize) -> Self {
        self.memory_limit = limit;
        self
    }

    pub fn with_call_depth_limit(mut self, limit: usize) -> Self {
        self.call_depth_limit = limit;
        self
    }

    /// The process-wide default configuration, built on first use.
    pub fn shared() -> &'static Config {
        static SHARED: OnceLock<Config> = OnceLock::new();
        SHARED.get_or_init(Config::default)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(GasSchedule::default())
    }
}
