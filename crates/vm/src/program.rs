//! Immutable, shareable bytecode.

use std::sync::Arc;

use wvm_common::Word;
use wvm_validator::JumpDestinations;

/// Bytecode together with its jump destination analysis.
///
/// Cloning is cheap: both parts live behind `Arc`, so one `Program` can back
/// any number of executions on any number of threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    code: Arc<[u8]>,
    jump_destinations: Arc<JumpDestinations>,
}

impl Program {
    /// Analyze `code` once and keep the result alongside it.
    pub fn new(code: impl Into<Arc<[u8]>>) -> Self {
        let code = code.into();
        let jump_destinations = Arc::new(JumpDestinations::analyze(&code));
        Self {
            code,
            jump_destinations,
        }
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn jump_destinations(&self) -> &JumpDestinations {
        &self.jump_destinations
    }

    /// True if `target` names a `JUMPDEST` outside push data.
    pub fn is_valid_jump(&self, target: Word) -> bool {
        self.jump_destinations.is_valid_target(target)
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<u8>> for Program {
    fn from(code: Vec<u8>) -> Self {
        Self::new(code)
    }
}

impl From<&[u8]> for Program {
    fn from(code: &[u8]) -> Self {
        Self::new(code)
    }
}
