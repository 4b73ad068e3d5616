//! Size limits for bytecode.

use crate::error::ValidationError;

/// Maximum code size in bytes.
pub const MAX_CODE_SIZE: usize = 24_576;

/// Run the limits check.
pub fn check_limits(code: &[u8]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if code.len() > MAX_CODE_SIZE {
        errors.push(ValidationError::CodeTooLarge {
            size: code.len(),
            limit: MAX_CODE_SIZE,
        });
    }
    errors
}
