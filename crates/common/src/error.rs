//! Decode errors for WVM bytecode and mnemonics.

use thiserror::Error;

/// Errors that occur while decoding opcodes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Byte value has no instruction assigned to it.
    #[error("undefined opcode: {0:#04x}")]
    UndefinedOpcode(u8),

    /// Text does not name any opcode.
    #[error("unknown mnemonic: '{0}'")]
    UnknownMnemonic(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_undefined_opcode() {
        assert_eq!(
            DecodeError::UndefinedOpcode(0x0c).to_string(),
            "undefined opcode: 0x0c"
        );
    }

    #[test]
    fn display_unknown_mnemonic() {
        assert_eq!(
            DecodeError::UnknownMnemonic("FROB".to_string()).to_string(),
            "unknown mnemonic: 'FROB'"
        );
    }
}
