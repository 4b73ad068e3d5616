//! WVM assembler: mnemonic text to bytecode and back.
//!
//! The translation is mechanical. No labels, no macros.
//!
//! # Usage
//!
//! ```
//! use wvm_assembler::{assemble, disassemble};
//!
//! let text = "PUSH1 0x01\nPUSH1 0x02\nADD\nSTOP\n";
//! let code = assemble(text).unwrap();
//! assert_eq!(code, vec![0x60, 0x01, 0x60, 0x02, 0x01, 0x00]);
//! assert_eq!(disassemble(&code), text);
//! ```
//!
//! # Roundtrip Guarantee
//!
//! `assemble(&disassemble(code)) == code` holds for every byte string,
//! including code with undefined opcodes or a truncated final push. The
//! disassembler outputs canonical text; the assembler also accepts decimal
//! immediates, lowercase mnemonics and the `KECCAK256` alias.

pub mod error;

mod disassembler;
mod lexer;
mod parser;

pub use error::AsmError;

use lexer::tokenize_line;
use parser::parse_line;

/// Assemble text into bytecode.
///
/// Returns the first error encountered.
pub fn assemble(text: &str) -> Result<Vec<u8>, AsmError> {
    let mut code = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line_num = idx + 1;
        let tokens = tokenize_line(line, line_num)?;
        parse_line(&tokens, line_num, &mut code)?;
    }
    Ok(code)
}

/// Disassemble bytecode into canonical assembly text.
pub fn disassemble(code: &[u8]) -> String {
    disassembler::disassemble(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wvm_common::opcode::ALL_OPCODES;

    #[test]
    fn comments_and_blank_lines() {
        let text = "\
; store 42 at slot 1
PUSH1 42   ; value

push1 0x01 ; key
SSTORE
";
        assert_eq!(
            assemble(text).unwrap(),
            vec![0x60, 0x2a, 0x60, 0x01, 0x55]
        );
    }

    #[test]
    fn error_reports_line() {
        let err = assemble("STOP\nFOOBAR\n").unwrap_err();
        assert!(matches!(err, AsmError::UnknownMnemonic { line: 2, .. }));
    }

    #[test]
    fn every_opcode_roundtrips() {
        for op in ALL_OPCODES {
            let mut code = vec![op as u8];
            code.extend(std::iter::repeat(0xab).take(op.immediate_size()));
            let text = disassemble(&code);
            assert_eq!(assemble(&text).unwrap(), code, "{op}");
        }
    }

    proptest! {
        #[test]
        fn disassemble_then_assemble_is_identity(code in prop::collection::vec(any::<u8>(), 0..512)) {
            prop_assert_eq!(assemble(&disassemble(&code)).unwrap(), code);
        }
    }
}
