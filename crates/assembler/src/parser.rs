//! Parser for WVM assembly tokens to bytes.

use crate::error::AsmError;
use crate::lexer::Token;
use wvm_common::word::{self, WORD_BYTES};
use wvm_common::{Opcode, Word};

/// Pseudo-instruction that emits one raw byte.
pub(crate) const DATA_BYTE: &str = "DB";

/// Parse one line's tokens and append the encoded bytes to `out`.
///
/// Blank lines append nothing.
pub(crate) fn parse_line(tokens: &[Token], line_num: usize, out: &mut Vec<u8>) -> Result<(), AsmError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(());
    };

    let mnemonic = match first {
        Token::Ident(s) => s.as_str(),
        Token::Number(n) => {
            return Err(AsmError::UnexpectedToken {
                line: line_num,
                token: n.to_string(),
            })
        }
    };

    if mnemonic == DATA_BYTE {
        let value = expect_immediate(args, line_num, DATA_BYTE)?;
        if word::byte_len(value) > 1 {
            return Err(AsmError::ImmediateTooLarge {
                line: line_num,
                mnemonic: DATA_BYTE,
                width: 1,
            });
        }
        expect_end(&args[1..], line_num)?;
        out.push(value.byte(0));
        return Ok(());
    }

    let opcode: Opcode = mnemonic.parse().map_err(|_| AsmError::UnknownMnemonic {
        line: line_num,
        token: mnemonic.to_string(),
    })?;
    out.push(opcode as u8);

    let width = opcode.immediate_size();
    if width == 0 {
        return expect_end(args, line_num);
    }

    let value = expect_immediate(args, line_num, opcode.mnemonic())?;
    if word::byte_len(value) > width {
        return Err(AsmError::ImmediateTooLarge {
            line: line_num,
            mnemonic: opcode.mnemonic(),
            width,
        });
    }
    expect_end(&args[1..], line_num)?;
    out.extend_from_slice(&word::to_be_bytes(value)[WORD_BYTES - width..]);
    Ok(())
}

fn expect_immediate(args: &[Token], line_num: usize, mnemonic: &'static str) -> Result<Word, AsmError> {
    match args.first() {
        Some(Token::Number(value)) => Ok(*value),
        Some(Token::Ident(token)) => Err(AsmError::UnexpectedToken {
            line: line_num,
            token: token.clone(),
        }),
        None => Err(AsmError::MissingImmediate {
            line: line_num,
            mnemonic,
        }),
    }
}

fn expect_end(args: &[Token], line_num: usize) -> Result<(), AsmError> {
    match args.first() {
        None => Ok(()),
        Some(token) => Err(AsmError::UnexpectedToken {
            line: line_num,
            token: match token {
                Token::Ident(s) => s.clone(),
                Token::Number(n) => n.to_string(),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_line;

    fn parse(text: &str) -> Result<Vec<u8>, AsmError> {
        let mut out = Vec::new();
        parse_line(&tokenize_line(text, 1)?, 1, &mut out)?;
        Ok(out)
    }

    #[test]
    fn plain_opcode() {
        assert_eq!(parse("ADD").unwrap(), vec![0x01]);
        assert_eq!(parse("").unwrap(), vec![]);
    }

    #[test]
    fn push_pads_to_width() {
        assert_eq!(parse("PUSH1 0x2a").unwrap(), vec![0x60, 0x2a]);
        assert_eq!(parse("PUSH3 1").unwrap(), vec![0x62, 0x00, 0x00, 0x01]);
        assert_eq!(parse("PUSH0").unwrap(), vec![0x5f]);
    }

    #[test]
    fn keccak_alias() {
        assert_eq!(parse("KECCAK256").unwrap(), vec![0x20]);
    }

    #[test]
    fn data_byte() {
        assert_eq!(parse("DB 0x0c").unwrap(), vec![0x0c]);
        assert!(matches!(
            parse("DB 256"),
            Err(AsmError::ImmediateTooLarge { width: 1, .. })
        ));
    }

    #[test]
    fn push_immediate_must_fit() {
        assert!(matches!(
            parse("PUSH1 0x100"),
            Err(AsmError::ImmediateTooLarge { mnemonic: "PUSH1", width: 1, .. })
        ));
    }

    #[test]
    fn push_requires_immediate() {
        assert_eq!(
            parse("PUSH2"),
            Err(AsmError::MissingImmediate {
                line: 1,
                mnemonic: "PUSH2"
            })
        );
    }

    #[test]
    fn trailing_tokens_rejected() {
        assert!(matches!(parse("ADD 1"), Err(AsmError::UnexpectedToken { .. })));
        assert!(matches!(parse("PUSH1 1 2"), Err(AsmError::UnexpectedToken { .. })));
        assert!(matches!(parse("42"), Err(AsmError::UnexpectedToken { .. })));
    }

    #[test]
    fn unknown_mnemonic() {
        assert_eq!(
            parse("FROB"),
            Err(AsmError::UnknownMnemonic {
                line: 1,
                token: "FROB".to_string()
            })
        );
    }
}
