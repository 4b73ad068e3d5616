//! Tokenizer for WVM assembly text.

use crate::error::AsmError;
use wvm_common::Word;

/// A single token from an assembly line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A mnemonic. Always uppercase.
    Ident(String),
    /// A numeric literal, decimal or `0x` hex, up to 256 bits.
    Number(Word),
}

/// Tokenize a single line of assembly text.
///
/// Blank and comment-only lines produce no tokens. Comments start with `;`.
pub(crate) fn tokenize_line(line: &str, line_num: usize) -> Result<Vec<Token>, AsmError> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut tokens = Vec::new();
    for word in line.split_whitespace() {
        let invalid = || AsmError::InvalidNumber {
            line: line_num,
            token: word.to_string(),
        };
        let token = if let Some(digits) = word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
            Token::Number(parse_hex(digits).ok_or_else(invalid)?)
        } else if word.as_bytes().first().is_some_and(|b| b.is_ascii_digit()) {
            Token::Number(Word::from_dec_str(word).map_err(|_| invalid())?)
        } else {
            Token::Ident(word.to_ascii_uppercase())
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_hex(digits: &str) -> Option<Word> {
    if digits.is_empty() || digits.len() > 64 {
        return None;
    }
    let padded = if digits.len() % 2 == 1 {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    let bytes = hex::decode(padded).ok()?;
    Some(Word::from_big_endian(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    fn num(n: u64) -> Token {
        Token::Number(Word::from(n))
    }

    #[test]
    fn blank_and_comment_lines() {
        assert_eq!(tokenize_line("", 1).unwrap(), vec![]);
        assert_eq!(tokenize_line("  \t ", 1).unwrap(), vec![]);
        assert_eq!(tokenize_line("; only a comment", 1).unwrap(), vec![]);
    }

    #[test]
    fn mnemonic_uppercased() {
        assert_eq!(tokenize_line("  add ; sum", 1).unwrap(), vec![ident("ADD")]);
    }

    #[test]
    fn push_with_hex_and_decimal() {
        assert_eq!(
            tokenize_line("PUSH2 0x0102", 1).unwrap(),
            vec![ident("PUSH2"), num(0x0102)]
        );
        assert_eq!(
            tokenize_line("push1 42", 1).unwrap(),
            vec![ident("PUSH1"), num(42)]
        );
    }

    #[test]
    fn odd_length_hex() {
        assert_eq!(tokenize_line("DB 0xf", 1).unwrap(), vec![ident("DB"), num(0xf)]);
    }

    #[test]
    fn full_width_hex() {
        let text = format!("PUSH32 0x{}", "ff".repeat(32));
        assert_eq!(
            tokenize_line(&text, 1).unwrap(),
            vec![ident("PUSH32"), Token::Number(Word::MAX)]
        );
    }

    #[test]
    fn rejects_malformed_numbers() {
        for bad in ["0x", "0xzz", "12ab", "0X1g"] {
            let err = tokenize_line(&format!("PUSH1 {bad}"), 5).unwrap_err();
            assert_eq!(
                err,
                AsmError::InvalidNumber {
                    line: 5,
                    token: bad.to_string()
                }
            );
        }
    }

    #[test]
    fn rejects_over_256_bits() {
        let text = format!("PUSH32 0x1{}", "00".repeat(32));
        assert!(matches!(
            tokenize_line(&text, 1),
            Err(AsmError::InvalidNumber { line: 1, .. })
        ));
        let decimal = format!("PUSH32 {}", "9".repeat(80));
        assert!(tokenize_line(&decimal, 1).is_err());
    }
}
