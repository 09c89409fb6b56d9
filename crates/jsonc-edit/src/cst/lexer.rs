//! Scanner that preserves all trivia (whitespace, newlines, comments)
//!
//! Every byte of the input ends up in exactly one token, which is what makes
//! the CST lossless: parse(source).to_string() == source. Escape sequences
//! are validated here but decoded lazily by `decoded_value()`.
//!
//! The scanner fails on the first error. A malformed document never produces
//! a partial token stream.

use std::ops::Range;

use crate::cst::SyntaxKind;
use crate::error::{ConversionError, SyntaxError, SyntaxErrorKind};
use crate::options::ParseOptions;

/// A scanned token: kind, exact source text, byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: SyntaxKind,
    pub text: String,
    pub span: Range<usize>,
}

impl Token {
    fn new(kind: SyntaxKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Tokenize the input, preserving all trivia.
///
/// Extension tokens that the options disable (comments, single quoted
/// strings, hexadecimal numbers, unary plus) are still recognized so the
/// error carries the exact offset of the offending construct.
pub(crate) fn lex(source: &str, options: &ParseOptions) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let len = source.len();
    let mut i = 0usize;

    while i < len {
        let (current, size) = match next_char(source, i) {
            Some(pair) => pair,
            None => break,
        };
        let start = i;

        match current {
            '\n' => {
                tokens.push(Token::new(SyntaxKind::Newline, "\n", start..i + size));
                i += size;
            }
            '\r' => {
                let mut end = i + size;
                if let Some(('\n', nl_size)) = next_char(source, end) {
                    end += nl_size;
                }
                tokens.push(Token::new(
                    SyntaxKind::Newline,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }

            c if c.is_whitespace() => {
                let mut end = i + size;
                while let Some((next, next_size)) = next_char(source, end) {
                    if next.is_whitespace() && next != '\n' && next != '\r' {
                        end += next_size;
                    } else {
                        break;
                    }
                }
                tokens.push(Token::new(
                    SyntaxKind::Whitespace,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }

            '/' => {
                let next = next_char(source, i + size).map(|(c, _)| c);
                match next {
                    Some('/') => {
                        if !options.allow_comments {
                            return Err(err(SyntaxErrorKind::CommentsNotAllowed, start, source));
                        }
                        let mut end = i + size + 1;
                        while let Some((c, step)) = next_char(source, end) {
                            if c == '\n' || c == '\r' {
                                break;
                            }
                            end += step;
                        }
                        tokens.push(Token::new(
                            SyntaxKind::LineComment,
                            &source[start..end],
                            start..end,
                        ));
                        i = end;
                    }
                    Some('*') => {
                        if !options.allow_comments {
                            return Err(err(SyntaxErrorKind::CommentsNotAllowed, start, source));
                        }
                        let mut end = i + size + 1;
                        let mut terminated = false;
                        while let Some((c, step)) = next_char(source, end) {
                            if c == '*' {
                                if let Some(('/', slash_size)) = next_char(source, end + step) {
                                    end += step + slash_size;
                                    terminated = true;
                                    break;
                                }
                            }
                            end += step;
                        }
                        if !terminated {
                            return Err(err(
                                SyntaxErrorKind::UnterminatedBlockComment,
                                start,
                                source,
                            ));
                        }
                        tokens.push(Token::new(
                            SyntaxKind::BlockComment,
                            &source[start..end],
                            start..end,
                        ));
                        i = end;
                    }
                    _ => {
                        return Err(err(
                            SyntaxErrorKind::UnexpectedCharacter('/'),
                            start,
                            source,
                        ));
                    }
                }
            }

            '{' => {
                tokens.push(Token::new(SyntaxKind::OpenBrace, "{", start..i + size));
                i += size;
            }
            '}' => {
                tokens.push(Token::new(SyntaxKind::CloseBrace, "}", start..i + size));
                i += size;
            }
            '[' => {
                tokens.push(Token::new(SyntaxKind::OpenBracket, "[", start..i + size));
                i += size;
            }
            ']' => {
                tokens.push(Token::new(SyntaxKind::CloseBracket, "]", start..i + size));
                i += size;
            }
            ',' => {
                tokens.push(Token::new(SyntaxKind::Comma, ",", start..i + size));
                i += size;
            }
            ':' => {
                tokens.push(Token::new(SyntaxKind::Colon, ":", start..i + size));
                i += size;
            }

            '"' => {
                let end = lex_string(source, start, '"')?;
                tokens.push(Token::new(
                    SyntaxKind::StringLit,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }
            '\'' => {
                if !options.allow_single_quoted_strings {
                    return Err(err(
                        SyntaxErrorKind::SingleQuotedStringsNotAllowed,
                        start,
                        source,
                    ));
                }
                let end = lex_string(source, start, '\'')?;
                tokens.push(Token::new(
                    SyntaxKind::StringLit,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }

            '-' => {
                let end = lex_number(source, start, options)?;
                tokens.push(Token::new(
                    SyntaxKind::NumberLit,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }
            '+' => {
                if !options.allow_unary_plus_numbers {
                    return Err(err(SyntaxErrorKind::UnaryPlusNotAllowed, start, source));
                }
                let end = lex_number(source, start, options)?;
                tokens.push(Token::new(
                    SyntaxKind::NumberLit,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }
            c if c.is_ascii_digit() => {
                let end = lex_number(source, start, options)?;
                tokens.push(Token::new(
                    SyntaxKind::NumberLit,
                    &source[start..end],
                    start..end,
                ));
                i = end;
            }

            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let end = lex_word(source, start);
                let word = &source[start..end];
                let kind = match word {
                    "true" | "false" => SyntaxKind::BooleanLit,
                    "null" => SyntaxKind::NullKeyword,
                    _ => SyntaxKind::WordLit,
                };
                tokens.push(Token::new(kind, word, start..end));
                i = end;
            }

            c => {
                return Err(err(SyntaxErrorKind::UnexpectedCharacter(c), start, source));
            }
        }
    }

    Ok(tokens)
}

/// Scan a string literal starting at `start` (which holds the quote char).
/// Returns the end offset past the closing quote.
fn lex_string(source: &str, start: usize, quote: char) -> Result<usize, SyntaxError> {
    let mut i = start + quote.len_utf8();

    while let Some((c, size)) = next_char(source, i) {
        match c {
            c if c == quote => return Ok(i + size),
            '\\' => {
                i += size;
                let (escaped, escaped_size) = match next_char(source, i) {
                    Some(pair) => pair,
                    None => {
                        return Err(err(SyntaxErrorKind::UnterminatedString, start, source));
                    }
                };
                match escaped {
                    '"' | '\'' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => {
                        i += escaped_size;
                    }
                    'u' => {
                        i += escaped_size;
                        for _ in 0..4 {
                            match next_char(source, i) {
                                Some((digit, digit_size)) if digit.is_ascii_hexdigit() => {
                                    i += digit_size;
                                }
                                _ => {
                                    return Err(err(
                                        SyntaxErrorKind::InvalidUnicodeEscape,
                                        i,
                                        source,
                                    ));
                                }
                            }
                        }
                    }
                    other => {
                        return Err(err(
                            SyntaxErrorKind::InvalidEscape(other),
                            i - size,
                            source,
                        ));
                    }
                }
            }
            '\n' | '\r' => {
                return Err(err(SyntaxErrorKind::UnterminatedString, start, source));
            }
            _ => i += size,
        }
    }

    Err(err(SyntaxErrorKind::UnterminatedString, start, source))
}

/// Scan a number literal starting at `start` (digit, `-`, or `+`).
/// Returns the end offset.
fn lex_number(source: &str, start: usize, options: &ParseOptions) -> Result<usize, SyntaxError> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut i = start;

    if bytes[i] == b'-' || bytes[i] == b'+' {
        i += 1;
    }

    // Hexadecimal: 0x[0-9A-Fa-f]+
    if i + 1 < len && bytes[i] == b'0' && (bytes[i + 1] == b'x' || bytes[i + 1] == b'X') {
        if !options.allow_hexadecimal_numbers {
            return Err(err(
                SyntaxErrorKind::HexadecimalNumbersNotAllowed,
                start,
                source,
            ));
        }
        i += 2;
        let digits_start = i;
        while i < len && bytes[i].is_ascii_hexdigit() {
            i += 1;
        }
        if i == digits_start {
            return Err(err(SyntaxErrorKind::InvalidNumber, start, source));
        }
        return Ok(i);
    }

    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return Err(err(SyntaxErrorKind::InvalidNumber, start, source));
    }

    if i < len && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return Err(err(SyntaxErrorKind::InvalidNumber, start, source));
        }
    }

    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < len && (bytes[i] == b'-' || bytes[i] == b'+') {
            i += 1;
        }
        let exp_start = i;
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return Err(err(SyntaxErrorKind::InvalidNumber, start, source));
        }
    }

    Ok(i)
}

/// Scan a bare word: letter/`_`/`$` followed by letters/digits/`_`/`$`
fn lex_word(source: &str, start: usize) -> usize {
    let mut i = start;
    while let Some((c, size)) = next_char(source, i) {
        if c.is_alphanumeric() || c == '_' || c == '$' {
            i += size;
        } else {
            break;
        }
    }
    i
}

/// Decode the escape sequences of a raw string literal (quotes included).
///
/// The scanner has already validated the escapes; the remaining failure mode
/// is an unpaired surrogate in a `\u` escape.
pub(crate) fn decode_string(raw: &str) -> Result<String, ConversionError> {
    let quote = raw.chars().next().unwrap_or('"');
    let inner = raw
        .strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .unwrap_or(raw);

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => decoded.push('"'),
            Some('\'') => decoded.push('\''),
            Some('\\') => decoded.push('\\'),
            Some('/') => decoded.push('/'),
            Some('b') => decoded.push('\u{0008}'),
            Some('f') => decoded.push('\u{000C}'),
            Some('n') => decoded.push('\n'),
            Some('r') => decoded.push('\r'),
            Some('t') => decoded.push('\t'),
            Some('u') => {
                let first = read_hex4(&mut chars)?;
                let code = if (0xD800..0xDC00).contains(&first) {
                    // High surrogate, must pair with \uDC00..\uDFFF
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(ConversionError::InvalidUnicodeEscape);
                    }
                    let second = read_hex4(&mut chars)?;
                    if !(0xDC00..0xE000).contains(&second) {
                        return Err(ConversionError::InvalidUnicodeEscape);
                    }
                    0x10000 + ((first - 0xD800) << 10) + (second - 0xDC00)
                } else {
                    first
                };
                match char::from_u32(code) {
                    Some(decoded_char) => decoded.push(decoded_char),
                    None => return Err(ConversionError::InvalidUnicodeEscape),
                }
            }
            _ => return Err(ConversionError::InvalidEscape),
        }
    }
    Ok(decoded)
}

fn read_hex4(chars: &mut std::str::Chars<'_>) -> Result<u32, ConversionError> {
    let mut value = 0u32;
    for _ in 0..4 {
        let digit = chars
            .next()
            .and_then(|c| c.to_digit(16))
            .ok_or(ConversionError::InvalidUnicodeEscape)?;
        value = value * 16 + digit;
    }
    Ok(value)
}

fn next_char(source: &str, pos: usize) -> Option<(char, usize)> {
    source[pos..].chars().next().map(|c| (c, c.len_utf8()))
}

fn err(kind: SyntaxErrorKind, offset: usize, source: &str) -> SyntaxError {
    SyntaxError::new(kind, offset, source)
}
