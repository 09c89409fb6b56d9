//! Host value bridge: CST ⇄ `serde_json::Value`
//!
//! The outbound direction walks the tree and discards trivia. Property order
//! is preserved (`serde_json` is built with `preserve_order`). Numbers become
//! host numbers when the literal parses as a finite IEEE-754 double and fall
//! back to the literal source text otherwise, so hexadecimal and oversized
//! literals survive without silent precision loss.
//!
//! [`parse_to_value`] is the fused pipeline: scanner → token-level value
//! parser, skipping CST construction entirely. Its semantics match
//! `parse(text)?.to_value()`.

use serde_json::Value;

use crate::cst::{
    decode_string, lex, CstNode, CstObjectProp, CstRootNode, SyntaxKind, SyntaxNode, Token,
};
use crate::error::{ConversionError, SyntaxError, SyntaxErrorKind};
use crate::options::ParseOptions;

impl SyntaxNode {
    /// Convert this subtree to a plain value, discarding comments and
    /// formatting.
    pub fn to_value(&self) -> Result<Value, ConversionError> {
        node_to_value(self)
    }
}

impl CstRootNode {
    /// Convert the document to a plain value; `None` for an empty document.
    pub fn to_value(&self) -> Result<Option<Value>, ConversionError> {
        match self.value() {
            Some(value) => node_to_value(&value).map(Some),
            None => Ok(None),
        }
    }
}

fn node_to_value(node: &SyntaxNode) -> Result<Value, ConversionError> {
    match node.kind() {
        SyntaxKind::NullKeyword => Ok(Value::Null),
        SyntaxKind::BooleanLit => Ok(Value::Bool(node.as_boolean().unwrap_or(false))),
        SyntaxKind::NumberLit => {
            let text = node.leaf_text().unwrap_or_default();
            Ok(number_to_value(&text))
        }
        SyntaxKind::StringLit => {
            let text = node.leaf_text().unwrap_or_default();
            decode_string(&text).map(Value::String)
        }
        SyntaxKind::Array => {
            let mut items = Vec::new();
            for element in node.children_exclude_trivia_and_tokens() {
                items.push(node_to_value(&element)?);
            }
            Ok(Value::Array(items))
        }
        SyntaxKind::Object => {
            let mut map = serde_json::Map::new();
            for child in node.children_exclude_trivia_and_tokens() {
                let prop =
                    CstObjectProp::cast(child).ok_or(ConversionError::PropertyWithoutName)?;
                let name = prop
                    .name()
                    .ok_or(ConversionError::PropertyWithoutName)?
                    .decoded_value()?;
                let value = match prop.value() {
                    Some(value) => node_to_value(&value)?,
                    None => return Err(ConversionError::PropertyWithoutValue(name)),
                };
                // Duplicate keys: the last value wins, in first position.
                map.insert(name, value);
            }
            Ok(Value::Object(map))
        }
        SyntaxKind::Root => match node
            .children_exclude_trivia_and_tokens()
            .into_iter()
            .next()
        {
            Some(value) => node_to_value(&value),
            None => Err(ConversionError::UnsupportedNode("an empty document")),
        },
        kind => Err(ConversionError::UnsupportedNode(kind.description())),
    }
}

/// A host number when the literal is a finite double, else the source text.
fn number_to_value(text: &str) -> Value {
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(int) = text.parse::<u64>() {
        return Value::from(int);
    }
    match text.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
        Some(number) => Value::Number(number),
        None => Value::String(text.to_string()),
    }
}

/// Fused scanner → value pipeline, skipping CST construction.
pub(crate) fn parse_to_value(
    text: &str,
    options: &ParseOptions,
) -> Result<Option<Value>, SyntaxError> {
    let tokens = lex(text, options)?;
    let mut parser = ValueParser {
        tokens: &tokens,
        pos: 0,
        options,
        source: text,
    };
    parser.skip_trivia();
    if parser.at_end() {
        return Ok(None);
    }
    let value = parser.parse_value()?;
    parser.skip_trivia();
    if !parser.at_end() {
        return Err(parser.error_here(SyntaxErrorKind::UnexpectedTrailingContent));
    }
    Ok(Some(value))
}

/// Token-level value parser; mirrors the CST grammar without building nodes.
struct ValueParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    options: &'a ParseOptions,
    source: &'a str,
}

impl<'a> ValueParser<'a> {
    fn parse_value(&mut self) -> Result<Value, SyntaxError> {
        match self.current_kind() {
            Some(SyntaxKind::OpenBrace) => self.parse_object(),
            Some(SyntaxKind::OpenBracket) => self.parse_array(),
            Some(SyntaxKind::NullKeyword) => {
                self.pos += 1;
                Ok(Value::Null)
            }
            Some(SyntaxKind::BooleanLit) => {
                let value = self.tokens[self.pos].text == "true";
                self.pos += 1;
                Ok(Value::Bool(value))
            }
            Some(SyntaxKind::NumberLit) => {
                let value = number_to_value(&self.tokens[self.pos].text);
                self.pos += 1;
                Ok(value)
            }
            Some(SyntaxKind::StringLit) => {
                let decoded = self.decode_current_string()?;
                self.pos += 1;
                Ok(Value::String(decoded))
            }
            Some(_) => Err(self.unexpected_token()),
            None => Err(self.error_here(SyntaxErrorKind::UnexpectedEof)),
        }
    }

    fn parse_object(&mut self) -> Result<Value, SyntaxError> {
        self.pos += 1; // `{`
        self.skip_trivia();
        let mut map = serde_json::Map::new();
        let mut needs_comma = false;
        loop {
            match self.current_kind() {
                Some(SyntaxKind::CloseBrace) => {
                    self.pos += 1;
                    break;
                }
                Some(SyntaxKind::Comma) => {
                    if !needs_comma {
                        return Err(self.unexpected_token());
                    }
                    let comma_offset = self.current_offset();
                    self.pos += 1;
                    self.skip_trivia();
                    if self.current_kind() == Some(SyntaxKind::CloseBrace)
                        && !self.options.allow_trailing_commas
                    {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::TrailingCommaNotAllowed,
                            comma_offset,
                            self.source,
                        ));
                    }
                    needs_comma = false;
                }
                Some(SyntaxKind::StringLit | SyntaxKind::WordLit) => {
                    if needs_comma && !self.options.allow_missing_commas {
                        return Err(self.error_here(SyntaxErrorKind::ExpectedComma));
                    }
                    let name = if self.current_kind() == Some(SyntaxKind::WordLit) {
                        if !self.options.allow_loose_object_property_names {
                            return Err(
                                self.error_here(SyntaxErrorKind::WordPropertyNameNotAllowed)
                            );
                        }
                        self.tokens[self.pos].text.clone()
                    } else {
                        self.decode_current_string()?
                    };
                    self.pos += 1;
                    self.skip_trivia();
                    if self.current_kind() != Some(SyntaxKind::Colon) {
                        return Err(self.error_here(SyntaxErrorKind::ExpectedColon));
                    }
                    self.pos += 1;
                    self.skip_trivia();
                    let value = self.parse_value()?;
                    map.insert(name, value);
                    self.skip_trivia();
                    needs_comma = true;
                }
                Some(
                    SyntaxKind::NumberLit | SyntaxKind::BooleanLit | SyntaxKind::NullKeyword,
                ) => {
                    return Err(self.error_here(SyntaxErrorKind::ExpectedPropertyName));
                }
                Some(_) => return Err(self.unexpected_token()),
                None => return Err(self.error_here(SyntaxErrorKind::UnexpectedEof)),
            }
        }
        Ok(Value::Object(map))
    }

    fn parse_array(&mut self) -> Result<Value, SyntaxError> {
        self.pos += 1; // `[`
        self.skip_trivia();
        let mut items = Vec::new();
        let mut needs_comma = false;
        loop {
            match self.current_kind() {
                Some(SyntaxKind::CloseBracket) => {
                    self.pos += 1;
                    break;
                }
                Some(SyntaxKind::Comma) => {
                    if !needs_comma {
                        return Err(self.unexpected_token());
                    }
                    let comma_offset = self.current_offset();
                    self.pos += 1;
                    self.skip_trivia();
                    if self.current_kind() == Some(SyntaxKind::CloseBracket)
                        && !self.options.allow_trailing_commas
                    {
                        return Err(SyntaxError::new(
                            SyntaxErrorKind::TrailingCommaNotAllowed,
                            comma_offset,
                            self.source,
                        ));
                    }
                    needs_comma = false;
                }
                Some(_) => {
                    if needs_comma && !self.options.allow_missing_commas {
                        return Err(self.error_here(SyntaxErrorKind::ExpectedComma));
                    }
                    items.push(self.parse_value()?);
                    self.skip_trivia();
                    needs_comma = true;
                }
                None => return Err(self.error_here(SyntaxErrorKind::UnexpectedEof)),
            }
        }
        Ok(Value::Array(items))
    }

    fn decode_current_string(&self) -> Result<String, SyntaxError> {
        decode_string(&self.tokens[self.pos].text).map_err(|_| {
            SyntaxError::new(
                SyntaxErrorKind::InvalidUnicodeEscape,
                self.current_offset(),
                self.source,
            )
        })
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn current_kind(&self) -> Option<SyntaxKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn current_offset(&self) -> usize {
        match self.tokens.get(self.pos) {
            Some(token) => token.span.start,
            None => self.source.len(),
        }
    }

    fn skip_trivia(&mut self) {
        while self
            .current_kind()
            .is_some_and(|kind| kind.is_trivia())
        {
            self.pos += 1;
        }
    }

    fn unexpected_token(&self) -> SyntaxError {
        let text = self
            .tokens
            .get(self.pos)
            .map(|t| t.text.clone())
            .unwrap_or_default();
        self.error_here(SyntaxErrorKind::UnexpectedToken(text))
    }

    fn error_here(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.current_offset(), self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn to_value(text: &str) -> Option<Value> {
        parse_to_value(text, &ParseOptions::permissive()).expect("parse succeeds")
    }

    #[test]
    fn test_scalars() {
        assert_eq!(to_value("null"), Some(Value::Null));
        assert_eq!(to_value("true"), Some(json!(true)));
        assert_eq!(to_value("42"), Some(json!(42)));
        assert_eq!(to_value("1.5"), Some(json!(1.5)));
        assert_eq!(to_value("\"hi\""), Some(json!("hi")));
        assert_eq!(to_value("  \n"), None);
    }

    #[test]
    fn test_nested_structures() {
        let value = to_value(r#"{"a": [1, {"b": null}], "c": "d"}"#).unwrap();
        assert_eq!(value, json!({"a": [1, {"b": null}], "c": "d"}));
    }

    #[test]
    fn test_comments_are_discarded() {
        let value = to_value("{\n  // note\n  \"a\": 1, /* x */\n}").unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_property_order_preserved() {
        let value = to_value(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let value = to_value(r#"{"a": 1, "a": 2}"#).unwrap();
        assert_eq!(value, json!({"a": 2}));
    }

    #[test]
    fn test_number_fallback_to_source_text() {
        // Not representable as a finite double: keep the literal text.
        assert_eq!(to_value("0x1F"), Some(json!("0x1F")));
        assert_eq!(to_value("1e999"), Some(json!("1e999")));
        // Large integers outside i64 but inside u64 stay numeric.
        assert_eq!(to_value("18446744073709551615"), Some(json!(u64::MAX)));
    }

    #[test]
    fn test_matches_cst_to_value() {
        let source = "{\n  \"a\": [1, 2e3], // c\n  \"b\": {\"c\": false},\n}";
        let root = CstRootNode::parse(source, &ParseOptions::permissive()).unwrap();
        let via_cst = root.to_value().unwrap();
        let direct = parse_to_value(source, &ParseOptions::permissive()).unwrap();
        assert_eq!(via_cst, direct);
    }

    #[test]
    fn test_property_without_value_error() {
        // Only reachable through a hand-built tree; the parser rejects it.
        let root = CstRootNode::parse(r#"{"a": 1}"#, &ParseOptions::permissive()).unwrap();
        let prop = root.as_object().unwrap().get("a").unwrap();
        let value = prop.value().unwrap();
        value.remove().unwrap();
        assert_eq!(
            root.to_value(),
            Err(ConversionError::PropertyWithoutValue("a".to_string()))
        );
    }

    #[test]
    fn test_strict_options_apply() {
        let result = parse_to_value("{ // c\n}", &ParseOptions::strict());
        assert!(result.is_err());
        let value = parse_to_value("{}", &ParseOptions::strict()).unwrap();
        assert_eq!(value, Some(json!({})));
    }
}
