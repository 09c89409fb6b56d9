//! Recursive-descent parser building the lossless CST
//!
//! Every scanned token, trivia included, is attached to the enclosing
//! container in source order. Trivia that precedes the first significant
//! token inside a container and trivia that follows the last one both belong
//! to that container, never to a sibling. Inside a property, only the trivia
//! between the name and the value belongs to the property; everything after
//! the value belongs to the surrounding object.

use crate::cst::lexer::{lex, Token};
use crate::cst::nodes::SyntaxNode;
use crate::cst::SyntaxKind;
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::options::ParseOptions;

/// Parse source text into a root node.
pub(crate) fn parse_document(
    source: &str,
    options: &ParseOptions,
) -> Result<SyntaxNode, SyntaxError> {
    let tokens = lex(source, options)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        options,
        source,
    };
    let root = parser.parse_root()?;
    tracing::debug!(len = source.len(), "parsed jsonc document");
    Ok(root)
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    options: &'a ParseOptions,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn parse_root(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let root = SyntaxNode::new_container(SyntaxKind::Root);

        self.consume_trivia_into(&root);
        if !self.at_end() {
            let value = self.parse_value()?;
            root.append_raw(value);
            self.consume_trivia_into(&root);
            if !self.at_end() {
                return Err(self.error_here(SyntaxErrorKind::UnexpectedTrailingContent));
            }
        }

        Ok(root)
    }

    fn parse_value(&mut self) -> Result<SyntaxNode, SyntaxError> {
        match self.current_kind() {
            Some(SyntaxKind::OpenBrace) => self.parse_object(),
            Some(SyntaxKind::OpenBracket) => self.parse_array(),
            Some(
                SyntaxKind::StringLit
                | SyntaxKind::NumberLit
                | SyntaxKind::BooleanLit
                | SyntaxKind::NullKeyword,
            ) => Ok(self.take_leaf()),
            Some(_) => Err(self.unexpected_token()),
            None => Err(self.error_here(SyntaxErrorKind::UnexpectedEof)),
        }
    }

    fn parse_object(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let object = SyntaxNode::new_container(SyntaxKind::Object);
        object.append_raw(self.take_leaf()); // `{`
        self.consume_trivia_into(&object);

        let mut needs_comma = false;
        loop {
            match self.current_kind() {
                Some(SyntaxKind::CloseBrace) => {
                    object.append_raw(self.take_leaf());
                    break;
                }
                Some(SyntaxKind::Comma) => {
                    if !needs_comma {
                        return Err(self.unexpected_token());
                    }
                    let comma_offset = self.current_offset();
                    object.append_raw(self.take_leaf());
                    self.consume_trivia_into(&object);
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
                    if self.current_kind() == Some(SyntaxKind::WordLit)
                        && !self.options.allow_loose_object_property_names
                    {
                        return Err(self.error_here(SyntaxErrorKind::WordPropertyNameNotAllowed));
                    }
                    let prop = self.parse_property()?;
                    object.append_raw(prop);
                    self.consume_trivia_into(&object);
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

        Ok(object)
    }

    fn parse_property(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let prop = SyntaxNode::new_container(SyntaxKind::ObjectProp);
        prop.append_raw(self.take_leaf()); // name
        self.consume_trivia_into(&prop);

        if self.current_kind() != Some(SyntaxKind::Colon) {
            return Err(self.error_here(SyntaxErrorKind::ExpectedColon));
        }
        prop.append_raw(self.take_leaf());
        self.consume_trivia_into(&prop);

        if self.at_end() {
            return Err(self.error_here(SyntaxErrorKind::UnexpectedEof));
        }
        let value = self.parse_value()?;
        prop.append_raw(value);

        Ok(prop)
    }

    fn parse_array(&mut self) -> Result<SyntaxNode, SyntaxError> {
        let array = SyntaxNode::new_container(SyntaxKind::Array);
        array.append_raw(self.take_leaf()); // `[`
        self.consume_trivia_into(&array);

        let mut needs_comma = false;
        loop {
            match self.current_kind() {
                Some(SyntaxKind::CloseBracket) => {
                    array.append_raw(self.take_leaf());
                    break;
                }
                Some(SyntaxKind::Comma) => {
                    if !needs_comma {
                        return Err(self.unexpected_token());
                    }
                    let comma_offset = self.current_offset();
                    array.append_raw(self.take_leaf());
                    self.consume_trivia_into(&array);
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
                    let value = self.parse_value()?;
                    array.append_raw(value);
                    self.consume_trivia_into(&array);
                    needs_comma = true;
                }
                None => return Err(self.error_here(SyntaxErrorKind::UnexpectedEof)),
            }
        }

        Ok(array)
    }

    // ==================
    // Token helpers
    // ==================

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

    /// Turn the current token into a leaf node and advance.
    fn take_leaf(&mut self) -> SyntaxNode {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        SyntaxNode::new_leaf(token.kind, token.text.clone())
    }

    /// Attach all upcoming trivia tokens to `container`.
    fn consume_trivia_into(&mut self, container: &SyntaxNode) {
        while let Some(kind) = self.current_kind() {
            if kind.is_trivia() {
                container.append_raw(self.take_leaf());
            } else {
                break;
            }
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
