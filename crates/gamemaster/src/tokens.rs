//! Token tape over a Game Master document.
//!
//! `serde_json` does the lexing; the parsed value is flattened into a
//! pre-order array of [`Token`]s with parent, first-child and next-sibling
//! links so the rest of the pipeline can walk the document by index, jump
//! back to any entry, and never re-tokenize.
//!
//! Objects follow the jsmn layout: an object's children are its key tokens
//! and each key has exactly one child, the member value.

use serde_json::Value;

use crate::error::IngestError;

/// Index of a token in a [`TokenTape`].
pub type TokenId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Object,
    Array,
    String,
    /// Number, boolean or null.
    Primitive,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub parent: Option<TokenId>,
    pub first_child: Option<TokenId>,
    pub next_sibling: Option<TokenId>,
    /// Number of direct children (members for objects, elements for arrays,
    /// one for object keys).
    pub size: usize,
    /// Decoded string contents or the literal text of a primitive.
    text: Box<str>,
}

impl Token {
    fn new(kind: TokenKind, parent: Option<TokenId>, text: Box<str>) -> Self {
        Self {
            kind,
            parent,
            first_child: None,
            next_sibling: None,
            size: 0,
            text,
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, TokenKind::Object | TokenKind::Array)
    }
}

/// Read-only, randomly addressable token sequence.
#[derive(Debug, Clone, Default)]
pub struct TokenTape {
    tokens: Vec<Token>,
}

impl TokenTape {
    /// Tokenize a document. A malformed document yields
    /// [`IngestError::Tokenize`] and no tape.
    pub fn parse(doc: &str) -> Result<Self, IngestError> {
        let value: Value = serde_json::from_str(doc)?;
        Ok(Self::from_value(&value))
    }

    /// Flatten an already parsed value.
    pub fn from_value(value: &Value) -> Self {
        let mut tape = TokenTape { tokens: Vec::new() };
        tape.push_value(value, None);
        tape
    }

    fn push(&mut self, token: Token) -> TokenId {
        self.tokens.push(token);
        self.tokens.len() - 1
    }

    /// Link `child` as the next child of `parent`, after `prev`.
    fn link(&mut self, parent: TokenId, prev: Option<TokenId>, child: TokenId) {
        match prev {
            Some(p) => self.tokens[p].next_sibling = Some(child),
            None => self.tokens[parent].first_child = Some(child),
        }
        self.tokens[parent].size += 1;
    }

    fn push_value(&mut self, value: &Value, parent: Option<TokenId>) -> TokenId {
        match value {
            Value::Object(map) => {
                let idx = self.push(Token::new(TokenKind::Object, parent, "".into()));
                let mut prev = None;
                for (key, member) in map {
                    let key_idx = self.push(Token::new(
                        TokenKind::String,
                        Some(idx),
                        key.as_str().into(),
                    ));
                    let value_idx = self.push_value(member, Some(key_idx));
                    self.link(key_idx, None, value_idx);
                    self.link(idx, prev, key_idx);
                    prev = Some(key_idx);
                }
                idx
            }
            Value::Array(items) => {
                let idx = self.push(Token::new(TokenKind::Array, parent, "".into()));
                let mut prev = None;
                for item in items {
                    let item_idx = self.push_value(item, Some(idx));
                    self.link(idx, prev, item_idx);
                    prev = Some(item_idx);
                }
                idx
            }
            Value::String(s) => self.push(Token::new(TokenKind::String, parent, s.as_str().into())),
            Value::Number(n) => {
                self.push(Token::new(TokenKind::Primitive, parent, n.to_string().into()))
            }
            Value::Bool(b) => {
                self.push(Token::new(TokenKind::Primitive, parent, b.to_string().into()))
            }
            Value::Null => self.push(Token::new(TokenKind::Primitive, parent, "null".into())),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The document's top level token.
    #[inline]
    pub fn root(&self) -> TokenId {
        0
    }

    #[inline]
    pub fn get(&self, idx: TokenId) -> Option<&Token> {
        self.tokens.get(idx)
    }

    #[inline]
    pub fn kind(&self, idx: TokenId) -> Option<TokenKind> {
        self.tokens.get(idx).map(|t| t.kind)
    }

    /// Text of a string or primitive token; empty for containers.
    #[inline]
    pub fn text(&self, idx: TokenId) -> &str {
        self.tokens.get(idx).map(Token::text).unwrap_or("")
    }

    /// String contents, `None` unless the token is a string.
    pub fn as_str(&self, idx: TokenId) -> Option<&str> {
        self.tokens
            .get(idx)
            .filter(|t| t.kind == TokenKind::String)
            .map(Token::text)
    }

    fn primitive(&self, idx: TokenId) -> Option<&str> {
        self.tokens
            .get(idx)
            .filter(|t| t.kind == TokenKind::Primitive)
            .map(Token::text)
    }

    /// Integer value; a float with no fractional part (`118.0`) counts.
    pub fn as_i64(&self, idx: TokenId) -> Option<i64> {
        if let Ok(n) = self.primitive(idx)?.parse() {
            return Some(n);
        }
        let f = self.as_f64(idx)?;
        let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&f);
        (f.fract() == 0.0 && in_range).then_some(f as i64)
    }

    pub fn as_u64(&self, idx: TokenId) -> Option<u64> {
        self.primitive(idx)?.parse().ok()
    }

    pub fn as_f64(&self, idx: TokenId) -> Option<f64> {
        let text = self.primitive(idx)?;
        match text {
            "true" | "false" | "null" => None,
            _ => text.parse().ok(),
        }
    }

    pub fn as_bool(&self, idx: TokenId) -> Option<bool> {
        match self.primitive(idx)? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Direct children of a token, in document order.
    pub fn children(&self, idx: TokenId) -> Children<'_> {
        Children {
            tape: self,
            next: self.tokens.get(idx).and_then(|t| t.first_child),
        }
    }

    /// Value token of `key` in object `obj`.
    pub fn member(&self, obj: TokenId, key: &str) -> Option<TokenId> {
        if self.kind(obj)? != TokenKind::Object {
            return None;
        }
        self.children(obj)
            .find(|&k| self.text(k) == key)
            .and_then(|k| self.tokens[k].first_child)
    }

    /// Whether `idx` lies inside the subtree rooted at `ancestor`.
    pub fn is_within(&self, idx: TokenId, ancestor: TokenId) -> bool {
        let mut cur = Some(idx);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.tokens.get(c).and_then(|t| t.parent);
        }
        false
    }
}

/// Iterator over a token's direct children.
pub struct Children<'t> {
    tape: &'t TokenTape,
    next: Option<TokenId>,
}

impl Iterator for Children<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let cur = self.next?;
        self.next = self.tape.tokens.get(cur).and_then(|t| t.next_sibling);
        Some(cur)
    }
}
