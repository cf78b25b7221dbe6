//! Parser for Java-style type strings used by serialized units and configs.
//!
//! ```text
//! type  := atom ("[" "]")*
//! atom  := "?" | name ("<" type ("," type)* ">")?
//! name  := ident ("." ident)*
//! ```
//!
//! A bare primitive keyword (`int`, `boolean`, ..., `String`) is a primitive;
//! every other name is taken as a fully-qualified class name.

use crate::intern::TypeInterner;
use crate::types::{PrimitiveKind, TypeId, TypeList};
use retype_common::limits::{MAX_TYPE_NESTING_DEPTH, MAX_TYPE_STRING_LEN};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError {
    pub input: String,
    pub position: usize,
    pub message: &'static str,
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid type '{}' at offset {}: {}",
            self.input, self.position, self.message
        )
    }
}

impl std::error::Error for TypeParseError {}

pub fn parse_type(db: &TypeInterner, input: &str) -> Result<TypeId, TypeParseError> {
    if input.len() > MAX_TYPE_STRING_LEN {
        return Err(TypeParseError {
            input: input.chars().take(64).collect(),
            position: MAX_TYPE_STRING_LEN,
            message: "type string too long",
        });
    }
    let mut parser = TypeStringParser {
        db,
        input,
        bytes: input.as_bytes(),
        pos: 0,
    };
    let ty = parser.parse_type(0)?;
    parser.skip_ws();
    if parser.pos != parser.bytes.len() {
        return Err(parser.error("unexpected trailing characters"));
    }
    Ok(ty)
}

struct TypeStringParser<'a> {
    db: &'a TypeInterner,
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> TypeStringParser<'a> {
    fn error(&self, message: &'static str) -> TypeParseError {
        TypeParseError {
            input: self.input.to_string(),
            position: self.pos,
            message,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self, depth: u32) -> Result<TypeId, TypeParseError> {
        if depth >= MAX_TYPE_NESTING_DEPTH {
            return Err(self.error("type nesting too deep"));
        }
        let mut ty = self.parse_atom(depth)?;
        while self.eat(b'[') {
            if !self.eat(b']') {
                return Err(self.error("expected ']'"));
            }
            if ty.is_unknown() {
                return Err(self.error("array of unknown type"));
            }
            ty = self.db.array(ty);
        }
        Ok(ty)
    }

    fn parse_atom(&mut self, depth: u32) -> Result<TypeId, TypeParseError> {
        if self.eat(b'?') {
            return Ok(TypeId::UNKNOWN);
        }
        let name = self.parse_name()?;
        if self.eat(b'<') {
            let mut args = TypeList::new();
            loop {
                args.push(self.parse_type(depth + 1)?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
            if PrimitiveKind::from_keyword(name).is_some() {
                return Err(self.error("primitive types take no type arguments"));
            }
            let base = self.db.intern_name(name);
            return Ok(self.db.parameterized(base, args));
        }
        if let Some(kind) = PrimitiveKind::from_keyword(name) {
            return Ok(kind.type_id());
        }
        Ok(self.db.nominal(name))
    }

    fn parse_name(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_ws();
        let start = self.pos;
        let mut expect_ident = true;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                expect_ident = false;
                self.pos += 1;
            } else if b == b'.' && !expect_ident {
                expect_ident = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        if expect_ident {
            return Err(self.error("type name ends with '.'"));
        }
        let input = self.input;
        Ok(&input[start..self.pos])
    }
}
