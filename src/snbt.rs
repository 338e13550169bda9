//! Repairing SNBT reader.
//!
//! FTB Quests writes its chapter files in SNBT, which is close to JSON but not
//! close enough for `serde_json`: keys are bare, entries are separated by
//! newlines instead of commas, numbers carry NBT type suffixes, strings may be
//! single-quoted and may contain raw control characters. This module reads
//! all of that into a plain `serde_json::Value` tree, keeping key order.

use crate::error::{ParseError, Result};
use crate::nbt_norm::classify_bare;
use serde_json::{Map, Value};

const CONTEXT_RADIUS: usize = 24;
const MAX_DEPTH: usize = 256;

/// Parse SNBT text into a generic value tree.
pub fn parse(raw: &str) -> Result<Value> {
    SnbtParser::new(raw).parse()
}

pub struct SnbtParser<'a> {
    data: &'a str,
    cursor: usize,
    depth: usize,
}

impl<'a> SnbtParser<'a> {
    pub fn new(data: &'a str) -> SnbtParser<'a> {
        // skip a UTF-8 byte order mark but keep offsets relative to the input
        let cursor = if data.starts_with('\u{feff}') { 3 } else { 0 };
        SnbtParser {
            data,
            cursor,
            depth: 0,
        }
    }

    pub fn parse(mut self) -> Result<Value> {
        self.skip_whitespace();
        let value = self.parse_value()?;
        self.skip_whitespace();
        if self.cursor < self.data.len() {
            return Err(self.malformed("unexpected content after the root value"));
        }
        Ok(value)
    }

    fn peek(&self) -> Option<char> {
        self.data[self.cursor..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.cursor += c.len_utf8();
        }
    }

    /// Entries may be separated by a comma, by whitespace alone, or by both.
    fn skip_separator(&mut self, close: char) -> Result<()> {
        let before = self.cursor;
        self.skip_whitespace();
        match self.peek() {
            Some(',') => {
                self.cursor += 1;
                Ok(())
            }
            Some(c) if c == close => Ok(()),
            // the enclosing loop reports the missing close
            None => Ok(()),
            Some(_) if self.cursor > before => Ok(()),
            Some(_) => Err(self.malformed(&format!("expected ',' or '{close}'"))),
        }
    }

    fn parse_value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('{') => {
                self.enter()?;
                let value = self.parse_compound();
                self.depth -= 1;
                value
            }
            Some('[') => {
                self.enter()?;
                let value = self.parse_list();
                self.depth -= 1;
                value
            }
            Some(quote @ ('"' | '\'')) => {
                self.cursor += 1;
                Ok(Value::String(self.parse_quoted(quote)?))
            }
            Some(_) => {
                let token = self.read_bare();
                if token.is_empty() {
                    return Err(self.malformed("expected a value"));
                }
                Ok(classify_bare(token))
            }
            None => Err(self.malformed("unexpected end of input, expected a value")),
        }
    }

    /// Step into a compound or list, refusing input nested past `MAX_DEPTH`.
    fn enter(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.malformed("nesting too deep"));
        }
        self.depth += 1;
        self.cursor += 1;
        Ok(())
    }

    fn parse_compound(&mut self) -> Result<Value> {
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('}') => {
                    self.cursor += 1;
                    return Ok(Value::Object(map));
                }
                None => return Err(self.malformed("compound not closed, expected '}'")),
                _ => {}
            }

            let key = self.parse_key()?;
            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(self.malformed("expected ':' after key"));
            }
            self.cursor += 1;
            self.skip_whitespace();
            let value = self.parse_value()?;
            map.insert(key, value);

            self.skip_separator('}')?;
        }
    }

    fn parse_key(&mut self) -> Result<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.cursor += 1;
                self.parse_quoted(quote)
            }
            _ => {
                let key = self.read_bare();
                if key.is_empty() {
                    return Err(self.malformed("expected a key"));
                }
                Ok(key.to_string())
            }
        }
    }

    fn parse_list(&mut self) -> Result<Value> {
        self.skip_array_type_prefix();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.cursor += 1;
                    return Ok(Value::Array(items));
                }
                None => return Err(self.malformed("list not closed, expected ']'")),
                _ => {}
            }

            items.push(self.parse_value()?);

            self.skip_separator(']')?;
        }
    }

    /// `[I; 1, 2, 3]` style typed arrays read as plain lists.
    fn skip_array_type_prefix(&mut self) {
        let rest = self.data[self.cursor..].trim_start();
        let mut chars = rest.chars();
        if let (Some('B' | 'I' | 'L'), Some(';')) = (chars.next(), chars.next()) {
            self.cursor = self.data.len() - rest.len() + 2;
        }
    }

    fn read_bare(&mut self) -> &'a str {
        let data = self.data;
        let start = self.cursor;
        while let Some(c) = self.peek() {
            if !is_bare_char(c) {
                break;
            }
            self.cursor += 1;
        }
        &data[start..self.cursor]
    }

    /// Reads the body of a quoted string; the opening quote is already consumed.
    fn parse_quoted(&mut self, quote: char) -> Result<String> {
        let start = self.cursor - 1;
        let mut out = String::new();
        loop {
            let Some(c) = self.bump() else {
                return Err(ParseError::Malformed {
                    position: start,
                    context: self.excerpt(start, "string not terminated"),
                });
            };
            match c {
                c if c == quote => return Ok(out),
                '\\' => self.parse_escape(&mut out)?,
                // raw newlines and tabs are kept as-is
                c => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<()> {
        let Some(c) = self.bump() else {
            return Err(self.malformed("string not terminated after '\\'"));
        };
        match c {
            '\\' | '"' | '\'' | '/' => out.push(c),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'u' => match self.read_unicode_escape() {
                Some(ch) => out.push(ch),
                None => out.push_str("\\u"),
            },
            // `\&` and friends are formatting escapes, not string escapes
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    /// Reads the hex digits of a `\u` escape, joining surrogate pairs.
    fn read_unicode_escape(&mut self) -> Option<char> {
        let first = self.read_hex4()?;
        if !(0xD800..0xDC00).contains(&first) {
            let ch = char::from_u32(u32::from(first));
            return Some(ch.unwrap_or(char::REPLACEMENT_CHARACTER));
        }

        let save = self.cursor;
        if self.data[self.cursor..].starts_with("\\u") {
            self.cursor += 2;
            if let Some(second) = self.read_hex4()
                && (0xDC00..0xE000).contains(&second)
            {
                let high = u32::from(first) - 0xD800;
                let low = u32::from(second) - 0xDC00;
                let code = 0x10000 + (high << 10) + low;
                return Some(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
        self.cursor = save;
        Some(char::REPLACEMENT_CHARACTER)
    }

    fn read_hex4(&mut self) -> Option<u16> {
        let hex = self.data.get(self.cursor..self.cursor + 4)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let code = u16::from_str_radix(hex, 16).ok()?;
        self.cursor += 4;
        Some(code)
    }

    fn malformed(&self, reason: &str) -> ParseError {
        ParseError::Malformed {
            position: self.cursor,
            context: self.excerpt(self.cursor, reason),
        }
    }

    fn excerpt(&self, at: usize, reason: &str) -> String {
        let mut from = at.saturating_sub(CONTEXT_RADIUS);
        while !self.data.is_char_boundary(from) {
            from -= 1;
        }
        let mut to = (at + CONTEXT_RADIUS).min(self.data.len());
        while !self.data.is_char_boundary(to) {
            to += 1;
        }
        format!("{reason} near {:?}", &self.data[from..to])
    }
}

fn is_bare_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+')
}
