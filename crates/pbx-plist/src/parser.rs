//! Parser for the legacy plist syntax with inline comments.
//!
//! Grammar (whitespace and comments allowed between tokens):
//!
//! ```text
//! value      := dictionary | array | string
//! dictionary := '{' (string '=' value ';')* '}'
//! array      := '(' (value (',' value)* ','?)? ')'
//! string     := '"' escaped* '"' | bare
//! ```
//!
//! A `/* ... */` comment that directly follows a string is kept on that
//! string; every other comment (section banners, `// !$*UTF8*$!`) is dropped.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{PlistError, Result};
use crate::value::{PlistDictionary, PlistString, PlistValue};

/// Parse a complete document into its top-level value.
pub fn parse_plist(input: &str) -> Result<PlistValue> {
    Parser::new(input).parse_document()
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn parse_document(mut self) -> Result<PlistValue> {
        self.skip_trivia()?;
        let value = self.parse_value()?;
        self.skip_trivia()?;
        if self.pos < self.bytes.len() {
            let (line, column) = self.location(self.pos);
            return Err(PlistError::TrailingContent { line, column });
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<PlistValue> {
        match self.peek() {
            None => Err(PlistError::UnexpectedEof {
                expected: "a value",
            }),
            Some(b'{') => self.parse_dictionary().map(PlistValue::Dictionary),
            Some(b'(') => self.parse_array().map(PlistValue::Array),
            Some(_) => self.parse_string().map(PlistValue::String),
        }
    }

    fn parse_dictionary(&mut self) -> Result<PlistDictionary> {
        self.expect(b'{', "'{'")?;
        let mut dict = PlistDictionary::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(dict);
                }
                Some(b'{' | b'(') => return Err(self.unexpected("a dictionary key")),
                _ => {}
            }
            let key = self.parse_string()?;
            self.skip_trivia()?;
            self.expect(b'=', "'='")?;
            self.skip_trivia()?;
            let value = self.parse_value()?;
            self.skip_trivia()?;
            self.expect(b';', "';'")?;
            dict.push(key, value);
        }
    }

    fn parse_array(&mut self) -> Result<Vec<PlistValue>> {
        self.expect(b'(', "'('")?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b')') {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    return Ok(items);
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }
    }

    fn parse_string(&mut self) -> Result<PlistString> {
        let (value, quoted) = if self.peek() == Some(b'"') {
            (self.parse_quoted()?, true)
        } else {
            (self.parse_bare()?, false)
        };
        let comment = self.trailing_comment()?;
        Ok(PlistString::from_parts(value, comment, quoted))
    }

    fn parse_quoted(&mut self) -> Result<String> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    return Err(PlistError::UnterminatedString {
                        line: self.location(start).0,
                    });
                }
                Some(b'\\') => self.pos += 2,
                Some(b'"') => break,
                Some(_) => self.pos += 1,
            }
        }
        let raw = &self.src[start + 1..self.pos];
        self.pos += 1;
        unescape(raw, self.location(start).0)
    }

    fn parse_bare(&mut self) -> Result<String> {
        let start = self.pos;
        while let Some(byte) = self.peek() {
            if byte.is_ascii_whitespace()
                || matches!(byte, b'{' | b'}' | b'(' | b')' | b'=' | b';' | b',' | b'"')
                || self.at("/*")
            {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected("a value"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    /// A `/* ... */` directly after a scalar, separated only by whitespace.
    fn trailing_comment(&mut self) -> Result<Option<String>> {
        self.skip_whitespace();
        if !self.at("/*") {
            return Ok(None);
        }
        let start = self.pos;
        let body = self.pos + 2;
        let end = self.src[body..]
            .find("*/")
            .map(|offset| body + offset)
            .ok_or_else(|| PlistError::UnterminatedComment {
                line: self.location(start).0,
            })?;
        self.pos = end + 2;
        Ok(Some(self.src[body..end].trim().to_string()))
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.at("/*") {
                let start = self.pos;
                match self.src[self.pos + 2..].find("*/") {
                    Some(offset) => self.pos += 2 + offset + 2,
                    None => {
                        return Err(PlistError::UnterminatedComment {
                            line: self.location(start).0,
                        });
                    }
                }
            } else if self.at("//") {
                match self.src[self.pos..].find('\n') {
                    Some(offset) => self.pos += offset + 1,
                    None => self.pos = self.bytes.len(),
                }
            } else {
                return Ok(());
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<()> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> PlistError {
        match self.src[self.pos..].chars().next() {
            None => PlistError::UnexpectedEof { expected },
            Some(found) => {
                let (line, column) = self.location(self.pos);
                PlistError::UnexpectedCharacter {
                    line,
                    column,
                    found,
                    expected,
                }
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn at(&self, token: &str) -> bool {
        self.bytes[self.pos..].starts_with(token.as_bytes())
    }

    fn location(&self, offset: usize) -> (usize, usize) {
        let before = &self.src[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

fn unescape(raw: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(escape) = chars.next() else {
            return Err(PlistError::InvalidEscape {
                line,
                sequence: String::new(),
            });
        };
        let decoded = match escape {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'v' => '\u{0b}',
            '"' | '\\' | '\'' => escape,
            'U' | 'u' => unicode_escape(&mut chars, escape, line)?,
            '0'..='7' => octal_escape(&mut chars, escape, line)?,
            other => {
                return Err(PlistError::InvalidEscape {
                    line,
                    sequence: other.to_string(),
                });
            }
        };
        out.push(decoded);
    }
    Ok(out)
}

fn unicode_escape(chars: &mut Peekable<Chars<'_>>, marker: char, line: usize) -> Result<char> {
    let digits: String = (0..4).filter_map(|_| chars.next()).collect();
    u32::from_str_radix(&digits, 16)
        .ok()
        .filter(|_| digits.len() == 4)
        .and_then(char::from_u32)
        .ok_or(PlistError::InvalidEscape {
            line,
            sequence: format!("{marker}{digits}"),
        })
}

fn octal_escape(chars: &mut Peekable<Chars<'_>>, first: char, line: usize) -> Result<char> {
    let mut digits = String::from(first);
    while digits.len() < 3 {
        match chars.peek() {
            Some(c @ '0'..='7') => {
                digits.push(*c);
                chars.next();
            }
            _ => break,
        }
    }
    u32::from_str_radix(&digits, 8)
        .ok()
        .and_then(char::from_u32)
        .ok_or(PlistError::InvalidEscape {
            line,
            sequence: digits,
        })
}
