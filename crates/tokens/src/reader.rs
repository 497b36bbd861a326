//! JSON token reader with cursor tracking.

use crate::error::TokenError;
use crate::token::Token;

#[derive(Debug, Clone)]
enum Frame {
    /// `first` is true until the first element has been read;
    /// `pending_value` is true between a field name and its value.
    Object { first: bool, pending_value: bool },
    Array { first: bool },
}

/// A cursor over UTF-8 JSON text that yields one [`Token`] per call.
///
/// The reader tracks object/array nesting in a context stack, so it can tell
/// field names from string values and reject unbalanced end tokens. Cloning a
/// reader checkpoints it: the clone and the original advance independently
/// over the same underlying slice.
///
/// # Example
///
/// ```
/// use json_model_tokens::{Token, TokenReader};
///
/// let mut reader = TokenReader::new(b"{\"a\":1}");
/// assert_eq!(reader.next().unwrap(), Token::ObjectStart);
/// assert_eq!(reader.next().unwrap(), Token::FieldName("a".into()));
/// assert_eq!(reader.next().unwrap(), Token::Integer(1));
/// assert_eq!(reader.next().unwrap(), Token::ObjectEnd);
/// ```
#[derive(Debug, Clone)]
pub struct TokenReader<'a> {
    data: &'a [u8],
    x: usize,
    stack: Vec<Frame>,
}

impl<'a> TokenReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            x: 0,
            stack: Vec::new(),
        }
    }

    /// Resets the reader onto a new byte slice.
    pub fn reset(&mut self, data: &'a [u8]) {
        self.data = data;
        self.x = 0;
        self.stack.clear();
    }

    /// Current byte offset of the cursor.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Verifies that only whitespace remains after the cursor.
    pub fn end(&self) -> Result<(), TokenError> {
        let mut x = self.x;
        while x < self.data.len() && self.data[x].is_ascii_whitespace() {
            x += 1;
        }
        if x < self.data.len() {
            return Err(TokenError::TrailingData(x));
        }
        Ok(())
    }

    /// Returns the next token without consuming it.
    pub fn peek(&self) -> Result<Token, TokenError> {
        self.clone().next()
    }

    /// Reads the next token, advancing the cursor.
    pub fn next(&mut self) -> Result<Token, TokenError> {
        self.skip_ws();
        match self.stack.last_mut() {
            None => self.read_value(),
            Some(Frame::Object {
                first,
                pending_value,
            }) => {
                if *pending_value {
                    *pending_value = false;
                    if self.data.get(self.x) != Some(&b':') {
                        return Err(TokenError::UnexpectedCharacter(self.x));
                    }
                    self.x += 1;
                    self.skip_ws();
                    return self.read_value();
                }
                if self.data.get(self.x) == Some(&b'}') {
                    self.x += 1;
                    self.stack.pop();
                    return Ok(Token::ObjectEnd);
                }
                if *first {
                    *first = false;
                } else {
                    if self.data.get(self.x) != Some(&b',') {
                        return Err(TokenError::UnexpectedCharacter(self.x));
                    }
                    self.x += 1;
                    self.skip_ws();
                }
                if self.data.get(self.x) != Some(&b'"') {
                    return Err(TokenError::UnexpectedCharacter(self.x));
                }
                let name = self.read_string()?;
                if let Some(Frame::Object { pending_value, .. }) = self.stack.last_mut() {
                    *pending_value = true;
                }
                Ok(Token::FieldName(name))
            }
            Some(Frame::Array { first }) => {
                if self.data.get(self.x) == Some(&b']') {
                    self.x += 1;
                    self.stack.pop();
                    return Ok(Token::ArrayEnd);
                }
                if *first {
                    *first = false;
                } else {
                    if self.data.get(self.x) != Some(&b',') {
                        return Err(TokenError::UnexpectedCharacter(self.x));
                    }
                    self.x += 1;
                    self.skip_ws();
                }
                self.read_value()
            }
        }
    }

    /// Consumes one complete value, however deeply nested.
    ///
    /// The cursor must be positioned at the start of a value; after the call
    /// it sits just past that value's final token.
    pub fn skip_value(&mut self) -> Result<(), TokenError> {
        let mut depth = 0usize;
        loop {
            match self.next()? {
                Token::ObjectStart | Token::ArrayStart => depth += 1,
                Token::ObjectEnd | Token::ArrayEnd => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Token::FieldName(_) => {}
                _ => {
                    if depth == 0 {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn skip_ws(&mut self) {
        while self.x < self.data.len() && self.data[self.x].is_ascii_whitespace() {
            self.x += 1;
        }
    }

    fn read_value(&mut self) -> Result<Token, TokenError> {
        let ch = *self.data.get(self.x).ok_or(TokenError::UnexpectedEof)?;
        match ch {
            b'{' => {
                self.x += 1;
                self.stack.push(Frame::Object {
                    first: true,
                    pending_value: false,
                });
                Ok(Token::ObjectStart)
            }
            b'[' => {
                self.x += 1;
                self.stack.push(Frame::Array { first: true });
                Ok(Token::ArrayStart)
            }
            b'}' | b']' => Err(TokenError::UnbalancedEnd(self.x)),
            b'"' => Ok(Token::Str(self.read_string()?)),
            b't' => {
                self.read_literal(b"true")?;
                Ok(Token::Bool(true))
            }
            b'f' => {
                self.read_literal(b"false")?;
                Ok(Token::Bool(false))
            }
            b'n' => {
                self.read_literal(b"null")?;
                Ok(Token::Null)
            }
            b'-' | b'0'..=b'9' => self.read_number(),
            _ => Err(TokenError::UnexpectedCharacter(self.x)),
        }
    }

    fn read_literal(&mut self, literal: &[u8]) -> Result<(), TokenError> {
        let end = self.x + literal.len();
        if end > self.data.len() || &self.data[self.x..end] != literal {
            return Err(TokenError::InvalidLiteral(self.x));
        }
        self.x = end;
        Ok(())
    }

    fn read_number(&mut self) -> Result<Token, TokenError> {
        let start = self.x;
        let mut integral = true;
        if self.data.get(self.x) == Some(&b'-') {
            self.x += 1;
        }
        while let Some(&ch) = self.data.get(self.x) {
            match ch {
                b'0'..=b'9' => self.x += 1,
                b'.' | b'e' | b'E' | b'+' | b'-' => {
                    integral = false;
                    self.x += 1;
                }
                _ => break,
            }
        }
        // ASCII by construction.
        let text = std::str::from_utf8(&self.data[start..self.x])
            .map_err(|_| TokenError::InvalidNumber(start))?;
        if integral {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Token::Integer(i));
            }
        }
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Ok(Token::Float(f)),
            _ => Err(TokenError::InvalidNumber(start)),
        }
    }

    /// Reads a quoted string starting at the cursor, unescaping as it goes.
    fn read_string(&mut self) -> Result<String, TokenError> {
        self.x += 1; // opening quote
        let mut out: Vec<u8> = Vec::new();
        loop {
            let ch = *self.data.get(self.x).ok_or(TokenError::UnexpectedEof)?;
            match ch {
                b'"' => {
                    self.x += 1;
                    return String::from_utf8(out).map_err(|_| TokenError::InvalidUtf8);
                }
                b'\\' => {
                    self.x += 1;
                    self.read_escape(&mut out)?;
                }
                _ => {
                    out.push(ch);
                    self.x += 1;
                }
            }
        }
    }

    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), TokenError> {
        let at = self.x - 1;
        let ch = *self.data.get(self.x).ok_or(TokenError::UnexpectedEof)?;
        self.x += 1;
        let simple = match ch {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => {
                let unit = self.read_hex4()?;
                let code = if (0xd800..0xdc00).contains(&unit) {
                    // High surrogate: a `\uXXXX` low surrogate must follow.
                    if self.data.get(self.x) != Some(&b'\\')
                        || self.data.get(self.x + 1) != Some(&b'u')
                    {
                        return Err(TokenError::InvalidEscape(at));
                    }
                    self.x += 2;
                    let low = self.read_hex4()?;
                    if !(0xdc00..0xe000).contains(&low) {
                        return Err(TokenError::InvalidEscape(at));
                    }
                    0x10000 + ((unit - 0xd800) << 10) + (low - 0xdc00)
                } else {
                    unit
                };
                let decoded = char::from_u32(code).ok_or(TokenError::InvalidEscape(at))?;
                let mut buf = [0u8; 4];
                out.extend_from_slice(decoded.encode_utf8(&mut buf).as_bytes());
                return Ok(());
            }
            _ => return Err(TokenError::InvalidEscape(at)),
        };
        out.push(simple);
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32, TokenError> {
        let at = self.x;
        let end = self.x + 4;
        if end > self.data.len() {
            return Err(TokenError::UnexpectedEof);
        }
        let text =
            std::str::from_utf8(&self.data[self.x..end]).map_err(|_| TokenError::InvalidEscape(at))?;
        let unit = u32::from_str_radix(text, 16).map_err(|_| TokenError::InvalidEscape(at))?;
        self.x = end;
        Ok(unit)
    }
}
