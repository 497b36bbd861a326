//! JSON token writer.

use crate::token::Token;

#[derive(Debug)]
enum Frame {
    Object { first: bool, pending_value: bool },
    Array { first: bool },
}

/// An in-memory token sink that serializes tokens to UTF-8 JSON bytes.
///
/// The writer inserts `,` and `:` separators from its own context stack, so
/// callers emit tokens only. Writing to a growable buffer cannot fail, which
/// keeps every write method infallible.
///
/// # Example
///
/// ```
/// use json_model_tokens::TokenWriter;
///
/// let mut writer = TokenWriter::new();
/// writer.obj_start();
/// writer.field("a");
/// writer.int(1);
/// writer.obj_end();
/// assert_eq!(writer.flush(), b"{\"a\":1}");
/// ```
#[derive(Debug, Default)]
pub struct TokenWriter {
    out: Vec<u8>,
    stack: Vec<Frame>,
}

impl TokenWriter {
    pub fn new() -> Self {
        Self {
            out: Vec::new(),
            stack: Vec::new(),
        }
    }

    /// Clears the buffer and the context stack.
    pub fn reset(&mut self) {
        self.out.clear();
        self.stack.clear();
    }

    /// Returns the serialized bytes and resets the writer.
    pub fn flush(&mut self) -> Vec<u8> {
        self.stack.clear();
        std::mem::take(&mut self.out)
    }

    /// Writes one token through the matching typed method.
    pub fn token(&mut self, token: &Token) {
        match token {
            Token::ObjectStart => self.obj_start(),
            Token::ObjectEnd => self.obj_end(),
            Token::ArrayStart => self.arr_start(),
            Token::ArrayEnd => self.arr_end(),
            Token::FieldName(name) => self.field(name),
            Token::Str(s) => self.str(s),
            Token::Integer(i) => self.int(*i),
            Token::Float(f) => self.float(*f),
            Token::Bool(b) => self.bool(*b),
            Token::Null => self.null(),
        }
    }

    pub fn obj_start(&mut self) {
        self.begin_value();
        self.out.push(b'{');
        self.stack.push(Frame::Object {
            first: true,
            pending_value: false,
        });
    }

    pub fn obj_end(&mut self) {
        self.stack.pop();
        self.out.push(b'}');
    }

    pub fn arr_start(&mut self) {
        self.begin_value();
        self.out.push(b'[');
        self.stack.push(Frame::Array { first: true });
    }

    pub fn arr_end(&mut self) {
        self.stack.pop();
        self.out.push(b']');
    }

    /// Writes a field name followed by a `:` separator.
    pub fn field(&mut self, name: &str) {
        if let Some(Frame::Object {
            first,
            pending_value,
        }) = self.stack.last_mut()
        {
            if *first {
                *first = false;
            } else {
                self.out.push(b',');
            }
            *pending_value = true;
        }
        self.write_escaped(name);
        self.out.push(b':');
    }

    pub fn str(&mut self, s: &str) {
        self.begin_value();
        self.write_escaped(s);
    }

    pub fn int(&mut self, i: i64) {
        self.begin_value();
        self.out.extend_from_slice(i.to_string().as_bytes());
    }

    /// Writes a float. Integral values keep a `.0` suffix so they lex back as
    /// floats; non-finite values have no JSON form and are written as `null`.
    pub fn float(&mut self, f: f64) {
        self.begin_value();
        if !f.is_finite() {
            self.out.extend_from_slice(b"null");
        } else if f == f.trunc() {
            if f.abs() < 1e15 {
                self.out.extend_from_slice(format!("{f:.1}").as_bytes());
            } else {
                // Exponent form so the value still lexes back as a float.
                self.out.extend_from_slice(format!("{f:e}").as_bytes());
            }
        } else {
            self.out.extend_from_slice(f.to_string().as_bytes());
        }
    }

    pub fn bool(&mut self, b: bool) {
        self.begin_value();
        self.out.extend_from_slice(if b { b"true" } else { b"false" });
    }

    pub fn null(&mut self) {
        self.begin_value();
        self.out.extend_from_slice(b"null");
    }

    /// Emits the element separator a value needs in the current context.
    fn begin_value(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Array { first }) => {
                if *first {
                    *first = false;
                } else {
                    self.out.push(b',');
                }
            }
            Some(Frame::Object { pending_value, .. }) => {
                // A value inside an object only follows a field name.
                *pending_value = false;
            }
            None => {}
        }
    }

    fn write_escaped(&mut self, s: &str) {
        self.out.push(b'"');
        for ch in s.chars() {
            match ch {
                '"' => self.out.extend_from_slice(b"\\\""),
                '\\' => self.out.extend_from_slice(b"\\\\"),
                '\n' => self.out.extend_from_slice(b"\\n"),
                '\r' => self.out.extend_from_slice(b"\\r"),
                '\t' => self.out.extend_from_slice(b"\\t"),
                '\u{08}' => self.out.extend_from_slice(b"\\b"),
                '\u{0c}' => self.out.extend_from_slice(b"\\f"),
                c if (c as u32) < 0x20 => {
                    self.out
                        .extend_from_slice(format!("\\u{:04x}", c as u32).as_bytes());
                }
                c => {
                    let mut buf = [0u8; 4];
                    self.out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        self.out.push(b'"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars() {
        let mut writer = TokenWriter::new();
        writer.null();
        assert_eq!(writer.flush(), b"null");
        writer.bool(true);
        assert_eq!(writer.flush(), b"true");
        writer.int(-42);
        assert_eq!(writer.flush(), b"-42");
        writer.float(1.5);
        assert_eq!(writer.flush(), b"1.5");
        writer.str("hi");
        assert_eq!(writer.flush(), b"\"hi\"");
    }

    #[test]
    fn integral_float_keeps_fraction() {
        let mut writer = TokenWriter::new();
        writer.float(2.0);
        assert_eq!(writer.flush(), b"2.0");
    }

    #[test]
    fn non_finite_float_becomes_null() {
        let mut writer = TokenWriter::new();
        writer.float(f64::NAN);
        assert_eq!(writer.flush(), b"null");
    }

    #[test]
    fn object_separators() {
        let mut writer = TokenWriter::new();
        writer.obj_start();
        writer.field("a");
        writer.int(1);
        writer.field("b");
        writer.arr_start();
        writer.bool(false);
        writer.null();
        writer.arr_end();
        writer.obj_end();
        assert_eq!(writer.flush(), b"{\"a\":1,\"b\":[false,null]}");
    }

    #[test]
    fn nested_objects_in_array() {
        let mut writer = TokenWriter::new();
        writer.arr_start();
        writer.obj_start();
        writer.field("x");
        writer.int(1);
        writer.obj_end();
        writer.obj_start();
        writer.obj_end();
        writer.arr_end();
        assert_eq!(writer.flush(), b"[{\"x\":1},{}]");
    }

    #[test]
    fn string_escaping() {
        let mut writer = TokenWriter::new();
        writer.str("a\"b\\c\nd\u{01}");
        assert_eq!(writer.flush(), b"\"a\\\"b\\\\c\\nd\\u0001\"");
    }

    #[test]
    fn flush_resets_state() {
        let mut writer = TokenWriter::new();
        writer.arr_start();
        writer.int(1);
        writer.arr_end();
        assert_eq!(writer.flush(), b"[1]");
        writer.int(2);
        assert_eq!(writer.flush(), b"2");
    }
}
