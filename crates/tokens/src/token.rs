//! JSON token vocabulary.

/// One token of a JSON document.
///
/// Integral numbers (no fraction, no exponent) lex as [`Token::Integer`];
/// every other number lexes as [`Token::Float`]. Field names are distinct
/// from string values: inside an object, the key position always yields
/// [`Token::FieldName`].
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    FieldName(String),
    Str(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Token {
    /// Short human-readable name of the token kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Token::ObjectStart => "object-start",
            Token::ObjectEnd => "object-end",
            Token::ArrayStart => "array-start",
            Token::ArrayEnd => "array-end",
            Token::FieldName(_) => "field-name",
            Token::Str(_) => "string",
            Token::Integer(_) => "integer",
            Token::Float(_) => "float",
            Token::Bool(_) => "boolean",
            Token::Null => "null",
        }
    }
}
