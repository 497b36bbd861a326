//! Streaming model decoder.

use std::sync::Arc;

use json_model_tokens::{Token, TokenReader};

use crate::descriptor::{DescriptorSet, FieldKind};
use crate::error::ModelError;
use crate::overflow::insert_ordered;
use crate::value::{FieldValue, ModelValue};

/// Decodes model values from a token stream, dispatching each wire field to
/// its descriptor or to the overflow bag.
///
/// `decode` owns a whole input slice and rejects trailing garbage;
/// `read_model` is the re-entrant form used for nested models and by
/// polymorphic dispatch.
#[derive(Debug, Default)]
pub struct ModelDecoder;

impl ModelDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decodes a single JSON value from `data`.
    ///
    /// Top-level `null` yields `Ok(None)` — the type's "no value" indicator,
    /// never an error.
    pub fn decode(
        &mut self,
        data: &[u8],
        set: &Arc<DescriptorSet>,
    ) -> Result<Option<ModelValue>, ModelError> {
        let mut reader = TokenReader::new(data);
        let value = self.read_model(&mut reader, set)?;
        reader.end().map_err(ModelError::MalformedToken)?;
        Ok(value)
    }

    /// Reads one model value (or null) at the reader's cursor.
    pub fn read_model(
        &mut self,
        reader: &mut TokenReader,
        set: &Arc<DescriptorSet>,
    ) -> Result<Option<ModelValue>, ModelError> {
        match reader.next()? {
            Token::Null => Ok(None),
            Token::ObjectStart => Ok(Some(self.read_fields(reader, set)?)),
            other => Err(ModelError::TypeMismatch {
                field: set.type_name().to_string(),
                expected: "object",
                found: other.kind_name(),
            }),
        }
    }

    /// Field-dispatch loop. The object-start token is already consumed.
    fn read_fields(
        &mut self,
        reader: &mut TokenReader,
        set: &Arc<DescriptorSet>,
    ) -> Result<ModelValue, ModelError> {
        let mut value = ModelValue::new(Arc::clone(set));
        loop {
            match reader.next()? {
                Token::ObjectEnd => break,
                Token::FieldName(name) => match set.field(&name) {
                    Some((idx, desc)) => {
                        let kind = desc.kind.clone();
                        let decoded = self.read_value(reader, &kind, &name)?;
                        // A null scalar or nested null leaves the slot
                        // absent; only the untyped kind stores null itself.
                        if decoded == FieldValue::Null && kind != FieldKind::Any {
                            continue;
                        }
                        value.assign_slot(idx, decoded);
                    }
                    None => match set.overflow_kind() {
                        Some(kind) => {
                            let kind = kind.clone();
                            let decoded = self.read_value(reader, &kind, &name)?;
                            value.capture_overflow(name, decoded);
                        }
                        None => reader.skip_value()?,
                    },
                },
                other => {
                    return Err(ModelError::TypeMismatch {
                        field: set.type_name().to_string(),
                        expected: "field-name",
                        found: other.kind_name(),
                    })
                }
            }
        }
        // Required-field postcondition, first missing in descriptor order.
        for (idx, desc) in set.fields().iter().enumerate() {
            if desc.required && value.slot(idx).is_none() {
                return Err(ModelError::MissingRequiredField(desc.name.clone()));
            }
        }
        Ok(value)
    }

    /// Reads one value of the declared kind. `field` names the owning field
    /// for error reporting.
    fn read_value(
        &mut self,
        reader: &mut TokenReader,
        kind: &FieldKind,
        field: &str,
    ) -> Result<FieldValue, ModelError> {
        match kind {
            FieldKind::Nested(set) => Ok(match self.read_model(reader, set)? {
                Some(model) => FieldValue::Model(model),
                None => FieldValue::Null,
            }),
            FieldKind::Sequence(elem) => self.read_sequence(reader, elem, field),
            FieldKind::Map(elem) => self.read_map(reader, elem, field),
            FieldKind::Any => self.read_any(reader, field),
            _ => self.read_scalar(reader, kind, field),
        }
    }

    fn read_scalar(
        &mut self,
        reader: &mut TokenReader,
        kind: &FieldKind,
        field: &str,
    ) -> Result<FieldValue, ModelError> {
        let token = reader.next()?;
        let value = match (kind, token) {
            (_, Token::Null) => FieldValue::Null,
            (FieldKind::Bool, Token::Bool(b)) => FieldValue::Bool(b),
            (FieldKind::Integer, Token::Integer(i)) => FieldValue::Integer(i),
            (FieldKind::Float, Token::Float(f)) => FieldValue::Float(f),
            // Integral tokens widen into float fields.
            (FieldKind::Float, Token::Integer(i)) => FieldValue::Float(i as f64),
            (FieldKind::Str, Token::Str(s)) => FieldValue::Str(s),
            (_, other) => {
                return Err(ModelError::TypeMismatch {
                    field: field.to_string(),
                    expected: kind.name(),
                    found: other.kind_name(),
                })
            }
        };
        Ok(value)
    }

    fn read_sequence(
        &mut self,
        reader: &mut TokenReader,
        elem: &FieldKind,
        field: &str,
    ) -> Result<FieldValue, ModelError> {
        match reader.next()? {
            Token::Null => return Ok(FieldValue::Null),
            Token::ArrayStart => {}
            other => {
                return Err(ModelError::TypeMismatch {
                    field: field.to_string(),
                    expected: "array",
                    found: other.kind_name(),
                })
            }
        }
        let mut items = Vec::new();
        loop {
            if reader.peek()? == Token::ArrayEnd {
                reader.next()?;
                break;
            }
            items.push(self.read_value(reader, elem, field)?);
        }
        Ok(FieldValue::Seq(items))
    }

    /// Pure map decode: every field name is a map key, no descriptor lookup.
    fn read_map(
        &mut self,
        reader: &mut TokenReader,
        elem: &FieldKind,
        field: &str,
    ) -> Result<FieldValue, ModelError> {
        match reader.next()? {
            Token::Null => return Ok(FieldValue::Null),
            Token::ObjectStart => {}
            other => {
                return Err(ModelError::TypeMismatch {
                    field: field.to_string(),
                    expected: "object",
                    found: other.kind_name(),
                })
            }
        }
        let mut entries: Vec<(String, FieldValue)> = Vec::new();
        loop {
            match reader.next()? {
                Token::ObjectEnd => break,
                Token::FieldName(key) => {
                    let value = self.read_value(reader, elem, &key)?;
                    insert_ordered(&mut entries, key, value);
                }
                other => {
                    return Err(ModelError::TypeMismatch {
                        field: field.to_string(),
                        expected: "field-name",
                        found: other.kind_name(),
                    })
                }
            }
        }
        Ok(FieldValue::Map(entries))
    }

    /// Untyped decode: the value keeps whatever shape the wire holds.
    fn read_any(
        &mut self,
        reader: &mut TokenReader,
        field: &str,
    ) -> Result<FieldValue, ModelError> {
        let value = match reader.next()? {
            Token::Null => FieldValue::Null,
            Token::Bool(b) => FieldValue::Bool(b),
            Token::Integer(i) => FieldValue::Integer(i),
            Token::Float(f) => FieldValue::Float(f),
            Token::Str(s) => FieldValue::Str(s),
            Token::ArrayStart => {
                let mut items = Vec::new();
                while reader.peek()? != Token::ArrayEnd {
                    items.push(self.read_any(reader, field)?);
                }
                reader.next()?;
                FieldValue::Seq(items)
            }
            Token::ObjectStart => {
                let mut entries: Vec<(String, FieldValue)> = Vec::new();
                loop {
                    match reader.next()? {
                        Token::ObjectEnd => break,
                        Token::FieldName(key) => {
                            let value = self.read_any(reader, &key)?;
                            insert_ordered(&mut entries, key, value);
                        }
                        other => {
                            return Err(ModelError::TypeMismatch {
                                field: field.to_string(),
                                expected: "field-name",
                                found: other.kind_name(),
                            })
                        }
                    }
                }
                FieldValue::Map(entries)
            }
            other => {
                return Err(ModelError::TypeMismatch {
                    field: field.to_string(),
                    expected: "any",
                    found: other.kind_name(),
                })
            }
        };
        Ok(value)
    }
}
