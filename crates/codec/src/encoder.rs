//! Streaming model encoder.

use json_model_tokens::TokenWriter;

use crate::value::{FieldValue, ModelValue};

/// Encodes model values to UTF-8 JSON bytes.
///
/// Known fields are written in descriptor declaration order, then the
/// overflow bag in its iteration order. Encode never reorders, deduplicates,
/// or validates required-field presence — a well-formed value already
/// satisfies its invariants from construction or decode. The in-memory token
/// writer cannot fail, so neither can encode.
#[derive(Debug, Default)]
pub struct ModelEncoder {
    pub writer: TokenWriter,
}

impl ModelEncoder {
    pub fn new() -> Self {
        Self {
            writer: TokenWriter::new(),
        }
    }

    /// Encodes a value and returns the bytes.
    pub fn encode(&mut self, value: &ModelValue) -> Vec<u8> {
        self.writer.reset();
        self.write_model(value);
        self.writer.flush()
    }

    /// Writes one model object into the encoder's writer.
    pub fn write_model(&mut self, value: &ModelValue) {
        self.writer.obj_start();
        for (idx, desc) in value.schema().fields().iter().enumerate() {
            match value.slot(idx) {
                Some(field_value) => {
                    self.writer.field(&desc.name);
                    self.write_value(field_value);
                }
                None => {
                    if desc.always_emitted {
                        self.writer.field(&desc.name);
                        self.writer.null();
                    }
                }
            }
        }
        if let Some(bag) = value.overflow() {
            for (key, field_value) in bag.iter() {
                self.writer.field(key);
                self.write_value(field_value);
            }
        }
        self.writer.obj_end();
    }

    fn write_value(&mut self, value: &FieldValue) {
        match value {
            FieldValue::Null => self.writer.null(),
            FieldValue::Bool(b) => self.writer.bool(*b),
            FieldValue::Integer(i) => self.writer.int(*i),
            FieldValue::Float(f) => self.writer.float(*f),
            FieldValue::Str(s) => self.writer.str(s),
            FieldValue::Model(model) => self.write_model(model),
            FieldValue::Seq(items) => {
                self.writer.arr_start();
                for item in items {
                    self.write_value(item);
                }
                self.writer.arr_end();
            }
            FieldValue::Map(entries) => {
                self.writer.obj_start();
                for (key, entry) in entries {
                    self.writer.field(key);
                    self.write_value(entry);
                }
                self.writer.obj_end();
            }
        }
    }
}
