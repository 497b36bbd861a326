//! Polymorphic model dispatch.
//!
//! A discriminator field selects among variant descriptor sets. The decoder
//! checkpoints the reader, scans ahead at token level for the discriminator,
//! resolves the variant, then replays the object from the checkpoint through
//! the ordinary model decode path — so field order on the wire never
//! matters.

use std::sync::Arc;

use json_model_tokens::{Token, TokenReader};

use crate::decoder::ModelDecoder;
use crate::descriptor::DescriptorSet;
use crate::error::ModelError;
use crate::value::ModelValue;

/// A discriminated family of descriptor sets.
#[derive(Debug)]
pub struct VariantSet {
    discriminator: String,
    variants: Vec<(String, Arc<DescriptorSet>)>,
    fallback: Option<Arc<DescriptorSet>>,
}

impl VariantSet {
    pub fn new(discriminator: &str) -> Self {
        Self {
            discriminator: discriminator.to_string(),
            variants: Vec::new(),
            fallback: None,
        }
    }

    /// Registers the descriptor set decoded when the discriminator equals
    /// `value`.
    pub fn variant(mut self, value: &str, set: Arc<DescriptorSet>) -> Self {
        self.variants.push((value.to_string(), set));
        self
    }

    /// Set used when the discriminator is missing or matches no variant —
    /// the base-type behavior of forward-compatible readers.
    pub fn fallback(mut self, set: Arc<DescriptorSet>) -> Self {
        self.fallback = Some(set);
        self
    }

    pub fn discriminator(&self) -> &str {
        &self.discriminator
    }

    pub fn resolve(&self, value: &str) -> Option<&Arc<DescriptorSet>> {
        self.variants
            .iter()
            .find(|(name, _)| name == value)
            .map(|(_, set)| set)
    }
}

impl ModelDecoder {
    /// Decodes a whole input slice against a variant family.
    pub fn decode_polymorphic(
        &mut self,
        data: &[u8],
        variants: &VariantSet,
    ) -> Result<Option<ModelValue>, ModelError> {
        let mut reader = TokenReader::new(data);
        let value = self.read_polymorphic(&mut reader, variants)?;
        reader.end().map_err(ModelError::MalformedToken)?;
        Ok(value)
    }

    /// Reads one polymorphic value (or null) at the reader's cursor.
    pub fn read_polymorphic(
        &mut self,
        reader: &mut TokenReader,
        variants: &VariantSet,
    ) -> Result<Option<ModelValue>, ModelError> {
        match reader.peek()? {
            Token::Null => {
                reader.next()?;
                return Ok(None);
            }
            Token::ObjectStart => {}
            other => {
                return Err(ModelError::TypeMismatch {
                    field: variants.discriminator.clone(),
                    expected: "object",
                    found: other.kind_name(),
                })
            }
        }
        let checkpoint = reader.clone();
        let discriminator = self.scan_discriminator(reader, variants)?;
        let set = match &discriminator {
            Some(value) => match variants.resolve(value).or(variants.fallback.as_ref()) {
                Some(set) => Arc::clone(set),
                None => {
                    return Err(ModelError::UnknownDiscriminator {
                        field: variants.discriminator.clone(),
                        value: value.clone(),
                    })
                }
            },
            None => match &variants.fallback {
                Some(set) => Arc::clone(set),
                None => {
                    return Err(ModelError::MissingDiscriminator(
                        variants.discriminator.clone(),
                    ))
                }
            },
        };
        *reader = checkpoint;
        self.read_model(reader, &set)
    }

    /// Token-level scan for the discriminator's string value. Leaves the
    /// reader wherever the scan stopped; the caller replays from its
    /// checkpoint.
    fn scan_discriminator(
        &mut self,
        reader: &mut TokenReader,
        variants: &VariantSet,
    ) -> Result<Option<String>, ModelError> {
        reader.next()?; // object-start, already peeked
        loop {
            match reader.next()? {
                Token::ObjectEnd => return Ok(None),
                Token::FieldName(name) if name == variants.discriminator => {
                    return match reader.next()? {
                        Token::Str(value) => Ok(Some(value)),
                        other => Err(ModelError::TypeMismatch {
                            field: variants.discriminator.clone(),
                            expected: "string",
                            found: other.kind_name(),
                        }),
                    };
                }
                Token::FieldName(_) => reader.skip_value()?,
                other => {
                    return Err(ModelError::TypeMismatch {
                        field: variants.discriminator.clone(),
                        expected: "field-name",
                        found: other.kind_name(),
                    })
                }
            }
        }
    }
}
