//! Model codec error taxonomy.

use json_model_tokens::TokenError;
use thiserror::Error;

/// Decode-time failure of the model codec.
///
/// All variants terminate the decode call; there is no partial-result
/// recovery. Where a field is involved, the error names it so the failure is
/// actionable without inspecting raw bytes.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    /// A field marked required was never assigned during decode.
    #[error("missing required field `{0}`")]
    MissingRequiredField(String),
    /// A token kind could not be coerced to the field's declared kind.
    /// For top-level shape violations `field` carries the type name.
    #[error("type mismatch for `{field}`: expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// The token stream violated JSON structure.
    #[error("malformed token stream: {0}")]
    MalformedToken(#[from] TokenError),
    /// Construction-time only: `ModelValue::set` with a name the descriptor
    /// set does not declare, on a type without an overflow bag. Never raised
    /// by decode, which captures or skips unknown wire fields.
    #[error("unknown field `{0}`")]
    UnknownField(String),
    /// Polymorphic decode found no discriminator field and no fallback.
    #[error("missing discriminator field `{0}`")]
    MissingDiscriminator(String),
    /// Polymorphic decode saw a discriminator value with no matching variant
    /// and no fallback.
    #[error("unknown discriminator value `{value}` for field `{field}`")]
    UnknownDiscriminator { field: String, value: String },
}
