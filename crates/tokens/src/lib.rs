//! JSON token stream primitives.
//!
//! The model codec in `json-model-codec` consumes and produces a sequence of
//! typed JSON tokens rather than raw bytes. This crate owns that boundary:
//! [`TokenReader`] lexes UTF-8 JSON text into [`Token`]s, and [`TokenWriter`]
//! serializes tokens back to bytes, inserting structural separators itself.

pub mod error;
pub mod reader;
pub mod token;
pub mod writer;

pub use error::TokenError;
pub use reader::TokenReader;
pub use token::Token;
pub use writer::TokenWriter;
