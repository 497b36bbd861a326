//! Descriptor-driven streaming JSON model codec.
//!
//! One generic decoder/encoder pair, driven by per-type field descriptor
//! tables, replaces hand-rolled per-type serialization: each model type
//! supplies only a [`DescriptorSet`] (its ordered field list, required
//! flags, and optional overflow kind), never duplicated control flow.
//!
//! Decode tolerates fields a type does not know about: overflow-capable
//! types capture them in an ordered [`OverflowBag`], everything else skips
//! past them — however deeply nested — so old readers keep working against
//! newer writers. Required-field presence is checked once, after the whole
//! object has been consumed.

pub mod decoder;
pub mod descriptor;
pub mod encoder;
pub mod error;
pub mod overflow;
pub mod poly;
pub mod value;
pub mod view;

pub use decoder::ModelDecoder;
pub use descriptor::{DescriptorSet, DescriptorSetBuilder, FieldDescriptor, FieldKind};
pub use encoder::ModelEncoder;
pub use error::ModelError;
pub use overflow::OverflowBag;
pub use poly::VariantSet;
pub use value::{FieldValue, ModelValue};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn decode(data: &[u8], set: &Arc<DescriptorSet>) -> Result<Option<ModelValue>, ModelError> {
        ModelDecoder::new().decode(data, set)
    }

    fn encode(value: &ModelValue) -> Vec<u8> {
        ModelEncoder::new().encode(value)
    }

    #[test]
    fn decode_single_required_string_field() {
        let set = DescriptorSet::builder("Address")
            .required("city", FieldKind::Str)
            .build();
        let value = decode(b"{\"city\":\"Seattle\"}", &set).unwrap().unwrap();
        assert_eq!(value.get("city"), Some(&FieldValue::Str("Seattle".into())));
        assert_eq!(encode(&value), b"{\"city\":\"Seattle\"}");
    }

    #[test]
    fn decode_empty_object_for_empty_type() {
        let set = DescriptorSet::builder("EmptyInputOutput").build();
        let value = decode(b"{}", &set).unwrap().unwrap();
        assert_eq!(value, ModelValue::new(Arc::clone(&set)));
        assert_eq!(encode(&value), b"{}");
    }

    #[test]
    fn unknown_field_is_consumed_and_discarded() {
        let set = DescriptorSet::builder("Named")
            .required("name", FieldKind::Str)
            .build();
        let value = decode(b"{\"name\":\"x\",\"unused\":{\"a\":[1,2,3]}}", &set)
            .unwrap()
            .unwrap();
        assert_eq!(value.get("name"), Some(&FieldValue::Str("x".into())));
        assert!(value.overflow().is_none());
        assert_eq!(encode(&value), b"{\"name\":\"x\"}");
    }

    #[test]
    fn missing_required_field_names_the_field() {
        let set = DescriptorSet::builder("Named")
            .required("name", FieldKind::Str)
            .build();
        let err = decode(b"{}", &set).unwrap_err();
        assert_eq!(err, ModelError::MissingRequiredField("name".into()));
    }

    #[test]
    fn top_level_null_is_no_value() {
        let set = DescriptorSet::builder("Named")
            .required("name", FieldKind::Str)
            .build();
        assert_eq!(decode(b"null", &set).unwrap(), None);
    }

    #[test]
    fn required_field_valid_in_any_position() {
        let set = DescriptorSet::builder("Named")
            .required("name", FieldKind::Str)
            .build();
        let late = decode(b"{\"other\":1,\"name\":\"x\"}", &set).unwrap().unwrap();
        assert_eq!(late.get("name"), Some(&FieldValue::Str("x".into())));
    }

    #[test]
    fn first_missing_required_field_in_descriptor_order() {
        let set = DescriptorSet::builder("Pair")
            .required("first", FieldKind::Str)
            .required("second", FieldKind::Str)
            .build();
        let err = decode(b"{\"second\":\"b\"}", &set).unwrap_err();
        assert_eq!(err, ModelError::MissingRequiredField("first".into()));
    }

    #[test]
    fn null_scalar_counts_as_absent() {
        let set = DescriptorSet::builder("Named")
            .required("name", FieldKind::Str)
            .build();
        let err = decode(b"{\"name\":null}", &set).unwrap_err();
        assert_eq!(err, ModelError::MissingRequiredField("name".into()));
    }

    #[test]
    fn type_mismatch_names_field_and_kinds() {
        let set = DescriptorSet::builder("Counted")
            .required("count", FieldKind::Integer)
            .build();
        let err = decode(b"{\"count\":\"three\"}", &set).unwrap_err();
        assert_eq!(
            err,
            ModelError::TypeMismatch {
                field: "count".into(),
                expected: "integer",
                found: "string",
            }
        );
    }

    #[test]
    fn integral_token_widens_into_float_field() {
        let set = DescriptorSet::builder("Scored")
            .required("score", FieldKind::Float)
            .build();
        let value = decode(b"{\"score\":3}", &set).unwrap().unwrap();
        assert_eq!(value.get("score"), Some(&FieldValue::Float(3.0)));
    }

    #[test]
    fn malformed_stream_is_rejected() {
        let set = DescriptorSet::builder("Empty").build();
        assert!(matches!(
            decode(b"{\"a\":1", &set),
            Err(ModelError::MalformedToken(_))
        ));
        assert!(matches!(
            decode(b"{} trailing", &set),
            Err(ModelError::MalformedToken(_))
        ));
    }

    #[test]
    fn top_level_array_is_a_shape_violation() {
        let set = DescriptorSet::builder("Empty").build();
        let err = decode(b"[]", &set).unwrap_err();
        assert_eq!(
            err,
            ModelError::TypeMismatch {
                field: "Empty".into(),
                expected: "object",
                found: "array-start",
            }
        );
    }

    #[test]
    fn nested_model_roundtrip() {
        let inner = DescriptorSet::builder("Inner")
            .required("prop", FieldKind::Str)
            .build();
        let outer = DescriptorSet::builder("Outer")
            .optional("child", FieldKind::Nested(Arc::clone(&inner)))
            .build();
        let bytes: &[u8] = b"{\"child\":{\"prop\":\"x\"}}";
        let value = decode(bytes, &outer).unwrap().unwrap();
        match value.get("child") {
            Some(FieldValue::Model(child)) => {
                assert_eq!(child.get("prop"), Some(&FieldValue::Str("x".into())));
            }
            other => panic!("expected nested model, got {other:?}"),
        }
        assert_eq!(encode(&value), bytes);
    }

    #[test]
    fn nested_null_leaves_field_absent() {
        let inner = DescriptorSet::builder("Inner").build();
        let outer = DescriptorSet::builder("Outer")
            .optional("child", FieldKind::Nested(inner))
            .build();
        let value = decode(b"{\"child\":null}", &outer).unwrap().unwrap();
        assert!(!value.is_set("child"));
        assert_eq!(encode(&value), b"{}");
    }

    #[test]
    fn empty_array_decodes_to_empty_sequence_not_absent() {
        let set = DescriptorSet::builder("Listy")
            .optional("items", FieldKind::Sequence(Box::new(FieldKind::Integer)))
            .build();
        let value = decode(b"{\"items\":[]}", &set).unwrap().unwrap();
        assert_eq!(value.get("items"), Some(&FieldValue::Seq(vec![])));
    }

    #[test]
    fn map_field_keeps_key_order_and_overwrites_duplicates() {
        let set = DescriptorSet::builder("Tagged")
            .optional("tags", FieldKind::Map(Box::new(FieldKind::Str)))
            .build();
        let value = decode(
            b"{\"tags\":{\"b\":\"1\",\"a\":\"2\",\"b\":\"3\"}}",
            &set,
        )
        .unwrap()
        .unwrap();
        assert_eq!(
            value.get("tags"),
            Some(&FieldValue::Map(vec![
                ("b".into(), FieldValue::Str("3".into())),
                ("a".into(), FieldValue::Str("2".into())),
            ]))
        );
    }

    #[test]
    fn always_emitted_optional_encodes_as_null() {
        let set = DescriptorSet::builder("Emitting")
            .always_emitted("note", FieldKind::Str)
            .build();
        let value = decode(b"{}", &set).unwrap().unwrap();
        assert_eq!(encode(&value), b"{\"note\":null}");
    }

    #[test]
    fn overflow_capture_and_roundtrip() {
        let inner = DescriptorSet::builder("ModelForRecord")
            .optional("prop", FieldKind::Str)
            .build();
        let element = FieldKind::Sequence(Box::new(FieldKind::Nested(inner)));
        let set = DescriptorSet::builder("IsModelArray")
            .required("knownProp", element.clone())
            .additional(element)
            .build();
        let bytes: &[u8] = b"{\"knownProp\":[],\"extra\":[{\"prop\":\"x\"}]}";
        let value = decode(bytes, &set).unwrap().unwrap();
        assert_eq!(value.get("knownProp"), Some(&FieldValue::Seq(vec![])));
        let bag = value.overflow().unwrap();
        assert_eq!(bag.len(), 1);
        match bag.get("extra") {
            Some(FieldValue::Seq(items)) => match &items[0] {
                FieldValue::Model(model) => {
                    assert_eq!(model.get("prop"), Some(&FieldValue::Str("x".into())));
                }
                other => panic!("expected model element, got {other:?}"),
            },
            other => panic!("expected captured sequence, got {other:?}"),
        }
        // Known field first, bag second, regardless of wire arrival order.
        assert_eq!(encode(&value), bytes);
        let swapped = decode(b"{\"extra\":[{\"prop\":\"x\"}],\"knownProp\":[]}", &set)
            .unwrap()
            .unwrap();
        assert_eq!(encode(&swapped), bytes);
    }

    #[test]
    fn duplicate_overflow_key_last_write_wins_first_position_kept() {
        let set = DescriptorSet::builder("Record")
            .additional(FieldKind::Any)
            .build();
        let value = decode(b"{\"a\":1,\"b\":2,\"a\":3}", &set).unwrap().unwrap();
        let bag = value.overflow().unwrap();
        let entries: Vec<(&str, &FieldValue)> = bag.iter().collect();
        assert_eq!(
            entries,
            [
                ("a", &FieldValue::Integer(3)),
                ("b", &FieldValue::Integer(2)),
            ]
        );
    }

    #[test]
    fn overflow_null_value_roundtrips() {
        let set = DescriptorSet::builder("Record")
            .additional(FieldKind::Any)
            .build();
        let bytes: &[u8] = b"{\"extra\":null}";
        let value = decode(bytes, &set).unwrap().unwrap();
        assert_eq!(value.overflow().unwrap().get("extra"), Some(&FieldValue::Null));
        assert_eq!(encode(&value), bytes);
    }

    #[test]
    fn decode_encode_decode_is_identity() {
        let inner = DescriptorSet::builder("Part")
            .required("sku", FieldKind::Str)
            .optional("qty", FieldKind::Integer)
            .build();
        let set = DescriptorSet::builder("Order")
            .required("id", FieldKind::Str)
            .optional(
                "parts",
                FieldKind::Sequence(Box::new(FieldKind::Nested(inner))),
            )
            .optional("tags", FieldKind::Map(Box::new(FieldKind::Str)))
            .additional(FieldKind::Any)
            .build();
        let bytes: &[u8] = b"{\"id\":\"o-1\",\"parts\":[{\"sku\":\"a\",\"qty\":2},{\"sku\":\"b\"}],\"tags\":{\"env\":\"prod\"},\"x\":[true,null]}";
        let mut decoder = ModelDecoder::new();
        let first = decoder.decode(bytes, &set).unwrap().unwrap();
        let encoded = encode(&first);
        let second = decoder.decode(&encoded, &set).unwrap().unwrap();
        assert_eq!(first, second);
        assert_eq!(encode(&second), encoded);
    }
}
