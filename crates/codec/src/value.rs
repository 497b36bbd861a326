//! Model values: decoded instances of a descriptor set.

use std::sync::Arc;

use crate::descriptor::DescriptorSet;
use crate::error::ModelError;
use crate::overflow::OverflowBag;

/// One decoded field value.
///
/// Maps keep insertion order as a vector of pairs; equality is therefore
/// order-sensitive, which is exactly the round-trip fidelity contract.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(String),
    Model(ModelValue),
    Seq(Vec<FieldValue>),
    Map(Vec<(String, FieldValue)>),
}

impl FieldValue {
    /// Short name for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::Model(_) => "model",
            FieldValue::Seq(_) => "array",
            FieldValue::Map(_) => "object",
        }
    }
}

/// An instance of a model type: one slot per declared field, in descriptor
/// order, plus the overflow bag on overflow-capable types.
///
/// A value exclusively owns its nested models and its bag; nothing is shared
/// across instances. Equality is structural and includes bag contents and
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelValue {
    set: Arc<DescriptorSet>,
    slots: Vec<Option<FieldValue>>,
    overflow: Option<OverflowBag>,
}

impl ModelValue {
    /// Creates an empty instance. No slots are assigned and no overflow bag
    /// exists yet, even on types that declare one.
    pub fn new(set: Arc<DescriptorSet>) -> Self {
        let slots = vec![None; set.fields().len()];
        Self {
            set,
            slots,
            overflow: None,
        }
    }

    pub fn schema(&self) -> &Arc<DescriptorSet> {
        &self.set
    }

    /// Assigns a field by name.
    ///
    /// An undeclared name goes to the overflow bag when the type declares
    /// one; otherwise this is a programmer error and fails with
    /// [`ModelError::UnknownField`]. No kind checking happens here — encode
    /// writes whatever the value holds.
    pub fn set(&mut self, name: &str, value: FieldValue) -> Result<(), ModelError> {
        if let Some((idx, _)) = self.set.field(name) {
            self.slots[idx] = Some(value);
            return Ok(());
        }
        if self.set.declares_overflow() {
            self.overflow
                .get_or_insert_with(OverflowBag::new)
                .insert(name.to_string(), value);
            return Ok(());
        }
        Err(ModelError::UnknownField(name.to_string()))
    }

    /// Clears a field by name; undeclared names are ignored.
    pub fn clear(&mut self, name: &str) {
        if let Some((idx, _)) = self.set.field(name) {
            self.slots[idx] = None;
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        let (idx, _) = self.set.field(name)?;
        self.slots[idx].as_ref()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The overflow bag, if any unknown field was ever captured or the bag
    /// was explicitly created.
    pub fn overflow(&self) -> Option<&OverflowBag> {
        self.overflow.as_ref()
    }

    /// Explicitly creates the bag on an overflow-capable type, making
    /// "empty but present" representable. Returns `None` when the type
    /// declares no overflow kind.
    pub fn ensure_overflow(&mut self) -> Option<&mut OverflowBag> {
        if !self.set.declares_overflow() {
            return None;
        }
        Some(self.overflow.get_or_insert_with(OverflowBag::new))
    }

    pub(crate) fn slot(&self, idx: usize) -> Option<&FieldValue> {
        self.slots[idx].as_ref()
    }

    pub(crate) fn assign_slot(&mut self, idx: usize, value: FieldValue) {
        self.slots[idx] = Some(value);
    }

    pub(crate) fn capture_overflow(&mut self, key: String, value: FieldValue) {
        self.overflow
            .get_or_insert_with(OverflowBag::new)
            .insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldKind;

    fn address() -> Arc<DescriptorSet> {
        DescriptorSet::builder("Address")
            .required("city", FieldKind::Str)
            .optional("zip", FieldKind::Str)
            .build()
    }

    #[test]
    fn set_and_get_known_fields() {
        let mut value = ModelValue::new(address());
        value.set("city", FieldValue::Str("Seattle".into())).unwrap();
        assert_eq!(value.get("city"), Some(&FieldValue::Str("Seattle".into())));
        assert_eq!(value.get("zip"), None);
        assert!(!value.is_set("zip"));
    }

    #[test]
    fn unknown_field_errors_without_overflow() {
        let mut value = ModelValue::new(address());
        let err = value.set("extra", FieldValue::Null).unwrap_err();
        assert_eq!(err, ModelError::UnknownField("extra".into()));
    }

    #[test]
    fn unknown_field_routes_to_bag_with_overflow() {
        let set = DescriptorSet::builder("Record")
            .additional(FieldKind::Any)
            .build();
        let mut value = ModelValue::new(set);
        assert!(value.overflow().is_none());
        value.set("extra", FieldValue::Integer(1)).unwrap();
        assert_eq!(
            value.overflow().unwrap().get("extra"),
            Some(&FieldValue::Integer(1))
        );
    }

    #[test]
    fn ensure_overflow_only_on_capable_types() {
        let mut plain = ModelValue::new(address());
        assert!(plain.ensure_overflow().is_none());
        let set = DescriptorSet::builder("Record")
            .additional(FieldKind::Any)
            .build();
        let mut record = ModelValue::new(set);
        assert!(record.ensure_overflow().is_some());
        // Present-but-empty differs from absent.
        assert!(record.overflow().is_some());
        assert!(record.overflow().unwrap().is_empty());
    }

    #[test]
    fn structural_equality_includes_bag_order() {
        let set = DescriptorSet::builder("Record")
            .additional(FieldKind::Any)
            .build();
        let mut a = ModelValue::new(Arc::clone(&set));
        a.set("x", FieldValue::Integer(1)).unwrap();
        a.set("y", FieldValue::Integer(2)).unwrap();
        let mut b = ModelValue::new(set);
        b.set("y", FieldValue::Integer(2)).unwrap();
        b.set("x", FieldValue::Integer(1)).unwrap();
        assert_ne!(a, b);
    }
}
