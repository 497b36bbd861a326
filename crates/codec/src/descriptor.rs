//! Field descriptor tables.
//!
//! A [`DescriptorSet`] is the static description of one model type: an
//! ordered list of named, typed slots plus an optional overflow kind for
//! wire fields the type does not declare. Sets are built once, shared as
//! `Arc`, and never mutated afterwards, so concurrent decodes can read them
//! without coordination.

use std::sync::Arc;

/// Semantic kind of a field or container element.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Bool,
    Integer,
    Float,
    Str,
    /// Untyped pass-through: the value keeps whatever shape the wire holds.
    Any,
    /// A nested model with its own descriptor set.
    Nested(Arc<DescriptorSet>),
    /// Ordered sequence of the element kind.
    Sequence(Box<FieldKind>),
    /// String-keyed map of the element kind. Keys are arbitrary; insertion
    /// order is preserved.
    Map(Box<FieldKind>),
}

impl FieldKind {
    /// Short name for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Bool => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Str => "string",
            FieldKind::Any => "any",
            FieldKind::Nested(_) => "object",
            FieldKind::Sequence(_) => "array",
            FieldKind::Map(_) => "object",
        }
    }
}

/// Static description of one named slot on a model.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub required: bool,
    /// Optional field that still encodes as explicit `null` when absent.
    pub always_emitted: bool,
    pub kind: FieldKind,
}

/// Per-type, ordered field table with an optional overflow kind.
#[derive(Debug, PartialEq)]
pub struct DescriptorSet {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    overflow: Option<FieldKind>,
}

impl DescriptorSet {
    pub fn builder(type_name: &str) -> DescriptorSetBuilder {
        DescriptorSetBuilder {
            type_name: type_name.to_string(),
            fields: Vec::new(),
            overflow: None,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a descriptor by exact, case-sensitive name.
    pub fn field(&self, name: &str) -> Option<(usize, &FieldDescriptor)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.name == name)
    }

    /// The declared kind of overflow values, if the type captures unknown
    /// wire fields at all.
    pub fn overflow_kind(&self) -> Option<&FieldKind> {
        self.overflow.as_ref()
    }

    pub fn declares_overflow(&self) -> bool {
        self.overflow.is_some()
    }
}

/// Builder for [`DescriptorSet`].
///
/// Declaration order is encode order. Re-declaring a name replaces the
/// earlier descriptor in place, keeping its position.
#[derive(Debug)]
pub struct DescriptorSetBuilder {
    type_name: String,
    fields: Vec<FieldDescriptor>,
    overflow: Option<FieldKind>,
}

impl DescriptorSetBuilder {
    pub fn required(self, name: &str, kind: FieldKind) -> Self {
        self.push(FieldDescriptor {
            name: name.to_string(),
            required: true,
            always_emitted: false,
            kind,
        })
    }

    pub fn optional(self, name: &str, kind: FieldKind) -> Self {
        self.push(FieldDescriptor {
            name: name.to_string(),
            required: false,
            always_emitted: false,
            kind,
        })
    }

    /// Optional field that encodes as explicit `null` when absent.
    pub fn always_emitted(self, name: &str, kind: FieldKind) -> Self {
        self.push(FieldDescriptor {
            name: name.to_string(),
            required: false,
            always_emitted: true,
            kind,
        })
    }

    /// Splices another set's descriptors into declaration order.
    ///
    /// This is how shared base field sets (id/name/type and friends) are
    /// reused: composition of tables, not inheritance of types.
    pub fn merge(mut self, base: &DescriptorSet) -> Self {
        for field in base.fields() {
            self = self.push(field.clone());
        }
        self
    }

    /// Declares the overflow value kind, making the type capture unknown
    /// wire fields instead of discarding them.
    pub fn additional(mut self, kind: FieldKind) -> Self {
        self.overflow = Some(kind);
        self
    }

    pub fn build(self) -> Arc<DescriptorSet> {
        Arc::new(DescriptorSet {
            type_name: self.type_name,
            fields: self.fields,
            overflow: self.overflow,
        })
    }

    fn push(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_kept() {
        let set = DescriptorSet::builder("Order")
            .required("id", FieldKind::Str)
            .optional("note", FieldKind::Str)
            .required("count", FieldKind::Integer)
            .build();
        let names: Vec<&str> = set.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "note", "count"]);
        assert_eq!(set.field("note").map(|(idx, _)| idx), Some(1));
        assert_eq!(set.field("Note"), None); // case-sensitive
    }

    #[test]
    fn redeclared_name_keeps_position() {
        let set = DescriptorSet::builder("T")
            .optional("a", FieldKind::Str)
            .optional("b", FieldKind::Str)
            .required("a", FieldKind::Integer)
            .build();
        let (idx, field) = set.field("a").unwrap();
        assert_eq!(idx, 0);
        assert!(field.required);
        assert_eq!(field.kind, FieldKind::Integer);
        assert_eq!(set.fields().len(), 2);
    }

    #[test]
    fn merge_splices_base_fields() {
        let base = DescriptorSet::builder("Resource")
            .optional("id", FieldKind::Str)
            .optional("name", FieldKind::Str)
            .build();
        let set = DescriptorSet::builder("Tracked")
            .required("location", FieldKind::Str)
            .merge(&base)
            .optional("properties", FieldKind::Any)
            .build();
        let names: Vec<&str> = set.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["location", "id", "name", "properties"]);
    }

    #[test]
    fn overflow_declaration() {
        let plain = DescriptorSet::builder("Plain").build();
        assert!(!plain.declares_overflow());
        let record = DescriptorSet::builder("Record")
            .additional(FieldKind::Any)
            .build();
        assert_eq!(record.overflow_kind(), Some(&FieldKind::Any));
    }
}
