//! Record type schemas.
//!
//! A schema names a record type and declares its fields: which are
//! sortable (kept in a per-field sort index) and which are text-searchable
//! (tokenized into term indexes). Schemas are immutable once built and are
//! passed explicitly wherever type-level metadata is needed; there is no
//! process-wide registry.

use serde::{Deserialize, Serialize};

/// The implicit creation-time field.
///
/// Always sortable (it is the primary index's score) and maintained by the
/// engine; it cannot be written like a declared field.
pub const CREATED_AT: &str = "created_at";

/// One declared field of a record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name, as stored in the record hash.
    pub name: String,
    /// Maintain a sort index for this field.
    pub sortable: bool,
    /// Tokenize this field into term indexes for prefix and exact term
    /// search.
    pub text_searchable: bool,
}

/// Immutable description of a record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// The record type name; the prefix of every store key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields, in declaration order. `created_at` is implicit and
    /// never appears here.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether `field` has a sort index. `created_at` always does.
    pub fn is_sortable(&self, field: &str) -> bool {
        field == CREATED_AT || self.field(field).is_some_and(|f| f.sortable)
    }

    /// Whether `field` has term indexes.
    pub fn is_text_searchable(&self, field: &str) -> bool {
        self.field(field).is_some_and(|f| f.text_searchable)
    }

    /// Declared sortable fields.
    pub fn sortable_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.sortable)
    }

    /// Declared text-searchable fields.
    pub fn text_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.text_searchable)
    }
}

/// Builder for [`Schema`].
///
/// Declaring the same field twice merges its flags, so a field can be both
/// sortable and text-searchable.
pub struct SchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl SchemaBuilder {
    /// Declare a plain stored field, neither sorted nor tokenized.
    pub fn field(self, name: impl Into<String>) -> Self {
        self.add(name.into(), false, false)
    }

    /// Declare a field with a sort index.
    pub fn sortable_field(self, name: impl Into<String>) -> Self {
        self.add(name.into(), true, false)
    }

    /// Declare a field with term indexes for text search.
    pub fn text_field(self, name: impl Into<String>) -> Self {
        self.add(name.into(), false, true)
    }

    fn add(mut self, name: String, sortable: bool, text_searchable: bool) -> Self {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.name == name) {
            existing.sortable |= sortable;
            existing.text_searchable |= text_searchable;
        } else {
            self.fields.push(FieldSpec {
                name,
                sortable,
                text_searchable,
            });
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_declares_fields_in_order() {
        let schema = Schema::builder("person")
            .sortable_field("name")
            .sortable_field("age")
            .text_field("bio")
            .field("note")
            .build();

        let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "age", "bio", "note"]);
        assert!(schema.is_sortable("age"));
        assert!(!schema.is_sortable("bio"));
        assert!(schema.is_text_searchable("bio"));
        assert!(!schema.is_text_searchable("note"));
    }

    #[test]
    fn test_redeclaration_merges_flags() {
        let schema = Schema::builder("person")
            .sortable_field("bio")
            .text_field("bio")
            .build();

        assert_eq!(schema.fields().len(), 1);
        assert!(schema.is_sortable("bio"));
        assert!(schema.is_text_searchable("bio"));
    }

    #[test]
    fn test_created_at_is_implicitly_sortable() {
        let schema = Schema::builder("person").build();
        assert!(schema.is_sortable(CREATED_AT));
        assert!(schema.field(CREATED_AT).is_none());
    }

    #[test]
    fn test_undeclared_fields_are_not_indexed() {
        let schema = Schema::builder("person").build();
        assert!(!schema.is_sortable("age"));
        assert!(!schema.is_text_searchable("age"));
    }
}
