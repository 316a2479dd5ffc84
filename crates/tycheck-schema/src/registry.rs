//! # Schema Registration
//!
//! Records are declared explicitly: a name plus ordered
//! `(field, description, nullability)` triples produce a Schema entity.
//! [`SchemaBuilder`] is the fluent form of [`register_schema`], and
//! [`SchemaRegistry`] keeps registered schemas by name so values can be
//! validated against a schema looked up at runtime.
//!
//! ```ignore
//! let point = SchemaBuilder::new("Point")
//!     .field("x", int())
//!     .field("y", int())
//!     .optional("label", string())
//!     .build()?;
//! ```

use indexmap::IndexMap;
use tycheck_core::{Nullability, ValidationOptions, Value};

use crate::description::Description;
use crate::diagnostic::ValidationReport;
use crate::entity::{EntityKind, Shape, TypeEntity, TypeRef};
use crate::error::SchemaError;

/// Build a Schema entity from ordered field triples.
///
/// # Errors
///
/// [`SchemaError::DuplicateField`] for a repeated field name and
/// [`SchemaError::InvalidDescription`] for a malformed description.
pub fn register_schema<I, N, D>(name: impl Into<String>, fields: I) -> Result<TypeEntity, SchemaError>
where
    I: IntoIterator<Item = (N, D, Nullability)>,
    N: Into<String>,
    D: Into<Description>,
{
    let name = name.into();
    let fields = fields
        .into_iter()
        .map(|(field, description, nullability)| -> Result<(String, TypeRef), SchemaError> {
            let description: Description = description.into();
            let ty = description.build()?.with_nullability(nullability);
            Ok((field.into(), ty))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let schema = TypeEntity::schema(name, fields)?;
    tracing::debug!(schema = %schema, fields = fields_len(&schema), "registered schema");
    Ok(schema)
}

fn fields_len(schema: &TypeEntity) -> usize {
    match schema.shape() {
        Shape::Schema { fields, .. } => fields.len(),
        _ => 0,
    }
}

/// Fluent construction of a Schema entity.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    declared: Vec<String>,
    fields: Vec<(String, Description, Nullability)>,
}

impl SchemaBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared: Vec::new(),
            fields: Vec::new(),
        }
    }

    /// Declare template slots on the schema being built.
    pub fn declare<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared.extend(names.into_iter().map(Into::into));
        self
    }

    /// A required, non-null field.
    pub fn field(self, name: impl Into<String>, description: impl Into<Description>) -> Self {
        self.field_with(name, description, Nullability::strict())
    }

    /// A field that may be missing (or `undefined` when property tracking
    /// is off).
    pub fn optional(self, name: impl Into<String>, description: impl Into<Description>) -> Self {
        self.field_with(name, description, Nullability::optional())
    }

    /// A required field that may be `null`.
    pub fn nullable(self, name: impl Into<String>, description: impl Into<Description>) -> Self {
        self.field_with(name, description, Nullability::nullable())
    }

    pub fn field_with(
        mut self,
        name: impl Into<String>,
        description: impl Into<Description>,
        nullability: Nullability,
    ) -> Self {
        self.fields.push((name.into(), description.into(), nullability));
        self
    }

    /// # Errors
    ///
    /// As [`register_schema`].
    pub fn build(self) -> Result<TypeEntity, SchemaError> {
        let schema = register_schema(self.name, self.fields)?;
        if self.declared.is_empty() {
            return Ok(schema);
        }
        Ok(schema.declare(self.declared))
    }
}

/// Registered schemas by name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, TypeEntity>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its own name.
    ///
    /// # Errors
    ///
    /// [`SchemaError::NotASchema`] for any other kind of entity and
    /// [`SchemaError::DuplicateSchema`] if the name is taken.
    pub fn register(&mut self, schema: TypeEntity) -> Result<(), SchemaError> {
        if schema.kind() != EntityKind::Schema {
            return Err(SchemaError::NotASchema(schema.label(false)));
        }
        let name = schema.display_name().unwrap_or_default().to_string();
        if self.schemas.contains_key(&name) {
            return Err(SchemaError::DuplicateSchema(name));
        }
        tracing::debug!(schema = %name, total = self.schemas.len() + 1, "schema added to registry");
        self.schemas.insert(name, schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntity> {
        self.schemas.get(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Validate `value` against the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::SchemaNotFound`] for an unknown name, plus anything
    /// [`crate::validate`] returns.
    pub fn validate(
        &self,
        name: &str,
        value: &Value,
        options: ValidationOptions,
    ) -> Result<ValidationReport, SchemaError> {
        let schema = self
            .get(name)
            .ok_or_else(|| SchemaError::SchemaNotFound(name.to_string()))?;
        crate::validate(schema, value, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{int, string};
    use serde_json::json;

    fn point() -> TypeEntity {
        SchemaBuilder::new("Point")
            .field("x", int())
            .field("y", int())
            .optional("label", string())
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_preserves_field_order_and_nullability() {
        let schema = point();
        let Shape::Schema { fields, .. } = schema.shape() else {
            panic!("expected a schema");
        };
        let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["x", "y", "label"]);
        match fields[2].ty() {
            TypeRef::Entity(e) => {
                assert_eq!(e.nullability(), Nullability::optional());
            }
            other => panic!("unexpected field type {other:?}"),
        }
    }

    #[test]
    fn test_register_schema_rejects_duplicate_fields() {
        let err = register_schema(
            "Dup",
            [
                ("a", Description::from(int()), Nullability::strict()),
                ("a", Description::from(string()), Nullability::strict()),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_strict_field_keeps_singleton_identity() {
        let schema = register_schema("S", [("a", int(), Nullability::strict())]).unwrap();
        let Shape::Schema { fields, .. } = schema.shape() else {
            panic!("expected a schema");
        };
        match fields[0].ty() {
            TypeRef::Entity(e) => assert!(e.ptr_eq(&int())),
            other => panic!("unexpected field type {other:?}"),
        }
    }

    #[test]
    fn test_registry_validates_by_name() {
        let mut registry = SchemaRegistry::new();
        registry.register(point()).unwrap();
        let report = registry
            .validate("Point", &Value::from(json!({"x": 1, "y": 2})), ValidationOptions::new())
            .unwrap();
        assert!(report.is_valid());
        let report = registry
            .validate("Point", &Value::from(json!({"x": 1})), ValidationOptions::new())
            .unwrap();
        assert_eq!(report.errors().len(), 1);
        assert_eq!(report.errors()[0].expected, "Int");
    }

    #[test]
    fn test_registry_errors() {
        let mut registry = SchemaRegistry::new();
        registry.register(point()).unwrap();
        assert_eq!(
            registry.register(point()).unwrap_err(),
            SchemaError::DuplicateSchema("Point".into())
        );
        assert_eq!(
            registry.register(int()).unwrap_err(),
            SchemaError::NotASchema("Int".into())
        );
        assert_eq!(
            registry
                .validate("Line", &Value::Null, ValidationOptions::new())
                .unwrap_err(),
            SchemaError::SchemaNotFound("Line".into())
        );
        assert_eq!(registry.names(), ["Point"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builder_template_slots() {
        let boxed = SchemaBuilder::new("Box")
            .declare(["T"])
            .field("value", "T")
            .build()
            .unwrap();
        assert!(!boxed.is_fully_instantiated());
        let of_int = boxed.bind([int()]).unwrap();
        assert!(of_int.is_fully_instantiated());
        assert_eq!(of_int.label(false), "Box");
    }
}
