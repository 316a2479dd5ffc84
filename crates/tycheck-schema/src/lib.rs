//! # tycheck-schema: Type Entities & Validation
//!
//! Describes expected shapes as type entities and checks dynamic values
//! against them, producing a hierarchical diagnostic report for every
//! mismatch.
//!
//! ## Type Entities (`entity`, `scalar`, `description`)
//!
//! [`TypeEntity`] is one of Scalar, Array, Tuple, Either or Schema, with a
//! nullability record and optional template slots. Entities are immutable
//! and shared; configuration returns copies.
//!
//! - [`scalar`] holds the builtin scalars (`int`, `number`, `string`,
//!   `boolean`, `unknown`).
//! - [`Description`] is the grammar templates are bound with.
//! - [`registry`] declares records explicitly and keeps them by name.
//!
//! ## Validation (`engine`, `either`, `diagnostic`)
//!
//! [`validate`] runs the [`engine`] over a value and folds its depth-tagged
//! diagnostic stream into a [`ValidationReport`]. Union failures are
//! narrowed to the least-wrong member by [`either`].
//!
//! ## Crate Policy
//!
//! - Depends only on `tycheck-core` internally.
//! - Non-conforming values are reported, never returned as `Err`; `Err`
//!   always means the entity graph was misused (see [`SchemaError`]).

pub mod bindings;
pub mod description;
pub mod diagnostic;
pub mod either;
pub mod engine;
pub mod entity;
pub mod error;
pub mod registry;
pub mod scalar;

pub use bindings::Bindings;
pub use description::Description;
pub use diagnostic::{build_tree, flatten, Diagnostic, DiagnosticNode, PropertyName, ValidationReport};
pub use engine::Validator;
pub use entity::{EntityKind, Field, Predicate, Scalar, Shape, SlotRef, TypeEntity, TypeRef};
pub use error::SchemaError;
pub use registry::{register_schema, SchemaBuilder, SchemaRegistry};

use tycheck_core::{OptionOverrides, Repr, Represent, ValidationOptions, Value};

/// Validate `value` against `root`.
///
/// # Errors
///
/// Usage errors only; see [`SchemaError`].
pub fn validate(
    root: &TypeEntity,
    value: &Value,
    options: ValidationOptions,
) -> Result<ValidationReport, SchemaError> {
    validate_with(&Repr::new(options), root, value)
}

/// Validate with options read from the environment, adjusted by
/// `overrides`.
pub fn validate_with_overrides(
    root: &TypeEntity,
    value: &Value,
    overrides: OptionOverrides,
) -> Result<ValidationReport, SchemaError> {
    validate(root, value, ValidationOptions::from_env().apply(overrides))
}

/// Validate using a custom source of value labels.
///
/// `repr` decides how found values, missing properties and tracking are
/// reported. Expected type labels are fixed by the entities themselves.
pub fn validate_with<R: Represent>(
    repr: &R,
    root: &TypeEntity,
    value: &Value,
) -> Result<ValidationReport, SchemaError> {
    let diagnostics = Validator::new(repr).diagnostics(root, value)?;
    ValidationReport::from_diagnostics(diagnostics)
}
