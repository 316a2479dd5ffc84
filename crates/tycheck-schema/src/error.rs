//! # Usage Errors
//!
//! Errors in how an entity graph was built or used. A value that does not
//! conform is never an error: it produces diagnostics. Everything here
//! points at a defect in the caller's type descriptions and is surfaced as
//! `Err`, never folded into a [`ValidationReport`](crate::ValidationReport).

use thiserror::Error;
use tycheck_core::ReprError;

/// Errors returned by entity construction and validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// More bindings were supplied than the entity declares slots for.
    #[error("template declares {declared} slot(s) with {bound} already bound; cannot bind {supplied} more")]
    TemplateArity {
        /// Number of declared slots.
        declared: usize,
        /// Number of slots bound before this call.
        bound: usize,
        /// Number of bindings supplied by this call.
        supplied: usize,
    },

    /// A template with unbound slots was used as a validation root.
    #[error("template '{label}' is not fully instantiated ({bound} of {declared} slot(s) bound)")]
    TemplateNotInstantiated {
        /// Label of the offending entity.
        label: String,
        /// Number of declared slots.
        declared: usize,
        /// Number of bound slots.
        bound: usize,
    },

    /// A slot name has no binding in scope.
    #[error("unbound dependency '{slot}'")]
    UnboundDependency {
        /// The slot name that failed to resolve.
        slot: String,
    },

    /// A template description does not follow the construction grammar.
    #[error("invalid type description: {reason}")]
    InvalidDescription {
        /// What is wrong with it.
        reason: String,
    },

    /// A schema lists the same field twice.
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// Schema name.
        schema: String,
        /// Repeated field name.
        field: String,
    },

    /// The registry holds no schema under this name.
    #[error("schema not found: {0}")]
    SchemaNotFound(String),

    /// The registry already holds a schema under this name.
    #[error("schema already registered: {0}")]
    DuplicateSchema(String),

    /// Only schema entities can be registered.
    #[error("'{0}' is not a schema entity")]
    NotASchema(String),

    /// A diagnostic stream skipped a nesting level.
    #[error("diagnostic at depth {depth} cannot follow depth {previous}")]
    MalformedDiagnostics {
        /// Depth of the offending diagnostic.
        depth: usize,
        /// Depth of the diagnostic before it.
        previous: usize,
    },

    /// A value could not be labelled.
    #[error(transparent)]
    Repr(#[from] ReprError),
}
