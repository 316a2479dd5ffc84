//! # tycheck-core: Foundational Types for tycheck
//!
//! This crate is the leaf of the tycheck workspace. It defines the dynamic
//! values the checker classifies and the Representation Service that turns
//! values and type shapes into diagnostic labels. `tycheck-schema` builds
//! the type-entity model and the validation engine on top of it.
//!
//! ## Key Design Principles
//!
//! 1. **`undefined` is not `null`, and missing is not `undefined`.** [`Value`]
//!    keeps `Undefined` and `Null` apart, and a property lookup yields
//!    `Option<&Value>` so a missing property stays distinguishable from one
//!    that is present but `undefined`.
//!
//! 2. **Labels come from one place.** Every label in a diagnostic is produced
//!    by a [`Represent`] implementation or by [`repr::type_label`]; nothing
//!    else formats values.
//!
//! 3. **Options are explicit.** [`ValidationOptions`] travels with each call.
//!    [`ValidationOptions::from_env`] is the only reader of process state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tycheck-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod nullability;
pub mod options;
pub mod repr;
pub mod value;

pub use error::{ConfigError, ReprError, ValueLoadError};
pub use nullability::{Absence, Nullability};
pub use options::{OptionOverrides, ValidationOptions};
pub use repr::{Repr, Represent};
pub use value::{Map, Value};
