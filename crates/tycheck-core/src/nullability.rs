//! # Nullability
//!
//! Every type entity carries a [`Nullability`] record that governs which
//! forms of absence a value may take:
//!
//! ```text
//! null           permitted iff nullable
//! undefined      permitted iff !defined, or optional while tracking is off
//! <no-property>  permitted iff optional (observable only while tracking is on)
//! ```
//!
//! With property-existence tracking off a missing property is reported as
//! `undefined`, so `optional` and `!defined` coincide. With tracking on
//! they split: `optional` admits a missing property but not an explicit
//! `undefined`, and `!defined` admits the reverse.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::repr::{NO_PROPERTY_LABEL, NULL_LABEL, UNDEFINED_LABEL};

/// A form of absence a value can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Absence {
    /// The value is `null`.
    Null,
    /// The value is `undefined` (or missing while tracking is off).
    Undefined,
    /// The property does not exist at all (tracking on only).
    NoProperty,
}

impl Absence {
    /// The representation label of this absence form.
    pub fn label(self) -> &'static str {
        match self {
            Self::Null => NULL_LABEL,
            Self::Undefined => UNDEFINED_LABEL,
            Self::NoProperty => NO_PROPERTY_LABEL,
        }
    }
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The `{defined, nullable, optional}` triple of a type entity.
///
/// The default is strict: the value must be present, and neither `null`
/// nor `undefined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Nullability {
    /// When false, an explicit `undefined` is accepted.
    pub defined: bool,
    /// When true, `null` is accepted.
    pub nullable: bool,
    /// When true, the property may be missing entirely.
    pub optional: bool,
}

impl Default for Nullability {
    fn default() -> Self {
        Self::strict()
    }
}

impl Nullability {
    /// Present, non-null, defined.
    pub const fn strict() -> Self {
        Self {
            defined: true,
            nullable: false,
            optional: false,
        }
    }

    /// Accepts `null`.
    pub const fn nullable() -> Self {
        Self {
            nullable: true,
            ..Self::strict()
        }
    }

    /// Accepts a missing property.
    pub const fn optional() -> Self {
        Self {
            optional: true,
            ..Self::strict()
        }
    }

    /// Accepts an explicit `undefined`.
    pub const fn maybe_undefined() -> Self {
        Self {
            defined: false,
            ..Self::strict()
        }
    }

    /// Returns a copy with `nullable` set.
    pub const fn with_nullable(self, nullable: bool) -> Self {
        Self { nullable, ..self }
    }

    /// Returns a copy with `optional` set.
    pub const fn with_optional(self, optional: bool) -> Self {
        Self { optional, ..self }
    }

    /// Returns a copy with `defined` set.
    pub const fn with_defined(self, defined: bool) -> Self {
        Self { defined, ..self }
    }

    /// True for the default record.
    pub fn is_strict(&self) -> bool {
        *self == Self::strict()
    }

    /// Whether the given absence form is acceptable.
    pub fn permits(&self, absence: Absence, track_property_existence: bool) -> bool {
        match absence {
            Absence::Null => self.nullable,
            Absence::Undefined => !self.defined || (self.optional && !track_property_existence),
            // Without tracking a missing property is indistinguishable from undefined.
            Absence::NoProperty if !track_property_existence => {
                self.permits(Absence::Undefined, false)
            }
            Absence::NoProperty => self.optional,
        }
    }

    /// The permitted absence forms, in display order and without repeats.
    pub fn permitted(&self, track_property_existence: bool) -> Vec<Absence> {
        let candidates: &[Absence] = if track_property_existence {
            &[Absence::Null, Absence::Undefined, Absence::NoProperty]
        } else {
            &[Absence::Null, Absence::Undefined]
        };
        candidates
            .iter()
            .copied()
            .filter(|a| self.permits(*a, track_property_existence))
            .collect()
    }
}
