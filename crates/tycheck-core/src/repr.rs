//! # Representation Service
//!
//! Maps dynamic values and type shapes to the short labels that appear in
//! diagnostics. Value labels go through the [`Represent`] trait, which the
//! validation engine is generic over; [`Repr`] is the stock implementation
//! driven by [`ValidationOptions`]. Type labels are the free function
//! [`type_label`], so entities can memoize them.
//!
//! ## Value labels
//!
//! | Value | label | with `render_values` |
//! |-------|-------|----------------------|
//! | missing | `<no-property>` / `undefined` | same |
//! | `Undefined` | `undefined` | same |
//! | `Null` | `null` | same |
//! | `Bool` | `boolean` | `true` / `false` |
//! | `Number` | `number` | `42`, `1.5` |
//! | `String` | `string` | `"abc"` |
//! | `Array` | `<array>` | same |
//! | `Object` | `<object>` | same |
//! | `Opaque` | error | error |
//!
//! A missing property is labelled `<no-property>` only while property
//! existence tracking is on; otherwise it is `undefined`.

use crate::error::ReprError;
use crate::nullability::{Absence, Nullability};
use crate::options::ValidationOptions;
use crate::value::{Map, Value};

pub const NULL_LABEL: &str = "null";
pub const UNDEFINED_LABEL: &str = "undefined";
pub const NO_PROPERTY_LABEL: &str = "<no-property>";
pub const ARRAY_LABEL: &str = "<array>";
pub const OBJECT_LABEL: &str = "<object>";
pub const BOOLEAN_LABEL: &str = "boolean";
pub const NUMBER_LABEL: &str = "number";
pub const STRING_LABEL: &str = "string";

/// Separator between union members in type labels.
pub const UNION_DELIMITER: &str = " | ";

/// Label source for values seen during validation.
///
/// Implementations must be pure: the same input and the same options give
/// the same label every time. Only the "found" side of a diagnostic comes
/// from here; type labels depend on nothing but the type and the tracking
/// flag and are rendered by [`type_label`].
pub trait Represent {
    /// Whether a missing property is distinguished from `undefined`.
    fn track_property_existence(&self) -> bool;

    /// Label of a present value.
    fn value_label(&self, value: &Value) -> Result<String, ReprError>;

    /// The absence form of a possibly-missing value, or `None` if present
    /// and neither `null` nor `undefined`.
    fn absence(&self, slot: Option<&Value>) -> Option<Absence> {
        match slot {
            None if self.track_property_existence() => Some(Absence::NoProperty),
            None | Some(Value::Undefined) => Some(Absence::Undefined),
            Some(Value::Null) => Some(Absence::Null),
            Some(_) => None,
        }
    }

    /// Label of a possibly-missing value.
    fn slot_label(&self, slot: Option<&Value>) -> Result<String, ReprError> {
        match (self.absence(slot), slot) {
            (Some(absence), _) => Ok(absence.label().to_string()),
            (None, Some(value)) => self.value_label(value),
            (None, None) => Ok(UNDEFINED_LABEL.to_string()),
        }
    }

    /// Label of `object[name]`, which may not exist.
    fn property_label(&self, object: &Map, name: &str) -> Result<String, ReprError> {
        self.slot_label(object.get(name))
    }
}

/// The stock [`Represent`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Repr {
    options: ValidationOptions,
}

impl Repr {
    pub fn new(options: ValidationOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }
}

impl Represent for Repr {
    fn track_property_existence(&self) -> bool {
        self.options.track_property_existence
    }

    fn value_label(&self, value: &Value) -> Result<String, ReprError> {
        let render = self.options.render_values;
        let label = match value {
            Value::Undefined => UNDEFINED_LABEL.to_string(),
            Value::Null => NULL_LABEL.to_string(),
            Value::Bool(b) if render => b.to_string(),
            Value::Bool(_) => BOOLEAN_LABEL.to_string(),
            Value::Number(n) if render => format_number(*n),
            Value::Number(_) => NUMBER_LABEL.to_string(),
            Value::String(s) if render => serde_json::Value::String(s.clone()).to_string(),
            Value::String(_) => STRING_LABEL.to_string(),
            Value::Array(_) => ARRAY_LABEL.to_string(),
            Value::Object(_) => OBJECT_LABEL.to_string(),
            Value::Opaque(kind) => {
                return Err(ReprError::UnsupportedKind { kind: kind.clone() });
            }
        };
        Ok(label)
    }
}

/// Render a type label with its nullability suffix.
///
/// `is_union` marks a base that is itself a `|`-joined list; it is
/// parenthesized before a suffix is appended so the suffix reads as one
/// more alternative of the whole union.
pub fn type_label(
    base: &str,
    is_union: bool,
    nullability: Nullability,
    track_property_existence: bool,
) -> String {
    let permitted = nullability.permitted(track_property_existence);
    if permitted.is_empty() {
        return base.to_string();
    }
    let mut label = if is_union {
        format!("({base})")
    } else {
        base.to_string()
    };
    for absence in permitted {
        label.push_str(UNION_DELIMITER);
        label.push_str(absence.label());
    }
    label
}

fn format_number(n: f64) -> String {
    // Largest integer below which every f64 integer is exact.
    const MAX_SAFE: f64 = 9_007_199_254_740_992.0;
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{sign}Infinity")
    } else if n.fract() == 0.0 && n.abs() < MAX_SAFE {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repr(track: bool, render: bool) -> Repr {
        Repr::new(
            ValidationOptions::new()
                .with_property_tracking(track)
                .with_rendered_values(render),
        )
    }

    #[test]
    fn test_kind_labels() {
        let r = repr(false, false);
        assert_eq!(r.value_label(&Value::from(0)).unwrap(), "number");
        assert_eq!(r.value_label(&Value::from("0")).unwrap(), "string");
        assert_eq!(r.value_label(&Value::Bool(true)).unwrap(), "boolean");
        assert_eq!(r.value_label(&Value::Array(vec![])).unwrap(), "<array>");
        assert_eq!(r.value_label(&Value::object::<&str, Value>([])).unwrap(), "<object>");
        assert_eq!(r.value_label(&Value::Null).unwrap(), "null");
        assert_eq!(r.value_label(&Value::Undefined).unwrap(), "undefined");
    }

    #[test]
    fn test_rendered_labels() {
        let r = repr(false, true);
        assert_eq!(r.value_label(&Value::from(42)).unwrap(), "42");
        assert_eq!(r.value_label(&Value::from(1.5)).unwrap(), "1.5");
        assert_eq!(r.value_label(&Value::from("a\"b")).unwrap(), r#""a\"b""#);
        assert_eq!(r.value_label(&Value::Bool(false)).unwrap(), "false");
        assert_eq!(r.value_label(&Value::Number(f64::NAN)).unwrap(), "NaN");
        assert_eq!(r.value_label(&Value::Number(f64::NEG_INFINITY)).unwrap(), "-Infinity");
        assert_eq!(r.value_label(&Value::Array(vec![Value::Null])).unwrap(), "<array>");
    }

    #[test]
    fn test_opaque_value_is_an_error() {
        let err = repr(false, false)
            .value_label(&Value::Opaque("function".into()))
            .unwrap_err();
        assert_eq!(err, ReprError::UnsupportedKind { kind: "function".into() });
    }

    #[test]
    fn test_missing_property_label_depends_on_tracking() {
        let object = Map::new();
        assert_eq!(repr(false, false).property_label(&object, "p").unwrap(), "undefined");
        assert_eq!(repr(true, false).property_label(&object, "p").unwrap(), "<no-property>");
    }

    #[test]
    fn test_present_undefined_property_is_undefined() {
        let mut object = Map::new();
        object.insert("p".into(), Value::Undefined);
        assert_eq!(repr(true, false).property_label(&object, "p").unwrap(), "undefined");
    }

    #[test]
    fn test_absence_of_present_value_is_none() {
        let r = repr(true, false);
        assert_eq!(r.absence(Some(&Value::from(1))), None);
        assert_eq!(r.absence(Some(&Value::Null)), Some(Absence::Null));
        assert_eq!(r.absence(None), Some(Absence::NoProperty));
    }

    #[test]
    fn test_type_label_suffixes() {
        assert_eq!(type_label("Int", false, Nullability::strict(), false), "Int");
        assert_eq!(type_label("Int", false, Nullability::nullable(), false), "Int | null");
        assert_eq!(
            type_label("Int | String", true, Nullability::nullable(), false),
            "(Int | String) | null"
        );
        assert_eq!(type_label("Int", false, Nullability::optional(), false), "Int | undefined");
        assert_eq!(type_label("Int", false, Nullability::optional(), true), "Int | <no-property>");
    }
}
