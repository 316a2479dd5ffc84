//! Builtin scalars.
//!
//! Each builtin is a process-wide singleton so repeated uses share one
//! identity, which is what union de-duplication compares.

use std::sync::OnceLock;

use tycheck_core::Value;

use crate::entity::TypeEntity;

macro_rules! builtin {
    ($(#[$doc:meta])* $fn_name:ident, $label:literal, $predicate:expr) => {
        $(#[$doc])*
        pub fn $fn_name() -> TypeEntity {
            static CELL: OnceLock<TypeEntity> = OnceLock::new();
            CELL.get_or_init(|| TypeEntity::scalar($label, $predicate)).clone()
        }
    };
}

builtin!(
    /// A finite number with no fractional part.
    int,
    "Int",
    |value: &Value| matches!(value, Value::Number(n) if n.is_finite() && n.fract() == 0.0)
);

builtin!(
    /// Any number, including `NaN` and the infinities.
    number,
    "Number",
    |value: &Value| matches!(value, Value::Number(_))
);

builtin!(string, "String", |value: &Value| matches!(value, Value::String(_)));

builtin!(boolean, "Boolean", |value: &Value| matches!(value, Value::Bool(_)));

builtin!(
    /// Any present value. Absence is still governed by nullability.
    unknown,
    "Unknown",
    |_: &Value| true
);
