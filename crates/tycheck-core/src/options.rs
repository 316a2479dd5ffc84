//! # Validation Options
//!
//! Display options that affect how diagnostics are labelled. They are
//! passed explicitly into every validation call; [`ValidationOptions::from_env`]
//! is the single place where a process-wide default is derived.
//!
//! Variables:
//! - `TYCHECK_TRACK_PROPERTIES`: distinguish a missing property from an
//!   explicit `undefined` (default: off)
//! - `TYCHECK_RENDER_VALUES`: render literal values (`42`, `"abc"`)
//!   instead of kind names (`number`, `string`) (default: off)

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable enabling property-existence tracking.
pub const TRACK_PROPERTIES_VAR: &str = "TYCHECK_TRACK_PROPERTIES";

/// Environment variable enabling literal value rendering.
pub const RENDER_VALUES_VAR: &str = "TYCHECK_RENDER_VALUES";

/// Options read (never written) by a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationOptions {
    /// Report a missing property as `<no-property>` rather than `undefined`.
    pub track_property_existence: bool,
    /// Render primitive values literally in `found` labels.
    pub render_values: bool,
}

impl ValidationOptions {
    /// Both flags off.
    pub const fn new() -> Self {
        Self {
            track_property_existence: false,
            render_values: false,
        }
    }

    /// Returns a copy with property-existence tracking set.
    pub const fn with_property_tracking(self, track_property_existence: bool) -> Self {
        Self {
            track_property_existence,
            ..self
        }
    }

    /// Returns a copy with literal value rendering set.
    pub const fn with_rendered_values(self, render_values: bool) -> Self {
        Self {
            render_values,
            ..self
        }
    }

    /// Read options from the environment, failing on unparseable flags.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::try_from_lookup(|var| std::env::var(var).ok())
    }

    /// Read options from the environment.
    ///
    /// Unparseable flags are logged and left at their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn try_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut options = Self::new();
        if let Some(raw) = lookup(TRACK_PROPERTIES_VAR) {
            options.track_property_existence = parse_flag(TRACK_PROPERTIES_VAR, &raw)?;
        }
        if let Some(raw) = lookup(RENDER_VALUES_VAR) {
            options.render_values = parse_flag(RENDER_VALUES_VAR, &raw)?;
        }
        Ok(options)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |var: &str| match lookup(var).map(|raw| parse_flag(var, &raw)) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                tracing::warn!(var, error = %e, "ignoring invalid option flag");
                false
            }
            None => false,
        };
        Self {
            track_property_existence: flag(TRACK_PROPERTIES_VAR),
            render_values: flag(RENDER_VALUES_VAR),
        }
    }

    /// Apply per-call overrides over these options.
    pub fn apply(self, overrides: OptionOverrides) -> Self {
        Self {
            track_property_existence: overrides
                .track_property_existence
                .unwrap_or(self.track_property_existence),
            render_values: overrides.render_values.unwrap_or(self.render_values),
        }
    }
}

/// Per-call overrides. `None` keeps the base configuration's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionOverrides {
    /// Override for [`ValidationOptions::track_property_existence`].
    pub track_property_existence: Option<bool>,
    /// Override for [`ValidationOptions::render_values`].
    pub render_values: Option<bool>,
}

fn parse_flag(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var: var.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var: &str| map.get(var).cloned()
    }

    #[test]
    fn test_default_is_all_off() {
        let options = ValidationOptions::default();
        assert!(!options.track_property_existence);
        assert!(!options.render_values);
        assert_eq!(options, ValidationOptions::new());
    }

    #[test]
    fn test_flags_parsed_from_lookup() {
        let options = ValidationOptions::try_from_lookup(lookup(&[
            (TRACK_PROPERTIES_VAR, "yes"),
            (RENDER_VALUES_VAR, "0"),
        ]))
        .unwrap();
        assert!(options.track_property_existence);
        assert!(!options.render_values);
    }

    #[test]
    fn test_invalid_flag_is_an_error() {
        let err = ValidationOptions::try_from_lookup(lookup(&[(RENDER_VALUES_VAR, "maybe")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidFlag {
                var: RENDER_VALUES_VAR.to_string(),
                value: "maybe".to_string(),
            }
        );
    }

    #[test]
    fn test_lenient_lookup_falls_back() {
        let options = ValidationOptions::from_lookup(lookup(&[
            (TRACK_PROPERTIES_VAR, "sometimes"),
            (RENDER_VALUES_VAR, "ON"),
        ]));
        assert!(!options.track_property_existence);
        assert!(options.render_values);
    }

    #[test]
    fn test_overrides_only_touch_given_flags() {
        let base = ValidationOptions::new().with_rendered_values(true);
        let merged = base.apply(OptionOverrides {
            track_property_existence: Some(true),
            render_values: None,
        });
        assert!(merged.track_property_existence);
        assert!(merged.render_values);
    }

    #[test]
    fn test_options_deserialize_partially() {
        let options: ValidationOptions =
            serde_json::from_str(r#"{"render_values": true}"#).unwrap();
        assert_eq!(options, ValidationOptions::new().with_rendered_values(true));
    }
}
