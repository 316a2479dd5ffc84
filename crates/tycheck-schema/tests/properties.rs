//! Property tests for the validation engine and diagnostic tree.

use proptest::prelude::*;
use serde_json::json;
use tycheck_core::{ValidationOptions, Value};
use tycheck_schema::scalar::{boolean, int, string};
use tycheck_schema::{
    build_tree, flatten, validate, Diagnostic, PropertyName, SchemaError, TypeEntity, TypeRef,
    Validator,
};

/// Depth sequences a traversal can produce: start at 0, descend at most one
/// level at a time, return to any shallower level.
fn depth_stream() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<bool>(), 0..40).prop_map(|steps| {
        let mut depths = Vec::with_capacity(steps.len());
        let mut depth = 0usize;
        for (i, descend) in steps.into_iter().enumerate() {
            if i > 0 {
                depth = if descend { depth + 1 } else { depth / 2 };
            }
            depths.push(depth);
        }
        depths
    })
}

fn scalar_json() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(|b| json!(b)),
        any::<i32>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|n| json!(n)),
        "[a-z0-9]{0,8}".prop_map(|s| json!(s)),
    ]
}

fn is_valid(root: &TypeEntity, value: &Value, track: bool) -> bool {
    validate(root, value, ValidationOptions::new().with_property_tracking(track))
        .unwrap()
        .is_valid()
}

proptest! {
    /// Flattening a built tree gives back the original stream.
    #[test]
    fn tree_reconstruction_is_idempotent(depths in depth_stream()) {
        let stream: Vec<Diagnostic> = depths
            .iter()
            .enumerate()
            .map(|(i, depth)| Diagnostic::new(PropertyName::Index(i), *depth, "E", "F"))
            .collect();
        let tree = build_tree(stream.clone()).unwrap();
        prop_assert_eq!(flatten(&tree), stream);
    }

    /// A union accepts exactly the values some member accepts.
    #[test]
    fn union_accepts_iff_some_member_accepts(raw in scalar_json(), track in any::<bool>()) {
        let value = Value::from(raw);
        let members = [int(), string(), boolean()];
        let union = TypeEntity::either(members.clone());
        let any_member = members.iter().any(|m| is_valid(m, &value, track));
        prop_assert_eq!(is_valid(&union, &value, track), any_member);
    }

    /// A failing union reports itself first, at the union's depth.
    #[test]
    fn failing_union_reports_itself_first(raw in scalar_json()) {
        let value = Value::from(raw);
        let union = TypeEntity::either([int(), string()]);
        let repr = tycheck_core::Repr::default();
        let out = Validator::new(&repr).diagnostics(&union, &value).unwrap();
        if let Some(first) = out.first() {
            prop_assert_eq!(first.depth, 0);
            prop_assert_eq!(&first.expected, "(Int | String)");
        }
    }

    /// Every undeclared property is reported once, with the absence label
    /// that matches the tracking mode. One present as `undefined` is
    /// reported only while tracking is on.
    #[test]
    fn redundant_properties_are_reported_symmetrically(
        keys in prop::collection::btree_map("[a-z]{1,6}", any::<bool>(), 0..6),
        track in any::<bool>(),
    ) {
        let schema = TypeEntity::schema("Empty", Vec::<(&str, TypeEntity)>::new()).unwrap();
        let value = Value::object(keys.iter().map(|(key, undefined)| {
            (key.as_str(), if *undefined { Value::Undefined } else { Value::from(1) })
        }));
        let report = validate(&schema, &value, ValidationOptions::new().with_property_tracking(track)).unwrap();
        let expected = if track { "<no-property>" } else { "undefined" };
        let reported: Vec<_> = keys.iter().filter(|(_, undefined)| track || !**undefined).collect();
        prop_assert_eq!(report.errors().len(), reported.len());
        for (node, (key, undefined)) in report.errors().iter().zip(reported) {
            prop_assert_eq!(&node.name, &PropertyName::Field(key.clone()));
            prop_assert_eq!(&node.expected, expected);
            prop_assert_eq!(&node.found, if *undefined { "undefined" } else { "number" });
        }
    }

    /// Positions past a tuple's arity follow the same rule as undeclared
    /// properties.
    #[test]
    fn redundant_tuple_positions_are_reported_symmetrically(
        extra in prop::collection::vec(any::<bool>(), 0..6),
        track in any::<bool>(),
    ) {
        let root = TypeEntity::tuple([int()]);
        let mut items = vec![Value::from(1)];
        items.extend(extra.iter().map(|undefined| if *undefined { Value::Undefined } else { Value::from(1) }));
        let repr = tycheck_core::Repr::new(ValidationOptions::new().with_property_tracking(track));
        let out = Validator::new(&repr).diagnostics(&root, &Value::Array(items)).unwrap();
        let reported: Vec<usize> = extra
            .iter()
            .enumerate()
            .filter(|(_, undefined)| track || !**undefined)
            .map(|(i, _)| i + 1)
            .collect();
        if reported.is_empty() {
            prop_assert!(out.is_empty());
        } else {
            let expected = if track { "<no-property>" } else { "undefined" };
            prop_assert_eq!(&out[0].expected, "[Int]");
            prop_assert_eq!(out.len(), reported.len() + 1);
            for (diagnostic, index) in out[1..].iter().zip(reported) {
                prop_assert_eq!(&diagnostic.name, &PropertyName::Index(index));
                prop_assert_eq!(diagnostic.depth, 1);
                prop_assert_eq!(&diagnostic.expected, expected);
            }
        }
    }

    /// Binding succeeds exactly when the slots can hold the bindings.
    #[test]
    fn template_arity_is_enforced(declared in 0usize..5, first in 0usize..5, second in 0usize..5) {
        let names: Vec<String> = (0..declared).map(|i| format!("T{i}")).collect();
        let template = TypeEntity::tuple(names.iter().map(|n| TypeRef::slot(n.clone())))
            .declare(names.clone());
        match template.bind(vec![int(); first]) {
            Ok(partial) => {
                prop_assert!(first <= declared);
                match partial.bind(vec![string(); second]) {
                    Ok(full) => {
                        prop_assert!(first + second <= declared);
                        prop_assert_eq!(full.is_fully_instantiated(), first + second == declared);
                    }
                    Err(err) => {
                        prop_assert!(first + second > declared);
                        prop_assert_eq!(
                            err,
                            SchemaError::TemplateArity { declared, bound: first, supplied: second }
                        );
                    }
                }
            }
            Err(_) => prop_assert!(first > declared),
        }
    }

    /// A composite reports itself only when, and right before, a child fails.
    #[test]
    fn composite_common_diagnostic_is_ejected_before_children(
        items in prop::collection::vec(prop_oneof![
            any::<i16>().prop_map(|n| json!(n)),
            "[a-z]{1,4}".prop_map(|s| json!(s)),
        ], 0..10),
    ) {
        let root = TypeEntity::array(int());
        let failures = items.iter().filter(|item| !item.is_number()).count();
        let repr = tycheck_core::Repr::default();
        let out = Validator::new(&repr)
            .diagnostics(&root, &Value::from(json!(items)))
            .unwrap();
        if failures == 0 {
            prop_assert!(out.is_empty());
        } else {
            prop_assert_eq!(out.len(), failures + 1);
            prop_assert_eq!(out[0].depth, 0);
            prop_assert_eq!(&out[0].expected, "Int[]");
            prop_assert!(out[1..].iter().all(|d| d.depth == 1));
        }
    }
}
