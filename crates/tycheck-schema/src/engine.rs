//! # Validation Engine
//!
//! Walks a value against an entity graph and emits the depth-tagged
//! diagnostic stream that [`ValidationReport`](crate::ValidationReport) is
//! built from.
//!
//! ## Traversal
//!
//! Every entity first runs the nullability check: an absent value (`null`,
//! `undefined`, or a missing property) either is permitted, which ends the
//! check successfully, or produces one diagnostic, which ends it with
//! failure. Present values are then checked by shape:
//!
//! - **Scalar**: the predicate.
//! - **Array, Tuple, Schema**: container shape, then each child one level
//!   deeper, then members the type does not declare. The composite's own
//!   diagnostic is emitted only if some child failed, and then before the
//!   children.
//! - **Either**: every member at the union's own depth, stopping at the
//!   first that accepts. If none does, the union reports itself and the
//!   least-wrong member's diagnostics (see [`crate::either`]).
//!
//! A Schema root given an object reports its fields directly at depth 0.
//! A bare union at the root is labelled in parentheses, `(Int | String)`,
//! the way it reads inside another label.

use tycheck_core::repr::{NO_PROPERTY_LABEL, UNDEFINED_LABEL};
use tycheck_core::{Map, Represent, Value};

use crate::bindings::Bindings;
use crate::diagnostic::{Diagnostic, PropertyName};
use crate::either::select_least_wrong;
use crate::entity::{Field, Shape, TypeEntity};
use crate::error::SchemaError;

/// Produces diagnostics using a given label source.
#[derive(Debug)]
pub struct Validator<'r, R: Represent> {
    repr: &'r R,
}

impl<'r, R: Represent> Validator<'r, R> {
    pub fn new(repr: &'r R) -> Self {
        Self { repr }
    }

    /// The diagnostic stream for `value` checked against `root`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::TemplateNotInstantiated`] if `root` has unbound
    /// slots, and any resolution or labelling error met during traversal.
    pub fn diagnostics(
        &self,
        root: &TypeEntity,
        value: &Value,
    ) -> Result<Vec<Diagnostic>, SchemaError> {
        if !root.is_fully_instantiated() {
            return Err(SchemaError::TemplateNotInstantiated {
                label: root.label(self.track()),
                declared: root.declared_slots().len(),
                bound: root.bound_slots().len(),
            });
        }
        let mut out = Vec::new();
        let scope = Bindings::new();
        match (root.shape(), value) {
            (Shape::Schema { fields, .. }, Value::Object(object)) => {
                self.check_record(fields, object, &scope.enter(root), 0, &mut out)?;
            }
            _ => {
                self.check(root, &scope, PropertyName::Root, Some(value), 0, &mut out)?;
                // A strict bare union at the root reads `(Int | String)`.
                let framed = root.is_bare_union(&scope)
                    && root.nullability().permitted(self.track()).is_empty();
                if let (true, Some(first)) = (framed, out.first_mut()) {
                    first.expected = format!("({})", first.expected);
                }
            }
        }
        Ok(out)
    }

    fn track(&self) -> bool {
        self.repr.track_property_existence()
    }

    fn check(
        &self,
        entity: &TypeEntity,
        inherited: &Bindings,
        name: PropertyName,
        slot: Option<&Value>,
        depth: usize,
        out: &mut Vec<Diagnostic>,
    ) -> Result<(), SchemaError> {
        let track = self.track();
        if let Some(absence) = self.repr.absence(slot) {
            if !entity.nullability().permits(absence, track) {
                out.push(Diagnostic::new(
                    name,
                    depth,
                    entity.label_in(inherited, track),
                    self.repr.slot_label(slot)?,
                ));
            }
            return Ok(());
        }
        let Some(value) = slot else {
            return Ok(());
        };
        let env = inherited.enter(entity);
        match entity.shape() {
            Shape::Scalar(scalar) => {
                if !scalar.accepts(value) {
                    out.push(Diagnostic::new(
                        name,
                        depth,
                        scalar.name(),
                        self.repr.value_label(value)?,
                    ));
                }
            }
            Shape::Array { element } => {
                let common = self.common(entity, inherited, name, value, depth)?;
                let Value::Array(items) = value else {
                    out.push(common);
                    return Ok(());
                };
                let (element, scope) = env.resolve(element)?;
                let mut children = Vec::new();
                for (index, item) in items.iter().enumerate() {
                    self.check(&element, &scope, index.into(), Some(item), depth + 1, &mut children)?;
                }
                eject(common, children, out);
            }
            Shape::Tuple { elements, .. } => {
                let common = self.common(entity, inherited, name, value, depth)?;
                let Value::Array(items) = value else {
                    out.push(common);
                    return Ok(());
                };
                let mut children = Vec::new();
                for (index, element) in elements.iter().enumerate() {
                    let (element, scope) = env.resolve(element)?;
                    self.check(&element, &scope, index.into(), items.get(index), depth + 1, &mut children)?;
                }
                for (index, item) in items.iter().enumerate().skip(elements.len()) {
                    let found = self.repr.slot_label(Some(item))?;
                    self.redundant(index.into(), item, found, depth + 1, &mut children);
                }
                eject(common, children, out);
            }
            Shape::Schema { fields, .. } => {
                let common = self.common(entity, inherited, name, value, depth)?;
                let Value::Object(object) = value else {
                    out.push(common);
                    return Ok(());
                };
                let mut children = Vec::new();
                self.check_record(fields, object, &env, depth + 1, &mut children)?;
                eject(common, children, out);
            }
            Shape::Either { .. } => {
                let mut streams = Vec::new();
                for (_, member) in entity.union_members(&env) {
                    let (member, scope) = member?;
                    let mut stream = Vec::new();
                    self.check(&member, &scope, name.clone(), slot, depth, &mut stream)?;
                    if stream.is_empty() {
                        return Ok(());
                    }
                    streams.push(stream);
                }
                out.push(self.common(entity, inherited, name, value, depth)?);
                if let Some(best) = select_least_wrong(&streams, depth) {
                    out.extend(streams.swap_remove(best).into_iter().skip(1));
                }
            }
        }
        Ok(())
    }

    /// Declared fields in order, then undeclared properties.
    fn check_record(
        &self,
        fields: &[Field],
        object: &Map,
        env: &Bindings,
        depth: usize,
        out: &mut Vec<Diagnostic>,
    ) -> Result<(), SchemaError> {
        for field in fields {
            let (ty, scope) = env.resolve(field.ty())?;
            self.check(&ty, &scope, field.name().into(), object.get(field.name()), depth, out)?;
        }
        for (key, item) in object {
            if !fields.iter().any(|field| field.name() == key) {
                let found = self.repr.property_label(object, key)?;
                self.redundant(key.as_str().into(), item, found, depth, out);
            }
        }
        Ok(())
    }

    /// A member present in the value but not in the type.
    fn redundant(
        &self,
        name: PropertyName,
        value: &Value,
        found: String,
        depth: usize,
        out: &mut Vec<Diagnostic>,
    ) {
        let track = self.track();
        if matches!(value, Value::Undefined) && !track {
            return;
        }
        let expected = if track { NO_PROPERTY_LABEL } else { UNDEFINED_LABEL };
        out.push(Diagnostic::new(name, depth, expected, found));
    }

    fn common(
        &self,
        entity: &TypeEntity,
        inherited: &Bindings,
        name: PropertyName,
        value: &Value,
        depth: usize,
    ) -> Result<Diagnostic, SchemaError> {
        Ok(Diagnostic::new(
            name,
            depth,
            entity.label_in(inherited, self.track()),
            self.repr.value_label(value)?,
        ))
    }
}

/// Emit `common` followed by `children`, or nothing if no child failed.
fn eject(common: Diagnostic, children: Vec<Diagnostic>, out: &mut Vec<Diagnostic>) {
    if children.is_empty() {
        return;
    }
    out.push(common);
    out.extend(children);
}
