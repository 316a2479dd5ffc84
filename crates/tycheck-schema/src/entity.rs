//! # Type Entities
//!
//! A [`TypeEntity`] describes an expected shape. It is one of five
//! variants ([`Shape`]):
//!
//! | Variant | Matches | Label |
//! |---------|---------|-------|
//! | Scalar  | any value accepted by its predicate | `Int` |
//! | Array   | an array whose every element matches | `Int[]` |
//! | Tuple   | an array matching element types positionally | `[Int, String]` |
//! | Either  | a value matching at least one member | `Int \| String` |
//! | Schema  | an object whose declared fields match | `Point` |
//!
//! Every entity also carries a [`Nullability`] record and, when used as
//! a template, declared slot names plus the bindings supplied so far.
//!
//! ## Immutability
//!
//! Entities are shared (`Arc`) and never mutated. [`TypeEntity::opts`],
//! [`TypeEntity::declare`], [`TypeEntity::bind`] and [`TypeEntity::named`]
//! return a new entity, so one template can be instantiated many times
//! without interference. Identity (`ptr_eq`) is what union de-duplication
//! compares.
//!
//! ## Labels
//!
//! An entity's label is memoized per tracking mode when it does not depend
//! on bindings from an enclosing scope. Otherwise it is rendered against
//! the scope it is seen in, falling back to the slot name for anything
//! unresolved.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock};

use tycheck_core::repr::{type_label, UNION_DELIMITER};
use tycheck_core::{Nullability, Value};

use crate::bindings::Bindings;
use crate::description::Description;
use crate::error::SchemaError;

/// Acceptance test of a scalar.
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A named predicate over present values.
#[derive(Clone)]
pub struct Scalar {
    name: String,
    predicate: Predicate,
}

impl Scalar {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Apply the predicate.
    pub fn accepts(&self, value: &Value) -> bool {
        (self.predicate)(value)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scalar").field("name", &self.name).finish()
    }
}

/// A reference to a dependency slot, optionally overriding the
/// nullability of whatever the slot resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRef {
    name: String,
    nullability: Option<Nullability>,
}

impl SlotRef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nullability(&self) -> Option<Nullability> {
        self.nullability
    }
}

/// A child position in a composite: a concrete entity or a slot name.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Entity(TypeEntity),
    Slot(SlotRef),
}

impl TypeRef {
    /// A reference to the slot `name`.
    pub fn slot(name: impl Into<String>) -> Self {
        Self::Slot(SlotRef {
            name: name.into(),
            nullability: None,
        })
    }

    /// Apply `nullability` to whatever this reference denotes.
    ///
    /// Entities are copied with the new record; slots remember it and apply
    /// it on resolution. A strict record leaves entities untouched so that
    /// shared singletons keep their identity.
    pub fn with_nullability(self, nullability: Nullability) -> Self {
        match self {
            Self::Entity(entity) if entity.nullability() == nullability => Self::Entity(entity),
            Self::Entity(entity) => Self::Entity(entity.opts(nullability)),
            Self::Slot(slot) => Self::Slot(SlotRef {
                nullability: Some(nullability),
                ..slot
            }),
        }
    }

    /// Identity comparison: same entity instance, or same slot reference.
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Entity(a), Self::Entity(b)) => a.ptr_eq(b),
            (Self::Slot(a), Self::Slot(b)) => a == b,
            _ => false,
        }
    }

    fn collect_free(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Entity(entity) => out.extend(entity.0.free.iter().cloned()),
            Self::Slot(slot) => {
                out.insert(slot.name.clone());
            }
        }
    }

    fn fallback_label(&self, env: &Bindings, track: bool) -> String {
        match self {
            Self::Entity(entity) => entity.nested_label(env, track),
            Self::Slot(slot) => slot.name.clone(),
        }
    }
}

impl From<TypeEntity> for TypeRef {
    fn from(entity: TypeEntity) -> Self {
        Self::Entity(entity)
    }
}

impl From<&TypeEntity> for TypeRef {
    fn from(entity: &TypeEntity) -> Self {
        Self::Entity(entity.clone())
    }
}

/// A named field of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: TypeRef,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }
}

/// The variant-specific part of an entity.
#[derive(Debug, Clone)]
pub enum Shape {
    Scalar(Scalar),
    Array {
        element: TypeRef,
    },
    Tuple {
        elements: Vec<TypeRef>,
        name: Option<String>,
    },
    Either {
        members: Vec<TypeRef>,
        name: Option<String>,
    },
    Schema {
        name: String,
        fields: Vec<Field>,
    },
}

impl Shape {
    fn children(&self) -> Box<dyn Iterator<Item = &TypeRef> + '_> {
        match self {
            Self::Scalar(_) => Box::new(std::iter::empty()),
            Self::Array { element } => Box::new(std::iter::once(element)),
            Self::Tuple { elements, .. } => Box::new(elements.iter()),
            Self::Either { members, .. } => Box::new(members.iter()),
            Self::Schema { fields, .. } => Box::new(fields.iter().map(|f| &f.ty)),
        }
    }
}

/// Discriminant of [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Scalar,
    Array,
    Tuple,
    Either,
    Schema,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Either => "either",
            Self::Schema => "schema",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
struct Parts {
    shape: Shape,
    nullability: Nullability,
    declared: Vec<String>,
    bound: Vec<TypeRef>,
}

struct EntityData {
    parts: Parts,
    /// Slot names this entity needs from an enclosing scope.
    free: BTreeSet<String>,
    /// Memoized labels, indexed by the property-tracking flag.
    labels: [OnceLock<String>; 2],
}

/// An immutable, shareable type description.
#[derive(Clone)]
pub struct TypeEntity(Arc<EntityData>);

impl TypeEntity {
    fn from_parts(parts: Parts) -> Self {
        let mut free = BTreeSet::new();
        for child in parts.shape.children() {
            child.collect_free(&mut free);
        }
        for name in &parts.declared[..parts.bound.len()] {
            free.remove(name);
        }
        for binding in &parts.bound {
            binding.collect_free(&mut free);
        }
        Self(Arc::new(EntityData {
            parts,
            free,
            labels: [OnceLock::new(), OnceLock::new()],
        }))
    }

    fn from_shape(shape: Shape) -> Self {
        Self::from_parts(Parts {
            shape,
            nullability: Nullability::strict(),
            declared: Vec::new(),
            bound: Vec::new(),
        })
    }

    fn derive(&self, update: impl FnOnce(&mut Parts)) -> Self {
        let mut parts = self.0.parts.clone();
        update(&mut parts);
        Self::from_parts(parts)
    }

    /// A scalar accepting present values for which `predicate` holds.
    pub fn scalar(
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::from_shape(Shape::Scalar(Scalar {
            name: name.into(),
            predicate: Arc::new(predicate),
        }))
    }

    /// An array of `element`.
    pub fn array(element: impl Into<TypeRef>) -> Self {
        Self::from_shape(Shape::Array {
            element: element.into(),
        })
    }

    /// A fixed-arity tuple.
    pub fn tuple<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeRef>,
    {
        Self::from_shape(Shape::Tuple {
            elements: elements.into_iter().map(Into::into).collect(),
            name: None,
        })
    }

    /// A union of `members`.
    ///
    /// Anonymous strict unions among the members are spliced in, and
    /// repeated members (by identity) are dropped.
    pub fn either<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<TypeRef>,
    {
        let mut flat = Vec::new();
        for member in members {
            push_union_member(&mut flat, member.into());
        }
        Self::from_shape(Shape::Either {
            members: flat,
            name: None,
        })
    }

    /// A record with the given fields, in declaration order.
    pub fn schema<I, N, T>(name: impl Into<String>, fields: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<TypeRef>,
    {
        let name = name.into();
        let mut collected: Vec<Field> = Vec::new();
        for (field, ty) in fields {
            let field: String = field.into();
            if collected.iter().any(|f| f.name == field) {
                return Err(SchemaError::DuplicateField {
                    schema: name,
                    field,
                });
            }
            collected.push(Field {
                name: field,
                ty: ty.into(),
            });
        }
        Ok(Self::from_shape(Shape::Schema {
            name,
            fields: collected,
        }))
    }

    /// Copy with a display name. Arrays have no name and are returned
    /// unchanged.
    pub fn named(&self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        match self.shape() {
            Shape::Array { .. } => self.clone(),
            _ => self.derive(|parts| match &mut parts.shape {
                Shape::Scalar(scalar) => scalar.name = display_name,
                Shape::Tuple { name, .. } | Shape::Either { name, .. } => {
                    *name = Some(display_name);
                }
                Shape::Schema { name, .. } => *name = display_name,
                Shape::Array { .. } => {}
            }),
        }
    }

    /// Copy with a different nullability record.
    pub fn opts(&self, nullability: Nullability) -> Self {
        self.derive(|parts| parts.nullability = nullability)
    }

    /// Copy with additional declared slot names.
    pub fn declare<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.derive(|parts| parts.declared.extend(names.into_iter().map(Into::into)))
    }

    /// Copy with additional slot bindings (the template `use` operation).
    ///
    /// # Errors
    ///
    /// [`SchemaError::TemplateArity`] if more bindings would be held than
    /// slots are declared; [`SchemaError::InvalidDescription`] if a
    /// description is malformed.
    pub fn bind<I>(&self, descriptions: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator,
        I::Item: Into<Description>,
    {
        let descriptions: Vec<Description> = descriptions.into_iter().map(Into::into).collect();
        let declared = self.declared_slots().len();
        let bound = self.bound_slots().len();
        if bound + descriptions.len() > declared {
            return Err(SchemaError::TemplateArity {
                declared,
                bound,
                supplied: descriptions.len(),
            });
        }
        let bindings = descriptions
            .iter()
            .map(Description::build)
            .collect::<Result<Vec<_>, _>>()?;
        let entity = self.derive(|parts| parts.bound.extend(bindings));
        tracing::debug!(
            kind = %entity.kind(),
            declared,
            bound = entity.bound_slots().len(),
            "bound template slots"
        );
        Ok(entity)
    }

    pub fn shape(&self) -> &Shape {
        &self.0.parts.shape
    }

    pub fn kind(&self) -> EntityKind {
        match self.shape() {
            Shape::Scalar(_) => EntityKind::Scalar,
            Shape::Array { .. } => EntityKind::Array,
            Shape::Tuple { .. } => EntityKind::Tuple,
            Shape::Either { .. } => EntityKind::Either,
            Shape::Schema { .. } => EntityKind::Schema,
        }
    }

    pub fn nullability(&self) -> Nullability {
        self.0.parts.nullability
    }

    pub fn declared_slots(&self) -> &[String] {
        &self.0.parts.declared
    }

    pub fn bound_slots(&self) -> &[TypeRef] {
        &self.0.parts.bound
    }

    /// Every declared slot has a binding.
    pub fn is_fully_instantiated(&self) -> bool {
        self.bound_slots().len() == self.declared_slots().len()
    }

    /// Slot names this entity expects an enclosing scope to provide.
    pub fn free_slots(&self) -> impl Iterator<Item = &str> {
        self.0.free.iter().map(String::as_str)
    }

    /// The display name of named shapes (scalars, schemas, and named
    /// tuples or unions).
    pub fn display_name(&self) -> Option<&str> {
        match self.shape() {
            Shape::Scalar(scalar) => Some(&scalar.name),
            Shape::Schema { name, .. } => Some(name),
            Shape::Tuple { name, .. } | Shape::Either { name, .. } => name.as_deref(),
            Shape::Array { .. } => None,
        }
    }

    /// Same instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// The label in an empty scope.
    pub fn label(&self, track_property_existence: bool) -> String {
        self.label_in(&Bindings::new(), track_property_existence)
    }

    pub(crate) fn bound_pairs(&self) -> impl Iterator<Item = (&str, &TypeRef)> {
        self.declared_slots()
            .iter()
            .map(String::as_str)
            .zip(self.bound_slots())
    }

    /// An unnamed, strict, non-template union whose members can be spliced
    /// into an enclosing union.
    pub(crate) fn is_spliceable_union(&self) -> bool {
        matches!(self.shape(), Shape::Either { name: None, .. })
            && self.nullability().is_strict()
            && self.declared_slots().is_empty()
    }

    /// Full label (with nullability suffix) as seen from `env`.
    pub(crate) fn label_in(&self, env: &Bindings, track: bool) -> String {
        if self.0.free.is_empty() {
            return self.0.labels[usize::from(track)]
                .get_or_init(|| self.render_label(&Bindings::new(), track))
                .clone();
        }
        self.render_label(env, track)
    }

    /// Label for use inside another composite's label.
    pub(crate) fn nested_label(&self, env: &Bindings, track: bool) -> String {
        let label = self.label_in(env, track);
        if self.is_bare_union(env) || !self.nullability().permitted(track).is_empty() {
            format!("({label})")
        } else {
            label
        }
    }

    /// An unnamed union with more than one member as seen from `env`, whose
    /// label is a bare `|`-joined list.
    pub(crate) fn is_bare_union(&self, env: &Bindings) -> bool {
        self.display_name().is_none()
            && matches!(self.shape(), Shape::Either { .. })
            && self.union_members(&env.enter(self)).len() > 1
    }

    fn render_label(&self, inherited: &Bindings, track: bool) -> String {
        let env = inherited.enter(self);
        let (base, is_union) = self.base_label(&env, track);
        type_label(&base, is_union, self.nullability(), track)
    }

    fn base_label(&self, env: &Bindings, track: bool) -> (String, bool) {
        match self.shape() {
            Shape::Scalar(scalar) => (scalar.name.clone(), false),
            Shape::Schema { name, .. } => (name.clone(), false),
            Shape::Tuple { name: Some(name), .. } | Shape::Either { name: Some(name), .. } => {
                (name.clone(), false)
            }
            Shape::Array { element } => (format!("{}[]", child_label(element, env, track)), false),
            Shape::Tuple { elements, .. } => {
                let labels: Vec<String> = elements
                    .iter()
                    .map(|element| child_label(element, env, track))
                    .collect();
                (format!("[{}]", labels.join(", ")), false)
            }
            Shape::Either { .. } => {
                let labels: Vec<String> = self
                    .union_members(env)
                    .into_iter()
                    .map(|(reference, resolved)| match resolved {
                        Ok((member, scope)) => member.nested_label(&scope, track),
                        Err(_) => reference.fallback_label(env, track),
                    })
                    .collect();
                let is_union = labels.len() > 1;
                (labels.join(UNION_DELIMITER), is_union)
            }
        }
    }

    /// Union members as seen from `env` (this entity's own scope already
    /// entered): slots resolved, anonymous unions spliced, repeats dropped.
    ///
    /// Each member is paired with the reference it came from so that an
    /// unresolvable slot can still be named, and with the scope it resolves
    /// its own references in.
    pub(crate) fn union_members(&self, env: &Bindings) -> Vec<(TypeRef, Resolved)> {
        let mut out = Vec::new();
        if let Shape::Either { members, .. } = self.shape() {
            collect_union_members(members, env, &mut out);
        }
        out
    }
}

/// A resolved union member and its scope.
pub(crate) type Resolved = Result<(TypeEntity, Bindings), SchemaError>;

fn child_label(reference: &TypeRef, env: &Bindings, track: bool) -> String {
    match env.resolve(reference) {
        Ok((entity, scope)) => entity.nested_label(&scope, track),
        Err(_) => reference.fallback_label(env, track),
    }
}

fn push_union_member(members: &mut Vec<TypeRef>, member: TypeRef) {
    if let TypeRef::Entity(entity) = &member {
        if entity.is_spliceable_union() {
            if let Shape::Either { members: inner, .. } = entity.shape() {
                for nested in inner {
                    push_union_member(members, nested.clone());
                }
                return;
            }
        }
    }
    if !members.iter().any(|existing| existing.same(&member)) {
        members.push(member);
    }
}

fn collect_union_members(members: &[TypeRef], env: &Bindings, out: &mut Vec<(TypeRef, Resolved)>) {
    for member in members {
        match env.resolve(member) {
            // Spliceable unions bind nothing, so their members share `scope`.
            Ok((entity, scope)) if entity.is_spliceable_union() => {
                if let Shape::Either { members: inner, .. } = entity.shape() {
                    collect_union_members(inner, &scope, out);
                }
            }
            Ok((entity, scope)) => {
                let repeated = out
                    .iter()
                    .any(|(_, seen)| matches!(seen, Ok((seen, _)) if seen.ptr_eq(&entity)));
                if !repeated {
                    out.push((member.clone(), Ok((entity, scope))));
                }
            }
            Err(e) => out.push((member.clone(), Err(e))),
        }
    }
}

impl fmt::Debug for TypeEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeEntity")
            .field("kind", &self.kind())
            .field("label", &self.label(false))
            .field("nullability", &self.nullability())
            .field("declared", &self.declared_slots())
            .field("bound", &self.bound_slots().len())
            .finish()
    }
}

impl fmt::Display for TypeEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label(false))
    }
}
