//! # Dependency Resolution
//!
//! Templates declare named slots (`declare`) and receive entities for them
//! positionally (`bind`). During validation each entity boundary pushes
//! a frame holding that entity's `slot -> binding` pairs on top of the
//! bindings inherited from the enclosing composite; lookups walk the frames
//! innermost first, so an entity's own bindings shadow outer ones.
//!
//! ```text
//! Pair<T>                      declare T
//!   └─ Box<U>.bind(T)          declare U, U -> T
//!        └─ field: U           U -> T -> Int
//! ```
//!
//! A binding was written in the scope the entity appears in, so it is
//! resolved there: whatever a frame binds is looked up from the frame's
//! parent, never from the frame itself. `Box<T>.bind(T[])` inside
//! `Pair<T>` therefore means `Pair`'s `T`, and every chain moves strictly
//! outward until it reaches an entity or runs out of frames, which is an
//! [`SchemaError::UnboundDependency`].

use std::sync::Arc;

use crate::entity::{TypeEntity, TypeRef};
use crate::error::SchemaError;

/// Scoped `slot -> binding` map. Cloning is cheap: frames are shared.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    frame: Option<Arc<Frame>>,
}

#[derive(Debug)]
struct Frame {
    slots: Vec<(String, TypeRef)>,
    parent: Option<Arc<Frame>>,
}

impl Bindings {
    /// An empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// The binding for `name`, innermost frame first, together with the
    /// scope that binding was written in.
    pub fn lookup(&self, name: &str) -> Option<(&TypeRef, Bindings)> {
        let mut frame = self.frame.as_ref();
        while let Some(f) = frame {
            if let Some((_, binding)) = f.slots.iter().find(|(slot, _)| slot == name) {
                let defining = Bindings {
                    frame: f.parent.clone(),
                };
                return Some((binding, defining));
            }
            frame = f.parent.as_ref();
        }
        None
    }

    /// The scope inside `entity`: its own bound slots over this scope.
    pub fn enter(&self, entity: &TypeEntity) -> Self {
        let slots: Vec<(String, TypeRef)> = entity
            .bound_pairs()
            .map(|(name, binding)| (name.to_string(), binding.clone()))
            .collect();
        if slots.is_empty() {
            return self.clone();
        }
        Self {
            frame: Some(Arc::new(Frame {
                slots,
                parent: self.frame.clone(),
            })),
        }
    }

    /// Resolve a child reference to a concrete entity and the scope that
    /// entity's own references resolve in.
    ///
    /// A concrete reference stays in this scope. A slot resolves in the
    /// scope its binding was written in. A nullability override carried by
    /// the reference (or by a slot along the chain) is applied to the
    /// resolved entity; the outermost override wins.
    pub fn resolve(&self, reference: &TypeRef) -> Result<(TypeEntity, Bindings), SchemaError> {
        let mut slot = match reference {
            TypeRef::Entity(entity) => return Ok((entity.clone(), self.clone())),
            TypeRef::Slot(slot) => slot.clone(),
        };
        let mut nullability = slot.nullability();
        let mut scope = self.clone();
        loop {
            let Some((binding, defining)) = scope.lookup(slot.name()) else {
                return Err(SchemaError::UnboundDependency {
                    slot: slot.name().to_string(),
                });
            };
            let next = match binding {
                TypeRef::Entity(entity) => {
                    let entity = match nullability {
                        Some(n) => entity.opts(n),
                        None => entity.clone(),
                    };
                    return Ok((entity, defining));
                }
                TypeRef::Slot(next) => next.clone(),
            };
            nullability = nullability.or(next.nullability());
            slot = next;
            scope = defining;
        }
    }
}
