//! # Type Descriptions
//!
//! The construction grammar accepted by [`TypeEntity::bind`] and by schema
//! registration:
//!
//! | Form | Builds |
//! |------|--------|
//! | an entity | itself |
//! | `[d]` | `Array(d)` |
//! | `Tuple(d1, .., dn)` | a tuple of `n` elements |
//! | `Either(d1, .., dn)`, `n >= 2` | a union |
//! | a slot name | a placeholder resolved through the enclosing bindings |
//!
//! Descriptions are plain data; [`Description::build`] turns one into a
//! [`TypeRef`].

use crate::entity::{TypeEntity, TypeRef};
use crate::error::SchemaError;

/// A type described in the construction grammar.
#[derive(Debug, Clone)]
pub enum Description {
    Entity(TypeEntity),
    Array(Box<Description>),
    Tuple(Vec<Description>),
    Either(Vec<Description>),
    Slot(String),
}

impl Description {
    pub fn array(element: impl Into<Description>) -> Self {
        Self::Array(Box::new(element.into()))
    }

    pub fn tuple<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Description>,
    {
        Self::Tuple(elements.into_iter().map(Into::into).collect())
    }

    pub fn either<I>(members: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Description>,
    {
        Self::Either(members.into_iter().map(Into::into).collect())
    }

    pub fn slot(name: impl Into<String>) -> Self {
        Self::Slot(name.into())
    }

    /// Build the entity (or slot reference) this description denotes.
    ///
    /// # Errors
    ///
    /// [`SchemaError::InvalidDescription`] for a union of fewer than two
    /// members, at any nesting level.
    pub fn build(&self) -> Result<TypeRef, SchemaError> {
        Ok(match self {
            Self::Entity(entity) => TypeRef::Entity(entity.clone()),
            Self::Slot(name) => TypeRef::slot(name.clone()),
            Self::Array(element) => TypeEntity::array(element.build()?).into(),
            Self::Tuple(elements) => TypeEntity::tuple(build_all(elements)?).into(),
            Self::Either(members) => {
                if members.len() < 2 {
                    return Err(SchemaError::InvalidDescription {
                        reason: format!(
                            "a union needs at least two members, got {}",
                            members.len()
                        ),
                    });
                }
                TypeEntity::either(build_all(members)?).into()
            }
        })
    }
}

fn build_all(descriptions: &[Description]) -> Result<Vec<TypeRef>, SchemaError> {
    descriptions.iter().map(Description::build).collect()
}

impl From<TypeEntity> for Description {
    fn from(entity: TypeEntity) -> Self {
        Self::Entity(entity)
    }
}

impl From<&TypeEntity> for Description {
    fn from(entity: &TypeEntity) -> Self {
        Self::Entity(entity.clone())
    }
}

/// A bare string is a slot name.
impl From<&str> for Description {
    fn from(name: &str) -> Self {
        Self::Slot(name.to_string())
    }
}

/// A one-element array is an array type.
impl<D: Into<Description>> From<[D; 1]> for Description {
    fn from([element]: [D; 1]) -> Self {
        Self::array(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::{int, string};

    fn label(description: impl Into<Description>) -> String {
        match description.into().build().unwrap() {
            TypeRef::Entity(entity) => entity.label(false),
            TypeRef::Slot(slot) => slot.name().to_string(),
        }
    }

    #[test]
    fn test_entity_builds_to_itself() {
        match Description::from(int()).build().unwrap() {
            TypeRef::Entity(entity) => assert!(entity.ptr_eq(&int())),
            other => panic!("expected entity, got {other:?}"),
        }
    }

    #[test]
    fn test_single_element_array_form() {
        assert_eq!(label([int()]), "Int[]");
        assert_eq!(label([[string()]]), "String[][]");
    }

    #[test]
    fn test_tuple_and_either_forms() {
        assert_eq!(label(Description::tuple([int(), string()])), "[Int, String]");
        assert_eq!(label(Description::either([int(), string()])), "Int | String");
    }

    #[test]
    fn test_slot_form() {
        assert_eq!(label("T"), "T");
        assert_eq!(label(Description::array("T")), "T[]");
    }

    #[test]
    fn test_either_with_one_member_is_invalid() {
        let err = Description::either([int()]).build().unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDescription { .. }));
    }

    #[test]
    fn test_invalid_nested_description_propagates() {
        let nested = Description::array(Description::either(Vec::<Description>::new()));
        assert!(nested.build().is_err());
    }
}
