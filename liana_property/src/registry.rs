// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property declaration and resolution.
//!
//! This module provides [`PropertyRegistry`], the per-owner-type catalog of
//! declared properties, and [`PropertyDescriptor`], the immutable record
//! identifying one declaration.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;
use hashbrown::HashMap;

use crate::id::{Property, PropertyId};
use crate::metadata::PropertyMetadata;
use crate::value::{ErasedValue, TypeMismatchError};

/// A property was declared twice for the same `(owner type, name)` pair.
///
/// This is always a programming defect: declaration is meant to happen
/// exactly once per property per process, at type-initialization time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateDeclarationError {
    /// The owner type the property was declared on.
    pub owner: &'static str,
    /// The property name.
    pub name: &'static str,
}

impl fmt::Display for DuplicateDeclarationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "property '{}' is already declared on {}",
            self.name, self.owner
        )
    }
}

impl core::error::Error for DuplicateDeclarationError {}

/// A name-based lookup referenced a property that was never declared.
///
/// Typically a typo in a markup/binding path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPropertyError {
    /// The owner type the lookup was made against.
    pub owner: &'static str,
    /// The name that failed to resolve.
    pub name: String,
}

impl fmt::Display for UnknownPropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no property '{}' is declared on {}",
            self.name, self.owner
        )
    }
}

impl core::error::Error for UnknownPropertyError {}

/// The immutable record identifying one declared property.
///
/// A descriptor is created once by [`PropertyRegistry::declare`], owned by
/// the registry for the remainder of the process, and referenced by every
/// instance's store through its [`PropertyId`]. Identity is the
/// `(owner type, name)` pair: two descriptors with the same name on
/// unrelated owner types are distinct.
pub struct PropertyDescriptor {
    id: PropertyId,
    name: &'static str,
    owner: TypeId,
    owner_name: &'static str,
    value_type: TypeId,
    value_type_name: &'static str,
    metadata: Box<dyn ErasedMetadata>,
}

impl PropertyDescriptor {
    /// Returns this descriptor's property ID.
    #[must_use]
    #[inline]
    pub fn id(&self) -> PropertyId {
        self.id
    }

    /// Returns the property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the [`TypeId`] of the owner type this property was declared on.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> TypeId {
        self.owner
    }

    /// Returns the owner type's name, for diagnostics.
    #[must_use]
    #[inline]
    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    /// Returns the [`TypeId`] of the property's declared value type.
    #[must_use]
    #[inline]
    pub fn value_type(&self) -> TypeId {
        self.value_type
    }

    /// Returns the declared value type's name, for diagnostics.
    #[must_use]
    #[inline]
    pub fn value_type_name(&self) -> &'static str {
        self.value_type_name
    }

    /// Produces the property's default value, type-erased.
    ///
    /// Factory defaults are evaluated on each call; the result is a fresh
    /// value, never shared storage.
    #[must_use]
    pub fn default_value(&self) -> ErasedValue {
        self.metadata.default_erased()
    }

    /// Recovers the typed key for this descriptor.
    ///
    /// This is how a name-based binding layer gets back to the typed API
    /// after [`PropertyRegistry::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Value`] if `T` is not the declared value
    /// type.
    pub fn typed<T: 'static>(&self) -> Result<Property<T>, TypeMismatchError> {
        if TypeId::of::<T>() == self.value_type {
            Ok(Property::from_id(self.id))
        } else {
            Err(TypeMismatchError::Value {
                property: self.name,
                expected: self.value_type_name,
                found: core::any::type_name::<T>(),
            })
        }
    }

    pub(crate) fn metadata_erased(&self) -> &dyn ErasedMetadata {
        &*self.metadata
    }
}

impl fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("owner", &self.owner_name)
            .field("value_type", &self.value_type_name)
            .finish_non_exhaustive()
    }
}

/// The catalog of declared properties, keyed by `(owner type, name)`.
///
/// Properties are declared once, at type-initialization time, and the
/// registry provides lookup by typed key or by name for the remainder of
/// the process. With the `std` feature, [`crate::global`] hosts one
/// process-wide registry; registries can also be owned and passed around
/// explicitly, which the tests here do.
///
/// # Example
///
/// ```rust
/// use liana_property::{PropertyMetadataBuilder, PropertyRegistry};
///
/// struct Person;
///
/// let mut registry = PropertyRegistry::new();
///
/// let first_name = registry
///     .declare::<Person, String>("FirstName", PropertyMetadataBuilder::new(String::new()).build())
///     .unwrap();
///
/// let descriptor = registry.resolve::<Person>("FirstName").unwrap();
/// assert_eq!(descriptor.id(), first_name.id());
/// assert!(registry.resolve::<Person>("MiddleName").is_err());
/// ```
#[derive(Default)]
pub struct PropertyRegistry {
    properties: Vec<PropertyDescriptor>,
    by_owner: HashMap<TypeId, HashMap<&'static str, PropertyId>>,
}

impl PropertyRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a new property on owner type `O` with the given name and
    /// metadata.
    ///
    /// Returns a type-safe [`Property<T>`] key for accessing the property.
    /// The same name may be declared on unrelated owner types; each
    /// declaration gets its own descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateDeclarationError`] if `(O, name)` is already
    /// declared. Duplicate declaration is a programming defect; callers are
    /// expected to treat this as fatal at initialization.
    ///
    /// # Panics
    ///
    /// Panics if more than 65,536 properties are declared.
    pub fn declare<O: 'static, T: Clone + PartialEq + Send + Sync + 'static>(
        &mut self,
        name: &'static str,
        metadata: PropertyMetadata<T>,
    ) -> Result<Property<T>, DuplicateDeclarationError> {
        let owner = TypeId::of::<O>();
        let names = self.by_owner.entry(owner).or_default();
        if names.contains_key(name) {
            return Err(DuplicateDeclarationError {
                owner: core::any::type_name::<O>(),
                name,
            });
        }
        assert!(
            self.properties.len() <= u16::MAX as usize,
            "Too many properties declared (max 65,536)"
        );

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = PropertyId::new(self.properties.len() as u16);

        names.insert(name, id);
        self.properties.push(PropertyDescriptor {
            id,
            name,
            owner,
            owner_name: core::any::type_name::<O>(),
            value_type: TypeId::of::<T>(),
            value_type_name: core::any::type_name::<T>(),
            metadata: Box::new(metadata),
        });

        Ok(Property::from_id(id))
    }

    /// Resolves a property by owner type and name.
    ///
    /// This is the entry point for markup/binding layers that address
    /// properties as `"Owner.PropertyName"` paths rather than holding the
    /// typed key.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPropertyError`] if no property with this name was
    /// declared on `O`.
    pub fn resolve<O: 'static>(
        &self,
        name: &str,
    ) -> Result<&PropertyDescriptor, UnknownPropertyError> {
        self.by_owner
            .get(&TypeId::of::<O>())
            .and_then(|names| names.get(name))
            .map(|id| &self.properties[id.index() as usize])
            .ok_or_else(|| UnknownPropertyError {
                owner: core::any::type_name::<O>(),
                name: String::from(name),
            })
    }

    /// Returns the number of declared properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns `true` if no properties are declared.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Returns the descriptor for a property ID.
    #[must_use]
    pub fn descriptor(&self, id: PropertyId) -> Option<&PropertyDescriptor> {
        self.properties.get(id.index() as usize)
    }

    /// Returns the name of a property.
    #[must_use]
    pub fn name(&self, id: PropertyId) -> Option<&'static str> {
        self.properties.get(id.index() as usize).map(|d| d.name)
    }

    /// Returns the metadata for a typed property.
    ///
    /// Returns `None` if the property is not declared or the value type
    /// doesn't match.
    #[must_use]
    pub fn get_metadata<T: Clone + PartialEq + 'static>(
        &self,
        property: Property<T>,
    ) -> Option<&PropertyMetadata<T>> {
        self.properties
            .get(property.id().index() as usize)
            .and_then(|d| d.metadata.downcast_ref())
    }

    /// Returns an iterator over all declared properties.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyDescriptor> {
        self.properties.iter()
    }
}

impl fmt::Debug for PropertyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        struct Qualified<'a>(&'a PropertyDescriptor);
        impl fmt::Debug for Qualified<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}.{}", self.0.owner_name, self.0.name)
            }
        }

        f.debug_struct("PropertyRegistry")
            .field("count", &self.properties.len())
            .field(
                "properties",
                &self.properties.iter().map(Qualified).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Type-erased metadata trait for heterogeneous storage.
///
/// `Send + Sync` is required so registries can back the process-wide
/// catalog in [`crate::global`].
pub(crate) trait ErasedMetadata: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn default_erased(&self) -> ErasedValue;
    fn coerce_erased(&self, value: ErasedValue) -> ErasedValue;
    fn notify_erased(&self, old: Option<&ErasedValue>, new: &ErasedValue);
    fn has_changed_callback(&self) -> bool;
}

impl<T: Clone + PartialEq + Send + Sync + 'static> ErasedMetadata for PropertyMetadata<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn default_erased(&self) -> ErasedValue {
        ErasedValue::new(self.default_value())
    }

    fn coerce_erased(&self, value: ErasedValue) -> ErasedValue {
        // The caller has already checked the value type against the
        // declaration.
        match value.downcast_ref::<T>() {
            Some(v) => ErasedValue::new(self.coerce(v.clone())),
            None => value,
        }
    }

    fn notify_erased(&self, old: Option<&ErasedValue>, new: &ErasedValue) {
        if let Some(new) = new.downcast_ref::<T>() {
            self.on_changed(old.and_then(ErasedValue::downcast_ref), new);
        }
    }

    fn has_changed_callback(&self) -> bool {
        Self::has_changed_callback(self)
    }
}

impl dyn ErasedMetadata {
    fn downcast_ref<T: Clone + PartialEq + 'static>(&self) -> Option<&PropertyMetadata<T>> {
        self.as_any().downcast_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::PropertyMetadataBuilder;
    use alloc::format;
    use alloc::string::ToString;

    struct Person;
    struct Address;

    #[test]
    fn registry_new() {
        let registry = PropertyRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_declare() {
        let mut registry = PropertyRegistry::new();

        let first_name = registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
        assert_eq!(first_name.id().index(), 0);
    }

    #[test]
    fn registry_duplicate_declaration() {
        let mut registry = PropertyRegistry::new();

        registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        let err = registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap_err();

        assert_eq!(err.name, "FirstName");
        assert!(err.owner.contains("Person"));
        assert!(format!("{err}").contains("already declared"));
        // The first declaration survives untouched.
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_same_name_different_owners() {
        let mut registry = PropertyRegistry::new();

        let on_person = registry
            .declare::<Person, String>("Name", PropertyMetadataBuilder::new(String::new()).build())
            .unwrap();
        let on_address = registry
            .declare::<Address, String>("Name", PropertyMetadataBuilder::new(String::new()).build())
            .unwrap();

        // Distinct descriptors for the same name on unrelated owners.
        assert_ne!(on_person.id(), on_address.id());
        assert_ne!(
            registry.resolve::<Person>("Name").unwrap().id(),
            registry.resolve::<Address>("Name").unwrap().id()
        );
    }

    #[test]
    fn registry_resolve() {
        let mut registry = PropertyRegistry::new();
        let first_name = registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        let descriptor = registry.resolve::<Person>("FirstName").unwrap();
        assert_eq!(descriptor.id(), first_name.id());
        assert_eq!(descriptor.name(), "FirstName");
        assert!(descriptor.owner_name().contains("Person"));
    }

    #[test]
    fn registry_resolve_unknown() {
        let mut registry = PropertyRegistry::new();
        registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        let err = registry.resolve::<Person>("MiddleName").unwrap_err();
        assert_eq!(err.name, "MiddleName");
        assert!(format!("{err}").contains("MiddleName"));

        // Declared name on the wrong owner also fails.
        assert!(registry.resolve::<Address>("FirstName").is_err());
    }

    #[test]
    fn registry_resolve_runtime_name() {
        let mut registry = PropertyRegistry::new();
        registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        // Lookup works with a non-'static name, as a binding layer would use.
        let name = "First".to_string() + "Name";
        assert!(registry.resolve::<Person>(&name).is_ok());
    }

    #[test]
    fn descriptor_typed() {
        let mut registry = PropertyRegistry::new();
        registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        let descriptor = registry.resolve::<Person>("FirstName").unwrap();
        assert!(descriptor.typed::<String>().is_ok());

        let err = descriptor.typed::<i32>().unwrap_err();
        assert!(matches!(err, TypeMismatchError::Value { .. }));
    }

    #[test]
    fn descriptor_default_value() {
        let mut registry = PropertyRegistry::new();
        registry
            .declare::<Person, i32>("Age", PropertyMetadataBuilder::new(7_i32).build())
            .unwrap();

        let descriptor = registry.resolve::<Person>("Age").unwrap();
        let default = descriptor.default_value();
        assert_eq!(default.downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn registry_name_and_descriptor() {
        let mut registry = PropertyRegistry::new();
        let age = registry
            .declare::<Person, i32>("Age", PropertyMetadataBuilder::new(0_i32).build())
            .unwrap();

        assert_eq!(registry.name(age.id()), Some("Age"));
        assert_eq!(registry.name(PropertyId::new(999)), None);
        assert!(registry.descriptor(age.id()).is_some());
        assert!(registry.descriptor(PropertyId::new(999)).is_none());
    }

    #[test]
    fn registry_get_metadata() {
        let mut registry = PropertyRegistry::new();
        let age = registry
            .declare::<Person, i32>(
                "Age",
                PropertyMetadataBuilder::new(7_i32).coerce(|v: i32| v.max(0)).build(),
            )
            .unwrap();

        let metadata = registry.get_metadata(age).unwrap();
        assert_eq!(metadata.default_value(), 7);
        assert!(metadata.has_coerce_callback());

        // Wrong value type finds nothing.
        let forged: Property<f64> = Property::from_id(age.id());
        assert!(registry.get_metadata(forged).is_none());
    }

    #[test]
    fn registry_iter() {
        let mut registry = PropertyRegistry::new();
        registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();
        registry
            .declare::<Person, String>(
                "LastName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        let names: Vec<_> = registry.iter().map(PropertyDescriptor::name).collect();
        assert_eq!(names, ["FirstName", "LastName"]);
    }

    #[test]
    fn registry_debug() {
        let mut registry = PropertyRegistry::new();
        registry
            .declare::<Person, String>(
                "FirstName",
                PropertyMetadataBuilder::new(String::new()).build(),
            )
            .unwrap();

        let debug = format!("{:?}", registry);
        assert!(debug.contains("PropertyRegistry"));
        assert!(debug.contains("FirstName"));
    }
}
