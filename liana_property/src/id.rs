// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identification types.
//!
//! This module provides [`PropertyId`] for runtime property identification and
//! [`Property<T>`] for type-safe compile-time property keys.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime property identifier.
///
/// This is a lightweight handle (u16) that uniquely identifies a declared
/// property within a [`PropertyRegistry`](crate::PropertyRegistry). The u16
/// size allows up to 65,536 declarations while keeping per-instance storage
/// compact.
///
/// # Example
///
/// ```rust
/// use liana_property::PropertyId;
///
/// let id = PropertyId::new(42);
/// assert_eq!(id.index(), 42);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a new property ID from the given index.
    ///
    /// This is typically called by [`PropertyRegistry::declare`](crate::PropertyRegistry::declare)
    /// rather than directly.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this property ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// A type-safe property key with phantom type for compile-time checking.
///
/// This wraps a [`PropertyId`] with a phantom type parameter `T` that
/// represents the property's declared value type. It is handed out by
/// [`PropertyRegistry::declare`](crate::PropertyRegistry::declare) and is the
/// key used by the typed get/set entry points.
///
/// # Type Safety
///
/// The phantom type ensures that you can only get/set values of the correct
/// type:
///
/// ```rust
/// use liana_property::{Property, PropertyMetadataBuilder, PropertyRegistry};
///
/// struct Person;
///
/// let mut registry = PropertyRegistry::new();
///
/// let first_name: Property<String> = registry
///     .declare::<Person, String>("FirstName", PropertyMetadataBuilder::new(String::new()).build())
///     .unwrap();
///
/// // The type is inferred/checked at compile time
/// // store.set(first_name, 42.0, &registry); // Would not compile!
/// ```
///
/// # Memory Layout
///
/// `Property<T>` is the same size as `PropertyId` (2 bytes) since
/// `PhantomData` has zero size.
pub struct Property<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Property<T> {
    /// Creates a new typed property from a property ID.
    ///
    /// This is typically called by [`PropertyRegistry::declare`](crate::PropertyRegistry::declare)
    /// rather than directly.
    ///
    /// # Safety Note
    ///
    /// The caller must ensure that the `PropertyId` was declared with the same
    /// value type `T`. Mismatched types are caught at runtime with
    /// [`TypeMismatchError`](crate::TypeMismatchError).
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

// Manual trait implementations to avoid requiring T: Clone, etc.

impl<T> Copy for Property<T> {}

impl<T> Clone for Property<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Property<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Property<T> {}

impl<T> Hash for Property<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}
