// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance sparse property storage.
//!
//! This module provides [`PropertyStore`] for storing explicit property
//! values on instances, using sparse storage to minimize memory for
//! instances with few properties set.
//!
//! # Implementation
//!
//! Following the `WinUI` approach, we use a sorted vector with binary search
//! rather than a hash map. This provides:
//!
//! - Better cache locality (contiguous memory)
//! - Lower memory overhead (no hash buckets)
//! - O(log n) lookup, which is fast for typical property counts (5-20)
//! - Inline storage for small property sets via `SmallVec`
//!
//! # Scope
//!
//! `PropertyStore` handles storage and change detection only. The
//! notification hook fires at the [`BindableObjectExt`](crate::BindableObjectExt)
//! layer, which wraps the store's mutators.

use smallvec::SmallVec;

use crate::id::{Property, PropertyId};
use crate::metadata::PropertyMetadata;
use crate::registry::{PropertyDescriptor, PropertyRegistry};
use crate::value::{ErasedValue, TypeMismatchError};

/// Default inline capacity for property entries.
///
/// Most instances have fewer than 8 non-default properties set,
/// so this avoids heap allocation in the common case.
const INLINE_CAPACITY: usize = 8;

/// Per-instance sparse storage for property values.
///
/// A store records only explicit values; reads of unset properties fall
/// back to the registry default without mutating the store, so reads
/// before the first write are idempotent. Each store is tagged with the
/// owner type it was created for, and every access checks the property's
/// declared owner against that tag.
///
/// # Storage Strategy
///
/// Uses a sorted `SmallVec` with binary search, following the `WinUI`
/// `vector_map` approach. This provides O(log n) lookup with excellent
/// cache locality. The first 8 properties are stored inline without heap
/// allocation.
///
/// # Change detection
///
/// [`set`](Self::set) compares the incoming value against the current
/// effective value by value equality and reports whether a real change
/// occurred. Callers use that report to drive notification; equal writes
/// are complete no-ops.
///
/// # Example
///
/// ```rust
/// use liana_property::{PropertyMetadataBuilder, PropertyRegistry, PropertyStore};
///
/// struct Person;
///
/// let mut registry = PropertyRegistry::new();
/// let age = registry
///     .declare::<Person, i32>("Age", PropertyMetadataBuilder::new(0_i32).build())
///     .unwrap();
///
/// let mut store = PropertyStore::for_type::<Person>();
///
/// // No value set - reads the default, stores nothing.
/// assert_eq!(store.get(age, &registry), Ok(0));
/// assert!(store.is_empty());
///
/// // First write is a change; writing the same value again is not.
/// assert_eq!(store.set(age, 30, &registry), Ok(true));
/// assert_eq!(store.set(age, 30, &registry), Ok(false));
/// assert_eq!(store.get(age, &registry), Ok(30));
/// ```
#[derive(Clone, Debug)]
pub struct PropertyStore {
    /// Explicit values, sorted by [`PropertyId`] for binary search lookup.
    entries: SmallVec<[(PropertyId, ErasedValue); INLINE_CAPACITY]>,
    owner: core::any::TypeId,
    owner_name: &'static str,
}

impl PropertyStore {
    /// Creates a new property store for instances of owner type `O`.
    #[must_use]
    pub fn for_type<O: 'static>() -> Self {
        Self {
            entries: SmallVec::new(),
            owner: core::any::TypeId::of::<O>(),
            owner_name: core::any::type_name::<O>(),
        }
    }

    /// Returns the [`TypeId`](core::any::TypeId) of the owner type this
    /// store was created for.
    #[must_use]
    #[inline]
    pub fn owner(&self) -> core::any::TypeId {
        self.owner
    }

    /// Returns the owner type's name, for diagnostics.
    #[must_use]
    #[inline]
    pub fn owner_name(&self) -> &'static str {
        self.owner_name
    }

    /// Returns `true` if no properties have explicit values set.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of properties with explicit values.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the property IDs that have explicit values set, in
    /// ascending order.
    pub fn property_ids(&self) -> impl Iterator<Item = PropertyId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Binary search for an entry by property ID.
    #[inline]
    fn find_entry(&self, id: PropertyId) -> Result<usize, usize> {
        self.entries.binary_search_by_key(&id, |(pid, _)| *pid)
    }

    /// Looks up the descriptor and checks it against this store's owner.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    pub(crate) fn descriptor_checked<'r>(
        &self,
        id: PropertyId,
        registry: &'r PropertyRegistry,
    ) -> Result<&'r PropertyDescriptor, TypeMismatchError> {
        let Some(descriptor) = registry.descriptor(id) else {
            panic!("Property {id:?} not found in registry");
        };
        if descriptor.owner() != self.owner {
            return Err(TypeMismatchError::Owner {
                property: descriptor.name(),
                expected: descriptor.owner_name(),
                found: self.owner_name,
            });
        }
        Ok(descriptor)
    }

    /// Checks owner and value type for a typed key, returning the metadata.
    fn metadata_checked<'r, T: Clone + PartialEq + 'static>(
        &self,
        property: Property<T>,
        registry: &'r PropertyRegistry,
    ) -> Result<&'r PropertyMetadata<T>, TypeMismatchError> {
        let descriptor = self.descriptor_checked(property.id(), registry)?;
        descriptor.typed::<T>()?;
        match registry.get_metadata(property) {
            Some(metadata) => Ok(metadata),
            None => unreachable!("value type checked against the declaration"),
        }
    }

    /// Gets the effective value: the stored value if set, else the
    /// registry default.
    ///
    /// Defaults are produced on each call (cloned, or evaluated for
    /// factory defaults) and are **not** written back, so reads of unset
    /// properties never mutate the store.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared on
    /// a different owner type, or [`TypeMismatchError::Value`] if `T` is
    /// not the declared value type.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    pub fn get<T: Clone + PartialEq + 'static>(
        &self,
        property: Property<T>,
        registry: &PropertyRegistry,
    ) -> Result<T, TypeMismatchError> {
        let metadata = self.metadata_checked(property, registry)?;
        if let Ok(idx) = self.find_entry(property.id())
            && let Some(value) = self.entries[idx].1.downcast_ref::<T>()
        {
            return Ok(value.clone());
        }
        Ok(metadata.default_value())
    }

    /// Sets the value, reporting whether a real change occurred.
    ///
    /// The value is first run through the property's coerce callback (if
    /// any), then compared against the current effective value. An equal
    /// write stores nothing and returns `Ok(false)`; this includes writing
    /// the default value while the property is unset. A real change is
    /// stored, the property's changed callback (if any) fires with the old
    /// explicit value and the stored value, and `Ok(true)` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared on
    /// a different owner type, or [`TypeMismatchError::Value`] if `T` is
    /// not the declared value type.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    pub fn set<T: Clone + PartialEq + 'static>(
        &mut self,
        property: Property<T>,
        value: T,
        registry: &PropertyRegistry,
    ) -> Result<bool, TypeMismatchError> {
        let metadata = self.metadata_checked(property, registry)?;
        let id = property.id();

        let value = metadata.coerce(value);

        // Compare against the effective value so a write equal to the
        // default, while unset, is a no-op too.
        let entry = self.find_entry(id);
        match entry {
            Ok(idx) => {
                if self.entries[idx].1.downcast_ref::<T>() == Some(&value) {
                    return Ok(false);
                }
            }
            Err(_) => {
                if metadata.default_value() == value {
                    return Ok(false);
                }
            }
        }

        // Only clone the old value if a callback will observe it.
        let old_value = if metadata.has_changed_callback() {
            self.stored(property).cloned()
        } else {
            None
        };

        match entry {
            Ok(idx) => self.entries[idx].1 = ErasedValue::new(value),
            Err(idx) => self.entries.insert(idx, (id, ErasedValue::new(value))),
        }

        // Read back after the write so the callback observes stored state.
        if let Some(stored) = self.stored(property) {
            metadata.on_changed(old_value.as_ref(), stored);
        }
        Ok(true)
    }

    /// Gets the stored (explicit) value, if set.
    ///
    /// Unlike [`get`](Self::get), this never falls back to the default.
    #[must_use]
    #[inline]
    pub fn stored<T: Clone + 'static>(&self, property: Property<T>) -> Option<&T> {
        self.find_entry(property.id())
            .ok()
            .and_then(|idx| self.entries[idx].1.downcast_ref())
    }

    /// Returns `true` if the property has an explicit value.
    #[must_use]
    #[inline]
    pub fn has_value(&self, id: PropertyId) -> bool {
        self.find_entry(id).is_ok()
    }

    /// Removes the explicit value, restoring the default.
    ///
    /// Returns `Ok(true)` only when an explicit value was removed *and* it
    /// differed from the default, i.e. when the effective value changed.
    /// Clearing an unset property, or one whose stored value equals the
    /// default, returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared on
    /// a different owner type.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    pub fn clear(
        &mut self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<bool, TypeMismatchError> {
        let descriptor = self.descriptor_checked(id, registry)?;
        let Ok(idx) = self.find_entry(id) else {
            return Ok(false);
        };
        let removed = self.entries.remove(idx).1;

        let default = descriptor.default_value();
        if removed.value_eq(&default) {
            return Ok(false);
        }
        descriptor
            .metadata_erased()
            .notify_erased(Some(&removed), &default);
        Ok(true)
    }

    /// Gets the effective value, type-erased.
    ///
    /// This is the name-based binding path: the caller holds only a
    /// [`PropertyId`] (typically from
    /// [`PropertyRegistry::resolve`]) and receives a clone of the stored
    /// value, or the descriptor's default if unset.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared on
    /// a different owner type.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    pub fn get_erased(
        &self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<ErasedValue, TypeMismatchError> {
        let descriptor = self.descriptor_checked(id, registry)?;
        if let Ok(idx) = self.find_entry(id) {
            return Ok(self.entries[idx].1.clone());
        }
        Ok(descriptor.default_value())
    }

    /// Sets a type-erased value, reporting whether a real change occurred.
    ///
    /// The erased counterpart of [`set`](Self::set): the value's runtime
    /// type is checked against the declaration, coercion and the no-op
    /// equality gate apply identically.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared on
    /// a different owner type, or [`TypeMismatchError::Value`] if the
    /// value's type is not the declared value type.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    pub fn set_erased(
        &mut self,
        id: PropertyId,
        value: ErasedValue,
        registry: &PropertyRegistry,
    ) -> Result<bool, TypeMismatchError> {
        let descriptor = self.descriptor_checked(id, registry)?;
        if value.type_id() != descriptor.value_type() {
            return Err(TypeMismatchError::Value {
                property: descriptor.name(),
                expected: descriptor.value_type_name(),
                found: value.type_name(),
            });
        }
        let metadata = descriptor.metadata_erased();

        let value = metadata.coerce_erased(value);

        let entry = self.find_entry(id);
        match entry {
            Ok(idx) => {
                if self.entries[idx].1.value_eq(&value) {
                    return Ok(false);
                }
            }
            Err(_) => {
                if metadata.default_erased().value_eq(&value) {
                    return Ok(false);
                }
            }
        }

        let old_value = if metadata.has_changed_callback() {
            entry.ok().map(|idx| self.entries[idx].1.clone())
        } else {
            None
        };

        match entry {
            Ok(idx) => self.entries[idx].1 = value,
            Err(idx) => self.entries.insert(idx, (id, value)),
        }

        if let Ok(idx) = self.find_entry(id) {
            metadata.notify_erased(old_value.as_ref(), &self.entries[idx].1);
        }
        Ok(true)
    }
}
