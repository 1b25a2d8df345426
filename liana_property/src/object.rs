// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bindable object traits.
//!
//! This module provides the [`BindableObject`] trait for types that carry
//! bindable properties, and [`BindableObjectExt`] for the sanctioned
//! get/set entry points that drive change notification.

use crate::id::{Property, PropertyId};
use crate::registry::PropertyRegistry;
use crate::store::PropertyStore;
use crate::value::{ErasedValue, TypeMismatchError};

/// A type that carries bindable properties.
///
/// Any type can implement this: a model, a view wrapper, a service.
/// There is no base class; the capability is granted by embedding a
/// [`PropertyStore`] and exposing it here. The single hook
/// [`on_property_changed`](Self::on_property_changed) receives the name
/// of each property that actually changed; fan-out to multiple listeners
/// is the implementing type's business.
///
/// # Example
///
/// ```rust
/// use liana_property::{BindableObject, PropertyStore};
///
/// struct Person {
///     store: PropertyStore,
///     dirty: bool,
/// }
///
/// impl BindableObject for Person {
///     fn property_store(&self) -> &PropertyStore {
///         &self.store
///     }
///
///     fn property_store_mut(&mut self) -> &mut PropertyStore {
///         &mut self.store
///     }
///
///     fn on_property_changed(&mut self, name: &'static str) {
///         let _ = name;
///         self.dirty = true;
///     }
/// }
/// ```
pub trait BindableObject {
    /// Returns a reference to the object's property store.
    fn property_store(&self) -> &PropertyStore;

    /// Returns a mutable reference to the object's property store.
    fn property_store_mut(&mut self) -> &mut PropertyStore;

    /// Called with the property name after a value actually changed.
    ///
    /// Fires strictly after the new value is stored, so reading the
    /// property from inside the hook observes the new value. Never fires
    /// for suppressed (equal) writes. The default implementation does
    /// nothing, for model types that don't observe their own changes.
    fn on_property_changed(&mut self, name: &'static str) {
        let _ = name;
    }
}

/// Extension methods for [`BindableObject`].
///
/// These are the sanctioned entry points: they delegate to the
/// [`PropertyStore`] and invoke
/// [`on_property_changed`](BindableObject::on_property_changed) exactly
/// when the store reports a real change.
pub trait BindableObjectExt: BindableObject {
    /// Gets the effective value (stored, else default).
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError`] if the property was declared on a
    /// different owner type or with a different value type.
    fn get_value<T: Clone + PartialEq + 'static>(
        &self,
        property: Property<T>,
        registry: &PropertyRegistry,
    ) -> Result<T, TypeMismatchError> {
        self.property_store().get(property, registry)
    }

    /// Sets the value, notifying on a real change.
    ///
    /// Coercion, the no-op equality gate and storage all happen in the
    /// store; the hook fires afterwards, only when the store reports a
    /// change. Returns whether a change occurred.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError`] if the property was declared on a
    /// different owner type or with a different value type.
    fn set_value<T: Clone + PartialEq + 'static>(
        &mut self,
        property: Property<T>,
        value: T,
        registry: &PropertyRegistry,
    ) -> Result<bool, TypeMismatchError> {
        let changed = self.property_store_mut().set(property, value, registry)?;
        if changed && let Some(name) = registry.name(property.id()) {
            self.on_property_changed(name);
        }
        Ok(changed)
    }

    /// Forces a change notification without a value change.
    ///
    /// The escape hatch for in-place mutation: when a value was mutated
    /// through interior mutability, or an identity-sensitive caller needs
    /// observers re-run, this fires the hook for the property as if it had
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared
    /// on a different owner type.
    ///
    /// # Panics
    ///
    /// Panics if the property is not declared in the registry.
    fn refresh(
        &mut self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<(), TypeMismatchError> {
        let name = self
            .property_store()
            .descriptor_checked(id, registry)?
            .name();
        self.on_property_changed(name);
        Ok(())
    }

    /// Removes the explicit value, notifying when the effective value
    /// changed.
    ///
    /// Returns whether the effective value changed.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared
    /// on a different owner type.
    fn clear_value(
        &mut self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<bool, TypeMismatchError> {
        let changed = self.property_store_mut().clear(id, registry)?;
        if changed && let Some(name) = registry.name(id) {
            self.on_property_changed(name);
        }
        Ok(changed)
    }

    /// Gets the effective value, type-erased.
    ///
    /// The name-based binding path; pair with
    /// [`PropertyRegistry::resolve`].
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError::Owner`] if the property was declared
    /// on a different owner type.
    fn get_value_erased(
        &self,
        id: PropertyId,
        registry: &PropertyRegistry,
    ) -> Result<ErasedValue, TypeMismatchError> {
        self.property_store().get_erased(id, registry)
    }

    /// Sets a type-erased value, notifying on a real change.
    ///
    /// Returns whether a change occurred.
    ///
    /// # Errors
    ///
    /// Returns [`TypeMismatchError`] if the property was declared on a
    /// different owner type or the value's type does not match the
    /// declaration.
    fn set_value_erased(
        &mut self,
        id: PropertyId,
        value: ErasedValue,
        registry: &PropertyRegistry,
    ) -> Result<bool, TypeMismatchError> {
        let changed = self.property_store_mut().set_erased(id, value, registry)?;
        if changed && let Some(name) = registry.name(id) {
            self.on_property_changed(name);
        }
        Ok(changed)
    }

    /// Returns `true` if the property has an explicit value.
    fn has_value(&self, id: PropertyId) -> bool {
        self.property_store().has_value(id)
    }
}

// Blanket implementation for all BindableObject types
impl<T: BindableObject> BindableObjectExt for T {}
