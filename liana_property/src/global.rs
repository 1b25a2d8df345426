// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The process-wide property registry.
//!
//! Declarations are process-wide: a property declared once, at
//! type-initialization time, is visible to every store and binding layer
//! for the remainder of the process. This module hosts that shared
//! [`PropertyRegistry`] behind a [`RwLock`], created on first use.
//!
//! Locking is coarse but cheap: declaration happens once per property, and
//! the caller builds the metadata (including any default factory) *before*
//! calling in, so the write lock is held only for the insert itself.
//! First use of unrelated owner types is never serialized behind another
//! type's default-factory evaluation.
//!
//! Stores remain single-owner; concurrent access to an instance is its
//! owner's responsibility.

use std::sync::{OnceLock, PoisonError, RwLock};

use crate::id::{Property, PropertyId};
use crate::metadata::PropertyMetadata;
use crate::registry::{DuplicateDeclarationError, PropertyRegistry, UnknownPropertyError};

fn registry() -> &'static RwLock<PropertyRegistry> {
    static REGISTRY: OnceLock<RwLock<PropertyRegistry>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(PropertyRegistry::new()))
}

/// Declares a property on the process-wide registry.
///
/// Under concurrent duplicate declaration, exactly one descriptor is
/// installed; the loser receives [`DuplicateDeclarationError`]. Callers
/// typically declare from a `OnceLock`/`LazyLock` initializer so each
/// property is declared exactly once.
///
/// # Errors
///
/// Returns [`DuplicateDeclarationError`] if `(O, name)` is already
/// declared.
///
/// # Example
///
/// ```rust
/// use liana_property::{global, Property, PropertyMetadataBuilder};
/// use std::sync::OnceLock;
///
/// struct Slider;
///
/// fn maximum() -> Property<f64> {
///     static MAXIMUM: OnceLock<Property<f64>> = OnceLock::new();
///     *MAXIMUM.get_or_init(|| {
///         global::declare::<Slider, f64>(
///             "Maximum",
///             PropertyMetadataBuilder::new(100.0_f64).build(),
///         )
///         .unwrap()
///     })
/// }
///
/// assert_eq!(maximum(), maximum());
/// ```
pub fn declare<O: 'static, T: Clone + PartialEq + Send + Sync + 'static>(
    name: &'static str,
    metadata: PropertyMetadata<T>,
) -> Result<Property<T>, DuplicateDeclarationError> {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .declare::<O, T>(name, metadata)
}

/// Resolves a property on the process-wide registry by owner type and name.
///
/// Returns the [`PropertyId`]; use [`read`] or
/// [`crate::PropertyDescriptor::typed`] via `read` for richer descriptor
/// access.
///
/// # Errors
///
/// Returns [`UnknownPropertyError`] if no property with this name was
/// declared on `O`.
pub fn resolve<O: 'static>(name: &str) -> Result<PropertyId, UnknownPropertyError> {
    registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve::<O>(name)
        .map(crate::PropertyDescriptor::id)
}

/// Runs `f` with the process-wide registry under the read lock.
///
/// This is the access path for store operations, which take
/// `&PropertyRegistry`:
///
/// ```rust
/// use liana_property::{global, PropertyMetadataBuilder, PropertyStore};
///
/// struct Counter;
///
/// let count = global::declare::<Counter, u32>(
///     "Count",
///     PropertyMetadataBuilder::new(0_u32).build(),
/// )
/// .unwrap();
///
/// let mut store = PropertyStore::for_type::<Counter>();
/// global::read(|registry| store.set(count, 3, registry)).unwrap();
/// assert_eq!(global::read(|registry| store.get(count, registry)), Ok(3));
/// ```
pub fn read<R>(f: impl FnOnce(&PropertyRegistry) -> R) -> R {
    f(&registry().read().unwrap_or_else(PoisonError::into_inner))
}
