// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Liana Property: Observable bindable properties.
//!
//! This crate provides the foundation for a bindable property system:
//! per-type property declaration, per-instance sparse storage, and change
//! notification. Declaration and storage are deliberately split:
//!
//! - [`PropertyRegistry`] holds one [`PropertyDescriptor`] per declared
//!   property, keyed by `(owner type, name)`. Descriptors carry the default
//!   value (or a lazily evaluated default factory) and optional
//!   coerce/changed callbacks, shared by every instance.
//! - [`PropertyStore`] holds each instance's explicit values in a sparse
//!   sorted vector. Reading an unset property falls back to the registry
//!   default without mutating the store.
//! - [`BindableObject`] + [`BindableObjectExt`] are the instance contract:
//!   `set_value` writes through the store and fires
//!   [`on_property_changed`](BindableObject::on_property_changed) exactly
//!   when a real change occurred, after the value is stored.
//!
//! ### Key Operations
//!
//! - `set_value(property, value, registry)` - coerce, equality-gate, store,
//!   notify
//! - `get_value(property, registry)` - stored value, else the default
//! - `refresh(id, registry)` - force a notification without a value change
//! - `resolve::<Owner>(name)` - name-based lookup for binding layers
//!
//! ## Quick Start
//!
//! ```rust
//! use liana_property::{
//!     BindableObject, BindableObjectExt, PropertyMetadataBuilder, PropertyRegistry,
//!     PropertyStore,
//! };
//!
//! struct Slider {
//!     store: PropertyStore,
//! }
//!
//! impl BindableObject for Slider {
//!     fn property_store(&self) -> &PropertyStore {
//!         &self.store
//!     }
//!
//!     fn property_store_mut(&mut self) -> &mut PropertyStore {
//!         &mut self.store
//!     }
//! }
//!
//! // Declare properties once per type
//! let mut registry = PropertyRegistry::new();
//! let value = registry
//!     .declare::<Slider, f64>(
//!         "Value",
//!         PropertyMetadataBuilder::new(0.0_f64)
//!             .coerce(|v: f64| v.clamp(0.0, 100.0))
//!             .build(),
//!     )
//!     .unwrap();
//!
//! let mut slider = Slider {
//!     store: PropertyStore::for_type::<Slider>(),
//! };
//!
//! // Unset: reads the default without storing it
//! assert_eq!(slider.get_value(value, &registry), Ok(0.0));
//!
//! // First write is a change; an equal write is a complete no-op
//! assert_eq!(slider.set_value(value, 250.0, &registry), Ok(true));
//! assert_eq!(slider.get_value(value, &registry), Ok(100.0)); // coerced
//! assert_eq!(slider.set_value(value, 400.0, &registry), Ok(false));
//! ```
//!
//! ## Memory Optimizations
//!
//! | Optimization | Description |
//! |--------------|-------------|
//! | **Sparse storage** | `PropertyStore` only allocates for explicitly set properties |
//! | **Shared defaults** | Default values live in the registry, not per-instance |
//! | **Inline storage** | `SmallVec` for small property counts |
//! | **`PropertyId` as u16** | Compact property identification |
//!
//! ## `no_std` Support
//!
//! The core is `no_std` and uses `alloc`. The default-on `std` feature adds
//! the [`global`] module hosting the process-wide registry.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
pub mod global;
mod id;
mod metadata;
mod object;
mod registry;
mod store;
mod value;

pub use id::{Property, PropertyId};
pub use metadata::{
    CoerceValueCallback, DefaultValue, PropertyChangedCallback, PropertyMetadata,
    PropertyMetadataBuilder,
};
pub use object::{BindableObject, BindableObjectExt};
pub use registry::{
    DuplicateDeclarationError, PropertyDescriptor, PropertyRegistry, UnknownPropertyError,
};
pub use store::PropertyStore;
pub use value::{ErasedValue, TypeMismatchError};
