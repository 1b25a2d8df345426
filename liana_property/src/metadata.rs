// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property metadata definitions.
//!
//! This module provides [`PropertyMetadata`] for storing a declared
//! property's configuration (default value, optional callbacks) and
//! [`PropertyMetadataBuilder`] for ergonomic construction.

use alloc::boxed::Box;
use core::fmt;

/// Callback invoked when a property value changes.
///
/// The callback receives the old effective value (if an explicit value was
/// stored) and the new value. It fires after the new value is stored.
pub type PropertyChangedCallback<T> = Box<dyn Fn(Option<&T>, &T) + Send + Sync>;

/// Callback for coercing a property value before it's stored.
///
/// This can be used to clamp values, normalize casing, etc. The callback
/// receives the proposed value and returns the coerced value. Coercion runs
/// before the no-op equality check, so a write coerced onto the current
/// value does not notify.
pub type CoerceValueCallback<T> = Box<dyn Fn(T) -> T + Send + Sync>;

/// The default value of a declared property.
///
/// A default is either a fixed value, cloned on each defaulted read, or a
/// factory evaluated lazily per read. Factories support construction-time
/// defaults ("now", fresh collections) without ever sharing one mutable
/// value across instances.
pub enum DefaultValue<T> {
    /// A fixed default, cloned per read.
    Fixed(T),
    /// A factory evaluated on each defaulted read.
    Factory(Box<dyn Fn() -> T + Send + Sync>),
}

impl<T: Clone> DefaultValue<T> {
    /// Produces the default value.
    #[must_use]
    pub fn materialize(&self) -> T {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Factory(factory) => factory(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for DefaultValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Factory(_) => f.debug_struct("Factory").finish_non_exhaustive(),
        }
    }
}

/// Metadata for a declared property.
///
/// This contains the configuration for a property: its default value (or
/// default factory) and optional changed/coerce callbacks.
///
/// # Example
///
/// ```rust
/// use liana_property::PropertyMetadataBuilder;
///
/// let metadata = PropertyMetadataBuilder::new(100.0_f64)
///     .coerce(|v: f64| v.clamp(0.0, 200.0))
///     .build();
///
/// assert_eq!(metadata.default_value(), 100.0);
/// assert_eq!(metadata.coerce(500.0), 200.0);
/// ```
pub struct PropertyMetadata<T: Clone + PartialEq + 'static> {
    default: DefaultValue<T>,
    changed_callback: Option<PropertyChangedCallback<T>>,
    coerce_callback: Option<CoerceValueCallback<T>>,
}

impl<T: Clone + PartialEq + 'static> PropertyMetadata<T> {
    /// Creates new property metadata with the given fixed default value and
    /// no callbacks.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default: DefaultValue::Fixed(default_value),
            changed_callback: None,
            coerce_callback: None,
        }
    }

    /// Produces the default value.
    ///
    /// Fixed defaults are cloned; factory defaults are evaluated. The result
    /// is a fresh value each call, never shared storage.
    #[must_use]
    pub fn default_value(&self) -> T {
        self.default.materialize()
    }

    /// Returns `true` if the default is produced by a factory.
    #[must_use]
    #[inline]
    pub fn has_factory_default(&self) -> bool {
        matches!(self.default, DefaultValue::Factory(_))
    }

    /// Invokes the changed callback if one is set.
    #[inline]
    pub fn on_changed(&self, old_value: Option<&T>, new_value: &T) {
        if let Some(callback) = &self.changed_callback {
            callback(old_value, new_value);
        }
    }

    /// Coerces a value using the coerce callback if one is set.
    #[inline]
    pub fn coerce(&self, value: T) -> T {
        if let Some(callback) = &self.coerce_callback {
            callback(value)
        } else {
            value
        }
    }

    /// Returns whether a changed callback is set.
    #[must_use]
    #[inline]
    pub fn has_changed_callback(&self) -> bool {
        self.changed_callback.is_some()
    }

    /// Returns whether a coerce callback is set.
    #[must_use]
    #[inline]
    pub fn has_coerce_callback(&self) -> bool {
        self.coerce_callback.is_some()
    }
}

// Manual Debug impl since callbacks aren't Debug
impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for PropertyMetadata<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("default", &self.default)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .finish()
    }
}

/// Builder for [`PropertyMetadata`].
///
/// # Example
///
/// ```rust
/// use liana_property::PropertyMetadataBuilder;
///
/// let metadata = PropertyMetadataBuilder::new(0.0_f64)
///     .coerce(|v: f64| v.max(0.0))
///     .on_changed(|old, new| {
///         let _ = (old, new);
///     })
///     .build();
/// ```
pub struct PropertyMetadataBuilder<T: Clone + PartialEq + 'static> {
    default: DefaultValue<T>,
    changed_callback: Option<PropertyChangedCallback<T>>,
    coerce_callback: Option<CoerceValueCallback<T>>,
}

// Manual Debug impl since callbacks aren't Debug
impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for PropertyMetadataBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadataBuilder")
            .field("default", &self.default)
            .field("has_changed_callback", &self.changed_callback.is_some())
            .field("has_coerce_callback", &self.coerce_callback.is_some())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> PropertyMetadataBuilder<T> {
    /// Creates a new builder with the given fixed default value.
    #[must_use]
    pub fn new(default_value: T) -> Self {
        Self {
            default: DefaultValue::Fixed(default_value),
            changed_callback: None,
            coerce_callback: None,
        }
    }

    /// Creates a new builder whose default is evaluated lazily, per read.
    ///
    /// Use this for defaults that must be computed at read time, such as
    /// "now" timestamps or fresh collections:
    ///
    /// ```rust
    /// use liana_property::PropertyMetadataBuilder;
    ///
    /// let metadata = PropertyMetadataBuilder::computed(|| vec![0_u8; 4]).build();
    /// let a = metadata.default_value();
    /// let b = metadata.default_value();
    /// assert_eq!(a, b); // equal values...
    /// assert_ne!(a.as_ptr(), b.as_ptr()); // ...but never shared storage
    /// ```
    #[must_use]
    pub fn computed<F>(factory: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self {
            default: DefaultValue::Factory(Box::new(factory)),
            changed_callback: None,
            coerce_callback: None,
        }
    }

    /// Sets a callback to be invoked when the property value changes.
    ///
    /// The callback fires after the value is stored, and only for real
    /// changes (no-op writes are suppressed before this point).
    #[must_use]
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&T>, &T) + Send + Sync + 'static,
    {
        self.changed_callback = Some(Box::new(callback));
        self
    }

    /// Sets a callback to coerce values before they are stored.
    ///
    /// This is useful for clamping values, normalization, etc.
    #[must_use]
    pub fn coerce<F>(mut self, callback: F) -> Self
    where
        F: Fn(T) -> T + Send + Sync + 'static,
    {
        self.coerce_callback = Some(Box::new(callback));
        self
    }

    /// Builds the [`PropertyMetadata`].
    #[must_use]
    pub fn build(self) -> PropertyMetadata<T> {
        PropertyMetadata {
            default: self.default,
            changed_callback: self.changed_callback,
            coerce_callback: self.coerce_callback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;
    use alloc::sync::Arc;
    use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[test]
    fn metadata_defaults() {
        let metadata = PropertyMetadata::new(42_i32);
        assert_eq!(metadata.default_value(), 42);
        assert!(!metadata.has_factory_default());
        assert!(!metadata.has_changed_callback());
        assert!(!metadata.has_coerce_callback());
    }

    #[test]
    fn metadata_factory_default_evaluated_per_read() {
        let evaluations = Arc::new(AtomicU32::new(0));
        let counter = evaluations.clone();

        let metadata = PropertyMetadataBuilder::computed(move || {
            counter.fetch_add(1, Ordering::SeqCst) + 1
        })
        .build();

        assert!(metadata.has_factory_default());
        // Nothing evaluated at build time.
        assert_eq!(evaluations.load(Ordering::SeqCst), 0);

        assert_eq!(metadata.default_value(), 1);
        assert_eq!(metadata.default_value(), 2);
        assert_eq!(evaluations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn metadata_coerce() {
        let metadata = PropertyMetadataBuilder::new(0.0_f64)
            .coerce(|v: f64| v.clamp(0.0, 100.0))
            .build();

        assert_eq!(metadata.coerce(-10.0), 0.0);
        assert_eq!(metadata.coerce(50.0), 50.0);
        assert_eq!(metadata.coerce(150.0), 100.0);
    }

    #[test]
    fn metadata_changed_callback() {
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();

        let metadata = PropertyMetadataBuilder::new(0_i32)
            .on_changed(move |_, _| {
                called_clone.store(true, Ordering::SeqCst);
            })
            .build();

        assert!(metadata.has_changed_callback());
        assert!(!called.load(Ordering::SeqCst));

        metadata.on_changed(None, &42);
        assert!(called.load(Ordering::SeqCst));
    }

    #[test]
    fn metadata_debug() {
        let metadata = PropertyMetadata::new(42_i32);
        let debug = format!("{:?}", metadata);
        assert!(debug.contains("PropertyMetadata"));
        assert!(debug.contains("42"));

        let metadata = PropertyMetadataBuilder::computed(String::new).build();
        assert!(format!("{:?}", metadata).contains("Factory"));
    }
}
