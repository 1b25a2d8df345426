// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased property value storage.
//!
//! This module provides [`ErasedValue`] for storing property values of any
//! type in a heterogeneous collection, and [`TypeMismatchError`] for the
//! runtime type checks on the erased access paths.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

/// A type-erased property value.
///
/// This wraps a value of any `'static + Clone + PartialEq` type, storing it
/// on the heap with its type information for later downcasting. Value
/// equality is preserved through the erasure via [`value_eq`](Self::value_eq),
/// which is what lets the store suppress no-op writes without knowing the
/// concrete type.
///
/// # Example
///
/// ```rust
/// use liana_property::ErasedValue;
///
/// let value = ErasedValue::new(42_i32);
/// assert!(value.is::<i32>());
/// assert_eq!(value.downcast_ref::<i32>(), Some(&42));
///
/// assert!(value.value_eq(&ErasedValue::new(42_i32)));
/// assert!(!value.value_eq(&ErasedValue::new(43_i32)));
/// assert!(!value.value_eq(&ErasedValue::new(42_u64)));
/// ```
pub struct ErasedValue {
    inner: Box<dyn ErasedValueTrait>,
    type_id: TypeId,
    type_name: &'static str,
}

impl ErasedValue {
    /// Creates a new erased value from a concrete value.
    #[must_use]
    pub fn new<T: Clone + PartialEq + 'static>(value: T) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            inner: Box::new(value),
        }
    }

    /// Returns the [`TypeId`] of the contained value.
    #[must_use]
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the type name of the contained value, for diagnostics.
    #[must_use]
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if the contained value is of type `T`.
    #[must_use]
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Attempts to downcast to a reference of type `T`.
    ///
    /// Returns `None` if the contained value is not of type `T`.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Compares two erased values by value equality.
    ///
    /// Returns `false` if the contained types differ.
    #[must_use]
    pub fn value_eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.inner.eq_erased(other.inner.as_any())
    }

    /// Clones the contained value into a new [`ErasedValue`].
    #[must_use]
    pub fn clone_value(&self) -> Self {
        Self {
            inner: self.inner.clone_boxed(),
            type_id: self.type_id,
            type_name: self.type_name,
        }
    }
}

impl Clone for ErasedValue {
    fn clone(&self) -> Self {
        self.clone_value()
    }
}

impl PartialEq for ErasedValue {
    fn eq(&self, other: &Self) -> bool {
        self.value_eq(other)
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type", &self.type_name)
            .finish_non_exhaustive()
    }
}

/// Trait object for type-erased values that can be cloned and compared.
trait ErasedValueTrait: Any {
    fn as_any(&self) -> &dyn Any;
    fn clone_boxed(&self) -> Box<dyn ErasedValueTrait>;
    fn eq_erased(&self, other: &dyn Any) -> bool;
}

impl<T: Clone + PartialEq + 'static> ErasedValueTrait for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn ErasedValueTrait> {
        Box::new(self.clone())
    }

    fn eq_erased(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().is_some_and(|other| self == other)
    }
}

/// A property descriptor was used with an incompatible type.
///
/// All variants are local precondition violations: never transient, never
/// retried. See the crate-level error discussion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeMismatchError {
    /// The descriptor's owner type does not match the store's owner type.
    Owner {
        /// The property name.
        property: &'static str,
        /// The owner type the property was declared on.
        expected: &'static str,
        /// The owner type of the store it was used with.
        found: &'static str,
    },
    /// The value type does not match the property's declared value type.
    Value {
        /// The property name.
        property: &'static str,
        /// The declared value type.
        expected: &'static str,
        /// The value type actually supplied.
        found: &'static str,
    },
}

impl fmt::Display for TypeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner {
                property,
                expected,
                found,
            } => write!(
                f,
                "property '{property}' is declared on {expected} but was used with a store for {found}"
            ),
            Self::Value {
                property,
                expected,
                found,
            } => write!(
                f,
                "property '{property}' holds values of type {expected} but was accessed as {found}"
            ),
        }
    }
}

impl core::error::Error for TypeMismatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;
    use alloc::string::String;

    #[test]
    fn erased_value_i32() {
        let value = ErasedValue::new(42_i32);
        assert!(value.is::<i32>());
        assert!(!value.is::<f64>());
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
        assert_eq!(value.downcast_ref::<f64>(), None);
    }

    #[test]
    fn erased_value_string() {
        let value = ErasedValue::new(String::from("hello"));
        assert!(value.is::<String>());
        assert_eq!(
            value.downcast_ref::<String>().map(|s| s.as_str()),
            Some("hello")
        );
    }

    #[test]
    fn erased_value_clone() {
        let value = ErasedValue::new(42_i32);
        let cloned = value.clone();
        assert_eq!(cloned.downcast_ref::<i32>(), Some(&42));

        // Original still works
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    }

    #[test]
    fn erased_value_eq_same_type() {
        let a = ErasedValue::new(String::from("Carl"));
        let b = ErasedValue::new(String::from("Carl"));
        let c = ErasedValue::new(String::from("Anna"));

        assert!(a.value_eq(&b));
        assert!(!a.value_eq(&c));
        assert_eq!(a, b);
    }

    #[test]
    fn erased_value_eq_different_types() {
        // Same bit pattern, different types: never equal.
        let a = ErasedValue::new(1_i32);
        let b = ErasedValue::new(1_u32);
        assert!(!a.value_eq(&b));
    }

    #[test]
    fn erased_value_type_info() {
        let value = ErasedValue::new(42_i32);
        assert_eq!(value.type_id(), TypeId::of::<i32>());
        assert_eq!(value.type_name(), "i32");
    }

    #[test]
    fn erased_value_debug() {
        let value = ErasedValue::new(42_i32);
        let debug = format!("{:?}", value);
        assert!(debug.contains("ErasedValue"));
        assert!(debug.contains("i32"));
    }

    #[test]
    fn type_mismatch_display() {
        let err = TypeMismatchError::Owner {
            property: "FirstName",
            expected: "Person",
            found: "Address",
        };
        let text = format!("{err}");
        assert!(text.contains("FirstName"));
        assert!(text.contains("Person"));
        assert!(text.contains("Address"));

        let err = TypeMismatchError::Value {
            property: "FirstName",
            expected: "alloc::string::String",
            found: "i32",
        };
        assert!(format!("{err}").contains("i32"));
    }
}
