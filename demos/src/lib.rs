// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sample models for `liana_property`.
//!
//! A `Person` model whose properties are declared once, process-wide, and
//! accessed through the bindable-property API. Listener fan-out is the
//! model's own business: `Person` keeps a list of subscribers and forwards
//! each change notification to all of them.

use std::sync::LazyLock;
use std::time::SystemTime;

use liana_property::{
    BindableObject, BindableObjectExt, Property, PropertyMetadataBuilder, PropertyStore, global,
};

/// Returns the `Person.FirstName` property, declaring it on first use.
pub fn first_name() -> Property<String> {
    static FIRST_NAME: LazyLock<Property<String>> = LazyLock::new(|| {
        global::declare::<Person, String>(
            "FirstName",
            PropertyMetadataBuilder::new(String::new()).build(),
        )
        .unwrap()
    });
    *FIRST_NAME
}

/// Returns the `Person.LastName` property, declaring it on first use.
pub fn last_name() -> Property<String> {
    static LAST_NAME: LazyLock<Property<String>> = LazyLock::new(|| {
        global::declare::<Person, String>(
            "LastName",
            PropertyMetadataBuilder::new(String::new()).build(),
        )
        .unwrap()
    });
    *LAST_NAME
}

/// Returns the `Person.DateOfBirth` property, declaring it on first use.
///
/// The default is a construction-time "now": the factory is evaluated per
/// defaulted read, never shared between instances.
pub fn date_of_birth() -> Property<SystemTime> {
    static DATE_OF_BIRTH: LazyLock<Property<SystemTime>> = LazyLock::new(|| {
        global::declare::<Person, SystemTime>(
            "DateOfBirth",
            PropertyMetadataBuilder::computed(SystemTime::now).build(),
        )
        .unwrap()
    });
    *DATE_OF_BIRTH
}

/// A bindable person model.
///
/// Carries a [`PropertyStore`] by composition; no base class. Subscribers
/// registered with [`subscribe`](Self::subscribe) receive the name of each
/// property whose value actually changed.
pub struct Person {
    store: PropertyStore,
    listeners: Vec<Box<dyn FnMut(&'static str)>>,
}

impl Person {
    /// Creates a person with all properties at their defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: PropertyStore::for_type::<Self>(),
            listeners: Vec::new(),
        }
    }

    /// Registers a listener for change notifications.
    pub fn subscribe(&mut self, listener: impl FnMut(&'static str) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Gets the first name.
    #[must_use]
    pub fn first_name(&self) -> String {
        // Take the handle before entering the read closure: first use
        // declares the property, which needs the write lock.
        let property = first_name();
        global::read(|registry| self.get_value(property, registry)).unwrap()
    }

    /// Sets the first name, returning whether it changed.
    pub fn set_first_name(&mut self, value: impl Into<String>) -> bool {
        let property = first_name();
        let value = value.into();
        global::read(|registry| self.set_value(property, value, registry)).unwrap()
    }

    /// Gets the last name.
    #[must_use]
    pub fn last_name(&self) -> String {
        let property = last_name();
        global::read(|registry| self.get_value(property, registry)).unwrap()
    }

    /// Sets the last name, returning whether it changed.
    pub fn set_last_name(&mut self, value: impl Into<String>) -> bool {
        let property = last_name();
        let value = value.into();
        global::read(|registry| self.set_value(property, value, registry)).unwrap()
    }

    /// Gets the date of birth.
    #[must_use]
    pub fn date_of_birth(&self) -> SystemTime {
        let property = date_of_birth();
        global::read(|registry| self.get_value(property, registry)).unwrap()
    }

    /// Sets the date of birth, returning whether it changed.
    pub fn set_date_of_birth(&mut self, value: SystemTime) -> bool {
        let property = date_of_birth();
        global::read(|registry| self.set_value(property, value, registry)).unwrap()
    }

    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let first = self.first_name();
        let last = self.last_name();
        if first.is_empty() {
            last
        } else if last.is_empty() {
            first
        } else {
            format!("{first} {last}")
        }
    }
}

impl Default for Person {
    fn default() -> Self {
        Self::new()
    }
}

impl BindableObject for Person {
    fn property_store(&self) -> &PropertyStore {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }

    fn on_property_changed(&mut self, name: &'static str) {
        for listener in &mut self.listeners {
            listener(name);
        }
    }
}
