// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Console walkthrough of the bindable `Person` model.
//!
//! Subscribes a listener that re-renders a "view" line whenever a property
//! changes, then drives the model through typed sets, a suppressed repeat
//! write, a name-based erased set, and a forced refresh.

use std::cell::RefCell;
use std::rc::Rc;

use liana_demos::{Person, first_name};
use liana_property::{BindableObjectExt, ErasedValue, global};

fn main() {
    let mut person = Person::new();

    let render_count = Rc::new(RefCell::new(0_u32));
    let counter = render_count.clone();
    person.subscribe(move |name| {
        *counter.borrow_mut() += 1;
        println!("  changed: {name}");
    });

    println!("defaults: full_name = {:?}", person.full_name());

    println!("set FirstName = \"Carl\"");
    person.set_first_name("Carl");
    println!("set LastName = \"Menear\"");
    person.set_last_name("Menear");
    println!("view: full_name = {:?}", person.full_name());

    println!("set FirstName = \"Carl\" again (no-op)");
    person.set_first_name("Carl");

    // The name-based path a binding layer would take.
    println!("set Person.FirstName by name = \"Anna\"");
    let id = global::resolve::<Person>("FirstName").expect("declared above");
    global::read(|registry| {
        person.set_value_erased(id, ErasedValue::new(String::from("Anna")), registry)
    })
    .expect("declared value type");
    println!("view: full_name = {:?}", person.full_name());

    println!("refresh FirstName (no value change)");
    let first_name_id = first_name().id();
    global::read(|registry| person.refresh(first_name_id, registry)).expect("owned property");

    println!("renders: {}", render_count.borrow());
}
