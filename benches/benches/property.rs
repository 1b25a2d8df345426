// Copyright 2025 the Liana Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `liana_property`.

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use std::string::String;
use std::sync::Once;

use liana_property::{
    BindableObject, BindableObjectExt, ErasedValue, Property, PropertyMetadataBuilder,
    PropertyRegistry, PropertyStore,
};

struct Elem {
    store: PropertyStore,
}

impl Elem {
    fn new() -> Self {
        Self {
            store: PropertyStore::for_type::<Elem>(),
        }
    }
}

impl BindableObject for Elem {
    fn property_store(&self) -> &PropertyStore {
        &self.store
    }

    fn property_store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }
}

fn bench_property(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: PropertyStore={} Elem={} ErasedValue={}",
            core::mem::size_of::<PropertyStore>(),
            core::mem::size_of::<Elem>(),
            core::mem::size_of::<ErasedValue>(),
        );
    });

    let mut registry = PropertyRegistry::new();
    let width: Property<f64> = registry
        .declare::<Elem, f64>("Width", PropertyMetadataBuilder::new(0.0_f64).build())
        .unwrap();

    let mut group = c.benchmark_group("property/resolve");

    group.bench_function("stored", |b| {
        let mut element = Elem::new();
        element.set_value(width, 100.0, &registry).unwrap();
        b.iter(|| black_box(element.get_value(width, &registry)))
    });

    group.bench_function("default", |b| {
        let element = Elem::new();
        b.iter(|| black_box(element.get_value(width, &registry)))
    });

    group.bench_function("erased", |b| {
        let mut element = Elem::new();
        element.set_value(width, 100.0, &registry).unwrap();
        b.iter(|| black_box(element.get_value_erased(width.id(), &registry)))
    });

    group.bench_function("by_name", |b| {
        b.iter(|| black_box(registry.resolve::<Elem>("Width").unwrap().id()))
    });

    group.finish();

    let mut group = c.benchmark_group("property/resolve_string");

    let mut registry_string = PropertyRegistry::new();
    let text: Property<String> = registry_string
        .declare::<Elem, String>("Text", PropertyMetadataBuilder::new(String::new()).build())
        .unwrap();

    group.bench_function("stored_clone", |b| {
        let mut element = Elem::new();
        element
            .set_value(
                text,
                "hello world hello world hello world".to_string(),
                &registry_string,
            )
            .unwrap();
        b.iter(|| black_box(element.get_value(text, &registry_string)))
    });

    group.finish();

    let mut group = c.benchmark_group("property/mutate");

    group.bench_function("set_value/f64/no_callback", |b| {
        b.iter_batched(
            Elem::new,
            |mut element| {
                let changed = element.set_value(width, 123.0_f64, &registry).unwrap();
                black_box(changed);
                black_box(element);
            },
            BatchSize::SmallInput,
        )
    });

    let mut registry_with_cb = PropertyRegistry::new();
    let width_cb: Property<f64> = registry_with_cb
        .declare::<Elem, f64>(
            "Width",
            PropertyMetadataBuilder::new(0.0_f64)
                .on_changed(|_old, _new| {})
                .build(),
        )
        .unwrap();
    group.bench_function("set_value/f64/with_callback", |b| {
        b.iter_batched(
            Elem::new,
            |mut element| {
                let changed = element
                    .set_value(width_cb, 123.0_f64, &registry_with_cb)
                    .unwrap();
                black_box(changed);
                black_box(element);
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("set_value/f64/noop_write", |b| {
        let mut element = Elem::new();
        element.set_value(width, 123.0_f64, &registry).unwrap();
        b.iter(|| black_box(element.set_value(width, 123.0_f64, &registry)))
    });

    group.bench_function("set_value/string", |b| {
        b.iter_batched(
            Elem::new,
            |mut element| {
                let changed = element
                    .set_value(text, String::from("hello world"), &registry_string)
                    .unwrap();
                black_box(changed);
                black_box(element);
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_property);
criterion_main!(benches);
