//! This bench test resolves delimited paths against a store holding a wide
//! three-level location hierarchy.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use stockroom::{
    ElementId, ElementKind, ElementStore as _, InventoryStore, Name, StructuralElement,
    domain::PathResolver,
};
use uuid::Uuid;

const KIND: ElementKind = ElementKind::StorageLocation;

fn element(counter: &mut u128, name: String, parent: Option<ElementId>) -> StructuralElement {
    *counter += 1;
    StructuralElement::new_with_id(
        ElementId::from(Uuid::from_u128(*counter)),
        KIND,
        Name::new(name).unwrap(),
        parent,
    )
}

/// Generates 10 warehouses of 10 shelves of 10 bins.
fn preseed_store() -> InventoryStore {
    let mut store = InventoryStore::default();
    let mut counter = 0;
    for a in 0..10 {
        let root = element(&mut counter, format!("Warehouse {a}"), None);
        let root_id = root.id;
        store.save_element(root);
        for b in 0..10 {
            let shelf = element(&mut counter, format!("Shelf {b}"), Some(root_id));
            let shelf_id = shelf.id;
            store.save_element(shelf);
            for c in 0..10 {
                store.save_element(element(&mut counter, format!("Bin {c}"), Some(shelf_id)));
            }
        }
    }
    store
}

fn resolve_existing(c: &mut Criterion) {
    let store = preseed_store();
    c.bench_function("resolve existing path", |b| {
        b.iter(|| {
            let mut resolver = PathResolver::new(&store, KIND);
            resolver.resolve_path_strict("Warehouse 5->Shelf 5->Bin 5", "->", false)
        });
    });
}

fn resolve_with_creation(c: &mut Criterion) {
    let store = preseed_store();
    let path = (0..10)
        .map(|i| format!("Aisle {i}"))
        .collect::<Vec<_>>()
        .join("->");
    c.bench_function("resolve ten new segments", |b| {
        b.iter(|| {
            let mut resolver = PathResolver::new(&store, KIND);
            resolver.resolve_path_strict(&path, "->", true)
        });
    });
}

criterion_group!(benches, resolve_existing, resolve_with_creation);
criterion_main!(benches);
