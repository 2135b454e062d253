//! This bench test materializes trees over a wide category hierarchy with
//! names that exercise the natural sort.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use stockroom::{
    ElementId, ElementKind, ElementStore as _, InventoryStore, Name, StructuralElement,
    domain::{NameOrdering, tree},
};
use uuid::Uuid;

const KIND: ElementKind = ElementKind::Category;

fn element(counter: &mut u128, name: String, parent: Option<ElementId>) -> StructuralElement {
    *counter += 1;
    StructuralElement::new_with_id(
        ElementId::from(Uuid::from_u128(*counter)),
        KIND,
        Name::new(name).unwrap(),
        parent,
    )
}

/// Generates 50 root categories with 20 children each.
fn preseed_store() -> InventoryStore {
    let mut store = InventoryStore::default();
    let mut counter = 0;
    for a in 0..50 {
        let root = element(&mut counter, format!("Category {a}"), None);
        let root_id = root.id;
        store.save_element(root);
        for b in 0..20 {
            store.save_element(element(&mut counter, format!("Item {b}"), Some(root_id)));
        }
    }
    store
}

fn build_full_tree(c: &mut Criterion) {
    let store = preseed_store();
    c.bench_function("build full tree", |b| {
        b.iter(|| tree::build_tree(&store, KIND, None, NameOrdering::Ascending).unwrap());
    });
}

fn flatten_hierarchy(c: &mut Criterion) {
    let store = preseed_store();
    c.bench_function("flatten hierarchy", |b| {
        b.iter(|| tree::flatten(&store, KIND, None, NameOrdering::Ascending).unwrap());
    });
}

criterion_group!(benches, build_full_tree, flatten_hierarchy);
criterion_main!(benches);
