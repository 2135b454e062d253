//! Demonstration data.
//!
//! A small but representative inventory: nested hierarchies of every kind,
//! duplicate part names, price breaks, attachments of each storage class.
//! Used by `inv seed`, the benchmarks and a number of tests. Ids are fixed
//! so seeded inventories are comparable across machines.

use chrono::NaiveDate;

use crate::{
    domain::{
        Attachment, ElementId, ElementKind, ManufacturingStatus, Name, OrderDetail, Part, PartLot,
        PriceDetail, ProviderReference, StructuralElement,
    },
    storage::{ElementStore, InventoryStore, PartStore},
};

const CATEGORY_BASE: u128 = 0x10;
const FOOTPRINT_BASE: u128 = 0x20;
const LOCATION_BASE: u128 = 0x30;
const MANUFACTURER_BASE: u128 = 0x40;
const SUPPLIER_BASE: u128 = 0x50;
const PART_BASE: u128 = 0x60;
const LOT_BASE: u128 = 0x70;

fn element_id(n: u128) -> ElementId {
    uuid::Uuid::from_u128(n).into()
}

fn name(s: &str) -> Name {
    Name::new(s).expect("fixture names are valid")
}

fn element(
    id: u128,
    kind: ElementKind,
    label: &str,
    parent: Option<u128>,
) -> StructuralElement {
    StructuralElement::new_with_id(element_id(id), kind, name(label), parent.map(element_id))
}

/// Seeds `store` with the demonstration inventory.
pub fn seed_demo<S: ElementStore + PartStore>(store: &mut S) {
    for e in elements() {
        store.save_element(e);
    }
    for part in parts() {
        store.save_part(part);
    }
}

/// A fresh in-memory store holding the demonstration inventory.
#[must_use]
pub fn demo_store() -> InventoryStore {
    let mut store = InventoryStore::default();
    seed_demo(&mut store);
    store
}

fn elements() -> Vec<StructuralElement> {
    use ElementKind::{Category, Footprint, Manufacturer, StorageLocation, Supplier};

    let mut all = vec![
        element(CATEGORY_BASE + 1, Category, "Passives", None),
        element(CATEGORY_BASE + 2, Category, "Resistors", Some(CATEGORY_BASE + 1)),
        element(CATEGORY_BASE + 3, Category, "SMD", Some(CATEGORY_BASE + 2)),
        element(CATEGORY_BASE + 4, Category, "Electromechanical", None),
        element(CATEGORY_BASE + 5, Category, "Connectors", Some(CATEGORY_BASE + 4)),
        element(FOOTPRINT_BASE + 1, Footprint, "0402", None),
        element(FOOTPRINT_BASE + 2, Footprint, "0603", None),
        element(FOOTPRINT_BASE + 3, Footprint, "TO-92", None),
        element(LOCATION_BASE + 1, StorageLocation, "Main Warehouse", None),
        element(LOCATION_BASE + 2, StorageLocation, "Shelf A1", Some(LOCATION_BASE + 1)),
        element(LOCATION_BASE + 3, StorageLocation, "Shelf A2", Some(LOCATION_BASE + 1)),
        element(LOCATION_BASE + 4, StorageLocation, "Lab", None),
        element(LOCATION_BASE + 5, StorageLocation, "Bench 3", Some(LOCATION_BASE + 4)),
        element(MANUFACTURER_BASE + 1, Manufacturer, "ACME Semiconductor", None),
        element(MANUFACTURER_BASE + 2, Manufacturer, "BC Components", None),
    ];

    let mut digikey = element(SUPPLIER_BASE + 1, Supplier, "Digi-Key", None);
    digikey.add_alternative_name(name("DigiKey"));
    let mut mouser = element(SUPPLIER_BASE + 2, Supplier, "Mouser Electronics", None);
    mouser.add_alternative_name(name("Mouser"));
    all.push(digikey);
    all.push(mouser);

    all
}

fn parts() -> Vec<Part> {
    let resistors = element_id(CATEGORY_BASE + 2);

    let part1 = Part::new_with_id(
        uuid::Uuid::from_u128(PART_BASE + 1).into(),
        name("Part 1"),
        resistors,
    );

    let mut part2 = Part::new_with_id(
        uuid::Uuid::from_u128(PART_BASE + 2).into(),
        name("Part 2"),
        resistors,
    );
    part2.footprint = Some(element_id(FOOTPRINT_BASE + 1));
    part2.manufacturer = Some(element_id(MANUFACTURER_BASE + 1));
    part2.manufacturer_product_number = Some("BC547B".to_string());
    part2.provider_reference = Some(ProviderReference {
        provider: "digikey".to_string(),
        provider_id: "296-1234-1-ND".to_string(),
    });
    part2.tags = ["test", "Test", "Part2"]
        .into_iter()
        .map(str::to_string)
        .collect();
    part2.mass = Some(100.2);
    part2.needs_review = true;
    part2.manufacturing_status = Some(ManufacturingStatus::Active);
    part2.attachments = vec![
        Attachment {
            name: name("Datasheet"),
            internal_path: Some("%MEDIA%/bc547.pdf".to_string()),
            external_path: Some("https://example.com/bc547.pdf".to_string()),
            show_in_table: true,
        },
        Attachment {
            name: name("Invoice"),
            internal_path: Some("%SECURE%/invoice.pdf".to_string()),
            external_path: None,
            show_in_table: false,
        },
    ];

    // Shares its name with part2; lookups have to disambiguate by id.
    let mut part3 = Part::new_with_id(
        uuid::Uuid::from_u128(PART_BASE + 3).into(),
        name("Part 2"),
        resistors,
    );
    part3.favorite = true;
    part3.lots = vec![
        PartLot {
            id: uuid::Uuid::from_u128(LOT_BASE + 1).into(),
            storage_location: Some(element_id(LOCATION_BASE + 2)),
            amount: 1.0,
            expiration_date: None,
            comment: String::new(),
            needs_refill: false,
        },
        PartLot {
            id: uuid::Uuid::from_u128(LOT_BASE + 2).into(),
            storage_location: Some(element_id(LOCATION_BASE + 5)),
            amount: 2.0,
            expiration_date: NaiveDate::from_ymd_opt(2026, 1, 1),
            comment: "Test".to_string(),
            needs_refill: true,
        },
    ];
    part3.order_details = vec![
        OrderDetail {
            supplier: element_id(SUPPLIER_BASE + 1),
            supplier_part_number: None,
            obsolete: false,
            prices: vec![
                PriceDetail {
                    price_related_quantity: 1.0,
                    price: 10.0,
                },
                PriceDetail {
                    price_related_quantity: 10.0,
                    price: 15.0,
                },
            ],
        },
        OrderDetail {
            supplier: element_id(SUPPLIER_BASE + 1),
            supplier_part_number: Some("BC 547".to_string()),
            obsolete: true,
            prices: Vec::new(),
        },
    ];
    part3.attachments = vec![
        Attachment {
            name: name("TestAttachment"),
            internal_path: None,
            external_path: Some("www.foo.bar".to_string()),
            show_in_table: false,
        },
        Attachment {
            name: name("Test2"),
            internal_path: Some("invalid".to_string()),
            external_path: None,
            show_in_table: true,
        },
    ];

    vec![part1, part2, part3]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PathResolver, ResolveOptions};

    #[test]
    fn demo_store_is_fully_populated() {
        let store = demo_store();

        assert_eq!(store.element_count(), 17);
        assert_eq!(store.part_count(), 3);
        assert_eq!(store.all_of_kind(ElementKind::Category).len(), 5);
        assert_eq!(store.all_of_kind(ElementKind::Supplier).len(), 2);
    }

    #[test]
    fn category_chain_resolves_without_creation() {
        let store = demo_store();
        let mut resolver = PathResolver::new(&store, ElementKind::Category);

        let chain = resolver.resolve_path("Passives->Resistors->SMD", &ResolveOptions::default());

        assert_eq!(chain.len(), 3);
        assert_eq!(chain[2].id, element_id(CATEGORY_BASE + 3));
        assert!(resolver.into_created().is_empty());
    }

    #[test]
    fn duplicate_part_names_resolve_to_the_lower_id() {
        let store = demo_store();

        // Two parts share the name "Part 2"; provider searches must pick
        // deterministically.
        let by_mpn = store.part_by_manufacturer_number("bc547b").unwrap();
        assert_eq!(by_mpn.id, uuid::Uuid::from_u128(PART_BASE + 2).into());
    }

    #[test]
    fn lots_are_reachable_through_the_store() {
        let store = demo_store();

        let (part, lot) = store
            .lot(uuid::Uuid::from_u128(LOT_BASE + 2).into())
            .unwrap();
        assert_eq!(part.id, uuid::Uuid::from_u128(PART_BASE + 3).into());
        assert!(lot.needs_refill);
        assert_eq!(lot.comment, "Test");
    }

    #[test]
    fn supplier_alternative_names_are_searchable() {
        let store = demo_store();
        let mut resolver = PathResolver::new(&store, ElementKind::Supplier);

        let found = resolver.resolve_single_lax("digikey", false).unwrap();
        assert_eq!(found.id, element_id(SUPPLIER_BASE + 1));
    }
}
