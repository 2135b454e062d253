//! Plain in-memory store.

use std::collections::{BTreeMap, HashMap};

use crate::{
    domain::{ElementId, ElementKind, LotId, Part, PartId, PartLot, StructuralElement},
    storage::{ElementStore, PartStore},
};

/// In-memory implementation of the store traits.
///
/// Entities are keyed by id in ordered maps, so iteration and therefore
/// query results are stable between runs. Lots are indexed separately to
/// answer lot lookups without scanning every part.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InventoryStore {
    elements: BTreeMap<ElementId, StructuralElement>,
    parts: BTreeMap<PartId, Part>,
    lots: HashMap<LotId, PartId>,
}

impl InventoryStore {
    /// Number of stored elements, across all hierarchies.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of stored parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// All elements regardless of kind, in id order.
    pub fn elements(&self) -> impl Iterator<Item = &StructuralElement> {
        self.elements.values()
    }
}

impl ElementStore for InventoryStore {
    fn element(&self, id: ElementId) -> Option<&StructuralElement> {
        self.elements.get(&id)
    }

    fn all_of_kind(&self, kind: ElementKind) -> Vec<&StructuralElement> {
        self.elements
            .values()
            .filter(|element| element.kind == kind)
            .collect()
    }

    fn save_element(&mut self, element: StructuralElement) -> Option<StructuralElement> {
        self.elements.insert(element.id, element)
    }
}

impl PartStore for InventoryStore {
    fn part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(&id)
    }

    fn all_parts(&self) -> Vec<&Part> {
        self.parts.values().collect()
    }

    fn save_part(&mut self, part: Part) -> Option<Part> {
        let id = part.id;
        let lot_ids: Vec<LotId> = part.lots.iter().map(|lot| lot.id).collect();

        let previous = self.parts.insert(id, part);
        if let Some(previous) = &previous {
            for lot in &previous.lots {
                self.lots.remove(&lot.id);
            }
        }
        for lot_id in lot_ids {
            self.lots.insert(lot_id, id);
        }

        previous
    }

    // Index lookup instead of the linear scan of the default.
    fn lot(&self, id: LotId) -> Option<(&Part, &PartLot)> {
        let part = self.parts.get(self.lots.get(&id)?)?;
        Some((part, part.lot(id)?))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::Name;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn element_id(n: u128) -> ElementId {
        Uuid::from_u128(n).into()
    }

    fn category(n: u128, label: &str) -> StructuralElement {
        StructuralElement::new_with_id(element_id(n), ElementKind::Category, name(label), None)
    }

    #[test]
    fn saving_an_element_again_replaces_it() {
        let mut store = InventoryStore::default();

        assert!(store.save_element(category(1, "First")).is_none());
        let displaced = store.save_element(category(1, "Second")).unwrap();

        assert_eq!(displaced.name.as_str(), "First");
        assert_eq!(store.element_count(), 1);
        assert_eq!(
            store.element(element_id(1)).unwrap().name.as_str(),
            "Second"
        );
    }

    #[test]
    fn kinds_do_not_leak_into_each_other() {
        let mut store = InventoryStore::default();
        store.save_element(category(1, "Resistors"));
        store.save_element(StructuralElement::new_with_id(
            element_id(2),
            ElementKind::Footprint,
            name("0402"),
            None,
        ));

        let categories = store.all_of_kind(ElementKind::Category);
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name.as_str(), "Resistors");
        assert_eq!(store.all_of_kind(ElementKind::Supplier).len(), 0);
    }

    #[test]
    fn lot_index_follows_part_updates() {
        let lot_id: LotId = Uuid::from_u128(77).into();

        let mut part = Part::new_with_id(
            Uuid::from_u128(1).into(),
            name("BC547"),
            element_id(100),
        );
        let mut lot = PartLot::new(10.0);
        lot.id = lot_id;
        part.lots.push(lot);

        let mut store = InventoryStore::default();
        store.save_part(part.clone());

        let (owner, found) = store.lot(lot_id).unwrap();
        assert_eq!(owner.id, part.id);
        assert_eq!(found.amount, 10.0);

        // Removing the lot from the part drops it from the index.
        part.lots.clear();
        store.save_part(part);
        assert!(store.lot(lot_id).is_none());
    }

    #[test]
    fn elements_iterate_in_id_order() {
        let mut store = InventoryStore::default();
        store.save_element(category(3, "C"));
        store.save_element(category(1, "A"));
        store.save_element(category(2, "B"));

        let ids: Vec<_> = store.elements().map(|element| element.id).collect();
        assert_eq!(ids, [element_id(1), element_id(2), element_id(3)]);
    }
}
