//! Storage interfaces and backends.
//!
//! The repository traits here are the only storage surface the domain logic
//! sees: the path resolver, tree materializer and barcode redirector are all
//! generic over them. [`InventoryStore`] is the plain in-memory
//! implementation; [`Warehouse`] wraps it with a file-backed root directory.

pub mod fixtures;
mod memory;
mod stats;
pub mod warehouse;

use std::collections::HashSet;

pub use memory::InventoryStore;
pub use stats::AttachmentStats;
pub use warehouse::{Warehouse, WarehouseError};

use crate::domain::{
    ElementId, ElementKind, LotId, NameOrdering, Part, PartId, PartLot, StructuralElement,
    natural_cmp,
};

/// Which name field a lookup matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    /// The primary display name.
    Primary,
    /// Any of the alternative names.
    Alternative,
}

/// How candidate names are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMatch {
    /// Exact equality.
    Sensitive,
    /// Both sides lower-cased before comparison.
    Folded,
}

/// Parent restriction applied to a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentScope {
    /// Parent is not considered.
    Any,
    /// Parent must equal the given value; `Exactly(None)` selects roots.
    Exactly(Option<ElementId>),
}

/// A name query against one hierarchy.
#[derive(Debug, Clone, Copy)]
pub struct NameLookup<'a> {
    /// The name to match.
    pub name: &'a str,
    /// Which name field to match it against.
    pub field: NameField,
    /// Comparison mode.
    pub case: CaseMatch,
    /// Parent restriction.
    pub parent: ParentScope,
}

impl NameLookup<'_> {
    /// Whether the element satisfies this lookup.
    #[must_use]
    pub fn matches(&self, element: &StructuralElement) -> bool {
        if let ParentScope::Exactly(parent) = self.parent {
            if element.parent != parent {
                return false;
            }
        }
        let case_sensitive = self.case == CaseMatch::Sensitive;
        match self.field {
            NameField::Primary => element.matches_name(self.name, case_sensitive),
            NameField::Alternative => element.matches_alternative_name(self.name, case_sensitive),
        }
    }
}

/// Errors raised while following parent references through a store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// A referenced element does not exist.
    #[error("element {0} does not exist")]
    MissingElement(ElementId),

    /// A parent chain loops back on itself.
    #[error("parent chain of element {0} contains a cycle")]
    ParentCycle(ElementId),
}

/// Repository of structural elements, scoped queries per hierarchy kind.
///
/// Implementations provide point lookup and kind iteration; the name
/// queries, child listings and path walks are derived from those.
pub trait ElementStore {
    /// Point lookup by id.
    fn element(&self, id: ElementId) -> Option<&StructuralElement>;

    /// All elements of one kind, in unspecified order.
    fn all_of_kind(&self, kind: ElementKind) -> Vec<&StructuralElement>;

    /// Inserts or replaces an element, returning the displaced value.
    fn save_element(&mut self, element: StructuralElement) -> Option<StructuralElement>;

    /// All elements of `kind` satisfying the lookup, in unspecified order.
    fn matching(&self, kind: ElementKind, lookup: &NameLookup<'_>) -> Vec<&StructuralElement> {
        self.all_of_kind(kind)
            .into_iter()
            .filter(|element| lookup.matches(element))
            .collect()
    }

    /// The single best match for the lookup.
    ///
    /// Duplicate names are possible; the element with the lowest id wins so
    /// the answer never depends on iteration order.
    fn lookup(&self, kind: ElementKind, lookup: &NameLookup<'_>) -> Option<&StructuralElement> {
        self.matching(kind, lookup)
            .into_iter()
            .min_by_key(|element| element.id)
    }

    /// Direct children of `parent` (roots for `None`), natural-sorted by
    /// name. Same-named siblings order by id.
    fn children_of(
        &self,
        kind: ElementKind,
        parent: Option<ElementId>,
        order: NameOrdering,
    ) -> Vec<&StructuralElement> {
        let mut children: Vec<_> = self
            .all_of_kind(kind)
            .into_iter()
            .filter(|element| element.parent == parent)
            .collect();
        children.sort_by(|a, b| {
            order
                .apply(natural_cmp(a.name.as_str(), b.name.as_str()))
                .then_with(|| a.id.cmp(&b.id))
        });
        children
    }

    /// The element's ancestor chain, root first, ending with the element
    /// itself.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingElement`] when the id (or one of its
    /// ancestors) is absent, and [`StoreError::ParentCycle`] when the chain
    /// loops.
    fn path_from_root(&self, id: ElementId) -> Result<Vec<&StructuralElement>, StoreError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(id);

        while let Some(current) = next {
            if !seen.insert(current) {
                return Err(StoreError::ParentCycle(id));
            }
            let element = self
                .element(current)
                .ok_or(StoreError::MissingElement(current))?;
            chain.push(element);
            next = element.parent;
        }

        chain.reverse();
        Ok(chain)
    }

    /// The element's full path: ancestor names from the root down to the
    /// element itself, joined by `delimiter`.
    ///
    /// # Errors
    ///
    /// Propagates the failures of [`ElementStore::path_from_root`].
    fn full_path(&self, id: ElementId, delimiter: &str) -> Result<String, StoreError> {
        Ok(self
            .path_from_root(id)?
            .iter()
            .map(|element| element.name.as_str())
            .collect::<Vec<_>>()
            .join(delimiter))
    }
}

/// Repository of parts and their lots.
pub trait PartStore {
    /// Point lookup by part id.
    fn part(&self, id: PartId) -> Option<&Part>;

    /// All parts, in unspecified order.
    fn all_parts(&self) -> Vec<&Part>;

    /// Inserts or replaces a part, returning the displaced value.
    fn save_part(&mut self, part: Part) -> Option<Part>;

    /// Finds a lot and its owning part.
    fn lot(&self, id: LotId) -> Option<(&Part, &PartLot)> {
        self.all_parts()
            .into_iter()
            .find_map(|part| part.lot(id).map(|lot| (part, lot)))
    }

    /// Case-insensitive search by provider id; lowest part id wins.
    fn part_by_provider_id(&self, provider_id: &str) -> Option<&Part> {
        self.all_parts()
            .into_iter()
            .filter(|part| part.matches_provider_id(provider_id))
            .min_by_key(|part| part.id)
    }

    /// Case-insensitive search by manufacturer product number; lowest part
    /// id wins.
    fn part_by_manufacturer_number(&self, mpn: &str) -> Option<&Part> {
        self.all_parts()
            .into_iter()
            .filter(|part| part.matches_manufacturer_number(mpn))
            .min_by_key(|part| part.id)
    }
}
