//! Hierarchical inventory elements.
//!
//! Categories, footprints, storage locations, manufacturers and suppliers
//! all share the same shape: a named node with an optional parent of the
//! same kind. Identity is assigned at construction, so freshly created
//! elements can be linked together before anything is persisted.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Name;

/// Globally unique, perpetually stable identifier of a structural element.
///
/// Ids are comparable; where several elements tie on a name lookup, the
/// lowest id wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for ElementId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The variants of structural element the inventory organizes.
///
/// Every hierarchy is scoped to one kind; an element's parent always has the
/// same kind as the element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// Part categories (`Passives -> Resistors -> SMD`).
    Category,
    /// Package footprints (`0402`, `TO-92`).
    Footprint,
    /// Physical storage locations (`Main Warehouse -> Shelf A1`).
    StorageLocation,
    /// Part manufacturers.
    Manufacturer,
    /// Part suppliers (distributors).
    Supplier,
}

impl ElementKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 5] = [
        Self::Category,
        Self::Footprint,
        Self::StorageLocation,
        Self::Manufacturer,
        Self::Supplier,
    ];

    /// Lower-case singular label, as used in CLI arguments and messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Footprint => "footprint",
            Self::StorageLocation => "location",
            Self::Manufacturer => "manufacturer",
            Self::Supplier => "supplier",
        }
    }

    /// Plural form, as used for storage directories and URL paths.
    #[must_use]
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Footprint => "footprints",
            Self::StorageLocation => "locations",
            Self::Manufacturer => "manufacturers",
            Self::Supplier => "suppliers",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ElementKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(Self::Category),
            "footprint" | "footprints" => Ok(Self::Footprint),
            "location" | "locations" | "storage_location" => Ok(Self::StorageLocation),
            "manufacturer" | "manufacturers" => Ok(Self::Manufacturer),
            "supplier" | "suppliers" => Ok(Self::Supplier),
            _ => Err(UnknownKindError(s.to_string())),
        }
    }
}

/// Error returned when parsing an element kind from a string fails.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error(
    "Unknown element kind '{0}': expected one of category, footprint, location, manufacturer, supplier"
)]
pub struct UnknownKindError(String);

/// A named node in one of the inventory's hierarchies.
///
/// Elements are persisted independently of each other; the parent field is a
/// reference by id, not ownership. Parent chains are expected to be acyclic,
/// which traversals guard rather than trust.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralElement {
    /// Stable identifier, assigned at construction.
    pub id: ElementId,
    /// Which hierarchy this element belongs to.
    pub kind: ElementKind,
    /// Primary display name.
    pub name: Name,
    /// Additional names the element answers to in lookups.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<Name>,
    /// Parent element of the same kind, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
    /// When the element was created.
    pub created: DateTime<Utc>,
}

impl StructuralElement {
    /// Constructs a new element with a fresh id.
    #[must_use]
    pub fn new(kind: ElementKind, name: Name, parent: Option<ElementId>) -> Self {
        Self::new_with_id(ElementId::new(), kind, name, parent)
    }

    /// Constructs an element with a caller-chosen id.
    ///
    /// Used by fixtures and tests that need deterministic identifiers.
    #[must_use]
    pub fn new_with_id(
        id: ElementId,
        kind: ElementKind,
        name: Name,
        parent: Option<ElementId>,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            alternative_names: Vec::new(),
            parent,
            created: Utc::now(),
        }
    }

    /// Adds an alternative name, skipping exact duplicates.
    pub fn add_alternative_name(&mut self, name: Name) {
        if !self.alternative_names.contains(&name) {
            self.alternative_names.push(name);
        }
    }

    /// Whether `candidate` matches the primary name under the given folding.
    #[must_use]
    pub fn matches_name(&self, candidate: &str, case_sensitive: bool) -> bool {
        names_equal(self.name.as_str(), candidate, case_sensitive)
    }

    /// Whether `candidate` matches any alternative name under the given
    /// folding.
    #[must_use]
    pub fn matches_alternative_name(&self, candidate: &str, case_sensitive: bool) -> bool {
        self.alternative_names
            .iter()
            .any(|name| names_equal(name.as_str(), candidate, case_sensitive))
    }
}

/// Equality on names, exact or with both sides lower-cased.
#[must_use]
pub fn names_equal(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    #[test]
    fn new_assigns_distinct_ids() {
        let a = StructuralElement::new(ElementKind::Category, name("SMD"), None);
        let b = StructuralElement::new(ElementKind::Category, name("SMD"), None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn add_alternative_name_skips_duplicates() {
        let mut element = StructuralElement::new(ElementKind::Supplier, name("Digi-Key"), None);
        element.add_alternative_name(name("DK"));
        element.add_alternative_name(name("DK"));
        assert_eq!(element.alternative_names.len(), 1);
    }

    #[test_case("SMD", "SMD", true, true; "exact match strict")]
    #[test_case("SMD", "smd", true, false; "case mismatch strict")]
    #[test_case("SMD", "smd", false, true; "case mismatch folded")]
    #[test_case("SMD", "SMT", false, false; "different name folded")]
    fn primary_name_matching(name_str: &str, candidate: &str, strict: bool, expected: bool) {
        let element = StructuralElement::new(ElementKind::Category, name(name_str), None);
        assert_eq!(element.matches_name(candidate, strict), expected);
    }

    #[test]
    fn alternative_name_matching_checks_every_entry() {
        let mut element = StructuralElement::new(ElementKind::Supplier, name("Mouser"), None);
        element.add_alternative_name(name("Mouser Electronics"));
        element.add_alternative_name(name("MOU"));

        assert!(element.matches_alternative_name("mou", false));
        assert!(!element.matches_alternative_name("mou", true));
        assert!(!element.matches_alternative_name("Mouser", true));
    }

    #[test_case("category", ElementKind::Category)]
    #[test_case("Categories", ElementKind::Category)]
    #[test_case("location", ElementKind::StorageLocation)]
    #[test_case("storage_location", ElementKind::StorageLocation)]
    #[test_case("SUPPLIERS", ElementKind::Supplier)]
    fn kind_parsing(input: &str, expected: ElementKind) {
        assert_eq!(input.parse::<ElementKind>().unwrap(), expected);
    }

    #[test]
    fn kind_parsing_rejects_unknown() {
        assert!("attachment".parse::<ElementKind>().is_err());
    }

    #[test]
    fn element_serde_round_trip() {
        let mut element = StructuralElement::new(
            ElementKind::StorageLocation,
            name("Shelf A1"),
            Some(ElementId::new()),
        );
        element.add_alternative_name(name("A1"));

        let yaml = serde_yaml::to_string(&element).unwrap();
        let back: StructuralElement = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(element, back);
    }
}
