//! Parts, stock lots, ordering information and attachments.
//!
//! A part references the structural hierarchies (category, footprint,
//! manufacturer, locations via its lots, suppliers via its order details) by
//! element id. Lots, order details and attachments are owned by their part
//! and persisted with it.

use std::{collections::BTreeSet, fmt};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{ElementId, Name};

/// Globally unique, perpetually stable identifier of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(Uuid);

impl PartId {
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

impl From<Uuid> for PartId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a stock lot, unique across all parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LotId(Uuid);

impl LotId {
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

impl From<Uuid> for LotId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for LotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status a manufacturer reports for a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManufacturingStatus {
    /// Announced but not yet available.
    Announced,
    /// In active production.
    Active,
    /// Not recommended for new designs.
    Nrfnd,
    /// End of life announced.
    Eol,
    /// No longer produced.
    Discontinued,
    /// Status not known.
    Unknown,
}

/// Reference to the info provider a part was imported from.
///
/// The provider id is the provider's own key for the part (for distributors,
/// their order number), matched case-insensitively by vendor barcode scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReference {
    /// Name of the provider (e.g. a distributor).
    pub provider: String,
    /// The provider's identifier for this part.
    pub provider_id: String,
}

/// A physically stocked quantity of a part at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartLot {
    /// Stable identifier of the lot.
    pub id: LotId,
    /// Where the lot is stored, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<ElementId>,
    /// Stocked amount.
    pub amount: f64,
    /// Date after which the lot should not be used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    /// Free-form comment.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    /// Whether the lot is flagged for refilling.
    #[serde(default)]
    pub needs_refill: bool,
}

impl PartLot {
    /// Creates an empty lot with a fresh id.
    #[must_use]
    pub fn new(amount: f64) -> Self {
        Self {
            id: LotId::new(),
            storage_location: None,
            amount,
            expiration_date: None,
            comment: String::new(),
            needs_refill: false,
        }
    }
}

/// One supplier's offer for a part, with its price breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// The supplier element this offer belongs to.
    pub supplier: ElementId,
    /// The supplier's own part number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_part_number: Option<String>,
    /// Whether the offer is no longer orderable.
    #[serde(default)]
    pub obsolete: bool,
    /// Price breaks, ordered by quantity.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prices: Vec<PriceDetail>,
}

/// A single price break of an order detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetail {
    /// The quantity the price refers to.
    pub price_related_quantity: f64,
    /// Price for that quantity.
    pub price: f64,
}

/// A file or link attached to a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Display name of the attachment.
    pub name: Name,
    /// Path of the stored file, prefixed with a storage placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_path: Option<String>,
    /// External URL the attachment points to (or was downloaded from).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_path: Option<String>,
    /// Whether the attachment is shown in part tables.
    #[serde(default)]
    pub show_in_table: bool,
}

impl Attachment {
    /// Placeholder prefix for files only accessible to logged-in users.
    pub const SECURE_PREFIX: &'static str = "%SECURE%";
    /// Placeholder prefix for files under the installation root.
    pub const BASE_PREFIX: &'static str = "%BASE%";
    /// Placeholder prefix for publicly served media files.
    pub const MEDIA_PREFIX: &'static str = "%MEDIA%";

    fn internal(&self) -> &str {
        self.internal_path.as_deref().unwrap_or_default()
    }

    fn external(&self) -> &str {
        self.external_path.as_deref().unwrap_or_default()
    }

    /// Whether the attachment's file is stored in the access-controlled area.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.internal().starts_with(Self::SECURE_PREFIX)
    }

    /// Whether the attachment points at an external URL.
    #[must_use]
    pub fn is_external(&self) -> bool {
        !self.external().is_empty()
    }

    /// Whether a user uploaded the file directly (stored under a placeholder
    /// prefix, with no known external source).
    #[must_use]
    pub fn is_user_uploaded(&self) -> bool {
        let internal = self.internal();
        let placeholder = [Self::BASE_PREFIX, Self::MEDIA_PREFIX, Self::SECURE_PREFIX]
            .iter()
            .any(|prefix| internal.starts_with(prefix));
        placeholder && self.external().is_empty()
    }

    /// Whether the file was downloaded from a known external source.
    #[must_use]
    pub fn is_downloaded(&self) -> bool {
        !self.internal().is_empty() && !self.external().is_empty()
    }
}

/// An electronic part tracked by the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Stable identifier, assigned at construction.
    pub id: PartId,
    /// Display name. Names are not unique; ids are.
    pub name: Name,
    /// Category the part belongs to. Every part has one.
    pub category: ElementId,
    /// Package footprint, if assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footprint: Option<ElementId>,
    /// Manufacturer, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<ElementId>,
    /// The manufacturer's own part number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_product_number: Option<String>,
    /// Provider the part was imported from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_reference: Option<ProviderReference>,
    /// Free-form tags.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub tags: BTreeSet<String>,
    /// Mass in grams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    /// Marked as favorite.
    #[serde(default)]
    pub favorite: bool,
    /// Data still needs review.
    #[serde(default)]
    pub needs_review: bool,
    /// Manufacturer-reported lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturing_status: Option<ManufacturingStatus>,
    /// Stocked lots.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lots: Vec<PartLot>,
    /// Supplier offers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_details: Vec<OrderDetail>,
    /// Attached files and links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    /// When the part was created.
    pub created: DateTime<Utc>,
}

impl Part {
    /// Constructs a new part with a fresh id.
    #[must_use]
    pub fn new(name: Name, category: ElementId) -> Self {
        Self::new_with_id(PartId::new(), name, category)
    }

    /// Constructs a part with a caller-chosen id.
    ///
    /// Used by fixtures and tests that need deterministic identifiers.
    #[must_use]
    pub fn new_with_id(id: PartId, name: Name, category: ElementId) -> Self {
        Self {
            id,
            name,
            category,
            footprint: None,
            manufacturer: None,
            manufacturer_product_number: None,
            provider_reference: None,
            tags: BTreeSet::new(),
            mass: None,
            favorite: false,
            needs_review: false,
            manufacturing_status: None,
            lots: Vec::new(),
            order_details: Vec::new(),
            attachments: Vec::new(),
            created: Utc::now(),
        }
    }

    /// Returns the lot with the given id, if this part owns it.
    #[must_use]
    pub fn lot(&self, id: LotId) -> Option<&PartLot> {
        self.lots.iter().find(|lot| lot.id == id)
    }

    /// Total stocked amount across all lots.
    #[must_use]
    pub fn total_amount(&self) -> f64 {
        self.lots.iter().map(|lot| lot.amount).sum()
    }

    /// Whether the part's provider id matches, ignoring case.
    #[must_use]
    pub fn matches_provider_id(&self, candidate: &str) -> bool {
        self.provider_reference
            .as_ref()
            .is_some_and(|reference| reference.provider_id.eq_ignore_ascii_case(candidate))
    }

    /// Whether the manufacturer product number matches, ignoring case.
    #[must_use]
    pub fn matches_manufacturer_number(&self, candidate: &str) -> bool {
        self.manufacturer_product_number
            .as_deref()
            .is_some_and(|mpn| mpn.eq_ignore_ascii_case(candidate))
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    fn name(s: &str) -> Name {
        Name::new(s).unwrap()
    }

    fn attachment(internal: Option<&str>, external: Option<&str>) -> Attachment {
        Attachment {
            name: name("doc"),
            internal_path: internal.map(str::to_string),
            external_path: external.map(str::to_string),
            show_in_table: false,
        }
    }

    #[test_case(Some("%SECURE%/x.pdf"), None, true; "secure prefix")]
    #[test_case(Some("%MEDIA%/x.pdf"), None, false; "media prefix is not secure")]
    #[test_case(None, Some("https://example.com"), false; "external only")]
    fn secure_classification(internal: Option<&str>, external: Option<&str>, expected: bool) {
        assert_eq!(attachment(internal, external).is_secure(), expected);
    }

    #[test_case(Some("%MEDIA%/x.pdf"), None, true; "media upload")]
    #[test_case(Some("%BASE%/x.pdf"), None, true; "base upload")]
    #[test_case(Some("%SECURE%/x.pdf"), None, true; "secure upload")]
    #[test_case(Some("%MEDIA%/x.pdf"), Some("https://example.com"), false; "known source is a download")]
    #[test_case(None, None, false; "no file at all")]
    fn user_uploaded_classification(
        internal: Option<&str>,
        external: Option<&str>,
        expected: bool,
    ) {
        assert_eq!(attachment(internal, external).is_user_uploaded(), expected);
    }

    #[test]
    fn downloaded_requires_both_paths() {
        assert!(attachment(Some("%MEDIA%/x.pdf"), Some("https://example.com")).is_downloaded());
        assert!(!attachment(Some("%MEDIA%/x.pdf"), None).is_downloaded());
        assert!(!attachment(None, Some("https://example.com")).is_downloaded());
    }

    #[test]
    fn lot_lookup_by_id() {
        let mut part = Part::new(name("BC547"), ElementId::new());
        let lot = PartLot::new(25.0);
        let lot_id = lot.id;
        part.lots.push(lot);
        part.lots.push(PartLot::new(100.0));

        assert_eq!(part.lot(lot_id).unwrap().amount, 25.0);
        assert!(part.lot(LotId::new()).is_none());
        assert_eq!(part.total_amount(), 125.0);
    }

    #[test]
    fn provider_id_matching_ignores_case() {
        let mut part = Part::new(name("BC547"), ElementId::new());
        part.provider_reference = Some(ProviderReference {
            provider: "Digi-Key".to_string(),
            provider_id: "BC547BTA-ND".to_string(),
        });

        assert!(part.matches_provider_id("bc547bta-nd"));
        assert!(!part.matches_provider_id("bc547"));

        let bare = Part::new(name("BC548"), ElementId::new());
        assert!(!bare.matches_provider_id("bc547bta-nd"));
    }

    #[test]
    fn manufacturer_number_matching_ignores_case() {
        let mut part = Part::new(name("BC547"), ElementId::new());
        part.manufacturer_product_number = Some("BC547B".to_string());

        assert!(part.matches_manufacturer_number("bc547b"));
        assert!(!part.matches_manufacturer_number("BC547"));
    }

    #[test]
    fn part_serde_round_trip() {
        let mut part = Part::new(name("Part 2"), ElementId::new());
        part.tags = ["test".to_string(), "Part2".to_string()].into();
        part.mass = Some(100.2);
        part.needs_review = true;
        part.manufacturing_status = Some(ManufacturingStatus::Active);
        part.lots.push(PartLot::new(1.0));
        part.order_details.push(OrderDetail {
            supplier: ElementId::new(),
            supplier_part_number: Some("BC 547".to_string()),
            obsolete: true,
            prices: vec![PriceDetail {
                price_related_quantity: 1.0,
                price: 10.0,
            }],
        });

        let yaml = serde_yaml::to_string(&part).unwrap();
        let back: Part = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(part, back);
    }
}
