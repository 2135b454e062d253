//! Scan-to-URL dispatch.
//!
//! [`BarcodeRedirector`] turns a decoded scan into the URL the scanning
//! device should open. Part and location labels link straight through
//! without touching the store; lot labels resolve to the owning part;
//! vendor labels search the parts by provider id, then by manufacturer
//! number.

use thiserror::Error;

use crate::{
    domain::{
        ElementId, ElementKind, LotId, PartId,
        scan::{LocalScan, ScanResult, VendorScan},
    },
    storage::PartStore,
};

/// Produces navigation URLs for inventory entities.
pub trait UrlGenerator {
    /// URL of a part's detail view.
    fn part_show(&self, part: PartId) -> String;

    /// URL of the part listing filtered to one element.
    fn part_list(&self, kind: ElementKind, element: ElementId) -> String;
}

/// [`UrlGenerator`] for the standard site layout: `{base}/parts/{id}` and
/// `{base}/{kind}/{id}/parts`.
#[derive(Debug, Clone)]
pub struct SiteUrls {
    base_url: String,
}

impl SiteUrls {
    /// Creates a generator rooted at `base_url`. Trailing slashes are
    /// dropped so joined paths stay canonical.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

impl UrlGenerator for SiteUrls {
    fn part_show(&self, part: PartId) -> String {
        format!("{}/parts/{part}", self.base_url)
    }

    fn part_list(&self, kind: ElementKind, element: ElementId) -> String {
        format!("{}/{}/{element}/parts", self.base_url, kind.plural())
    }
}

/// A scan that cannot be redirected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RedirectError {
    /// A lot label referenced a lot no part owns.
    #[error("no part owns a lot with id {0}")]
    LotNotFound(LotId),

    /// A vendor label matched no part by provider id or manufacturer
    /// number.
    #[error("no part matches the vendor label from '{vendor}'")]
    NoVendorMatch {
        /// Vendor named on the label.
        vendor: String,
    },
}

/// Maps decoded scans to navigation URLs over a part store.
#[derive(Debug)]
pub struct BarcodeRedirector<'a, S, U> {
    parts: &'a S,
    urls: &'a U,
}

impl<'a, S: PartStore, U: UrlGenerator> BarcodeRedirector<'a, S, U> {
    /// Creates a redirector over the given store and URL scheme.
    pub const fn new(parts: &'a S, urls: &'a U) -> Self {
        Self { parts, urls }
    }

    /// The URL a scanner should open for this scan.
    ///
    /// # Errors
    ///
    /// Returns [`RedirectError::LotNotFound`] for a lot label whose lot
    /// does not exist, and [`RedirectError::NoVendorMatch`] for a vendor
    /// label no part matches.
    pub fn redirect(&self, scan: &ScanResult) -> Result<String, RedirectError> {
        match scan {
            ScanResult::Local(local) => self.redirect_local(*local),
            ScanResult::Vendor(vendor) => self.redirect_vendor(vendor),
        }
    }

    // Part and location labels are printed from known entities, so they
    // link directly; a dangling id is the site's 404 to report.
    fn redirect_local(&self, scan: LocalScan) -> Result<String, RedirectError> {
        match scan {
            LocalScan::Part(id) => Ok(self.urls.part_show(id)),
            LocalScan::StorageLocation(id) => {
                Ok(self.urls.part_list(ElementKind::StorageLocation, id))
            }
            LocalScan::PartLot(id) => {
                let (part, _) = self
                    .parts
                    .lot(id)
                    .ok_or(RedirectError::LotNotFound(id))?;
                Ok(self.urls.part_show(part.id))
            }
        }
    }

    fn redirect_vendor(&self, scan: &VendorScan) -> Result<String, RedirectError> {
        if let Some(vpn) = scan.vendor_part_number.as_deref() {
            if let Some(part) = self.parts.part_by_provider_id(vpn) {
                return Ok(self.urls.part_show(part.id));
            }
        }

        if let Some(mpn) = scan.manufacturer_part_number.as_deref() {
            if let Some(part) = self.parts.part_by_manufacturer_number(mpn) {
                return Ok(self.urls.part_show(part.id));
            }
        }

        Err(RedirectError::NoVendorMatch {
            vendor: scan.vendor.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::{
        domain::{Name, Part, PartLot, ProviderReference},
        storage::{InventoryStore, PartStore as _},
    };

    fn part_id(n: u128) -> PartId {
        Uuid::from_u128(n).into()
    }

    fn lot_id(n: u128) -> LotId {
        Uuid::from_u128(n).into()
    }

    fn category() -> ElementId {
        Uuid::from_u128(100).into()
    }

    fn urls() -> SiteUrls {
        SiteUrls::new("https://inventory.example.com")
    }

    fn store_with_lot() -> InventoryStore {
        let mut part = Part::new_with_id(part_id(42), Name::new("BC547").unwrap(), category());
        let mut lot = PartLot::new(25.0);
        lot.id = lot_id(7);
        part.lots.push(lot);

        let mut store = InventoryStore::default();
        store.save_part(part);
        store
    }

    #[test]
    fn part_labels_link_straight_to_the_part_view() {
        let store = InventoryStore::default();
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let url = redirector
            .redirect(&ScanResult::Local(LocalScan::Part(part_id(42))))
            .unwrap();

        assert_eq!(
            url,
            format!("https://inventory.example.com/parts/{}", part_id(42))
        );
    }

    #[test]
    fn location_labels_link_to_the_filtered_part_list() {
        let store = InventoryStore::default();
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let location: ElementId = Uuid::from_u128(9).into();
        let url = redirector
            .redirect(&ScanResult::Local(LocalScan::StorageLocation(location)))
            .unwrap();

        assert_eq!(
            url,
            format!("https://inventory.example.com/locations/{location}/parts")
        );
    }

    #[test]
    fn lot_labels_resolve_to_the_owning_part() {
        let store = store_with_lot();
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let url = redirector
            .redirect(&ScanResult::Local(LocalScan::PartLot(lot_id(7))))
            .unwrap();

        assert_eq!(
            url,
            format!("https://inventory.example.com/parts/{}", part_id(42))
        );
    }

    #[test]
    fn unknown_lot_is_an_error() {
        let store = store_with_lot();
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let err = redirector
            .redirect(&ScanResult::Local(LocalScan::PartLot(lot_id(99))))
            .unwrap_err();

        assert_eq!(err, RedirectError::LotNotFound(lot_id(99)));
    }

    #[test]
    fn vendor_labels_match_the_provider_id_first() {
        let mut by_provider =
            Part::new_with_id(part_id(1), Name::new("R-0402-10k").unwrap(), category());
        by_provider.provider_reference = Some(ProviderReference {
            provider: "Digi-Key".to_string(),
            provider_id: "296-1234-1-ND".to_string(),
        });

        let mut by_mpn = Part::new_with_id(part_id(2), Name::new("BC547").unwrap(), category());
        by_mpn.manufacturer_product_number = Some("296-1234-1-ND".to_string());

        let mut store = InventoryStore::default();
        store.save_part(by_provider);
        store.save_part(by_mpn);
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let scan = ScanResult::Vendor(VendorScan {
            vendor: "Digi-Key".to_string(),
            manufacturer_part_number: None,
            vendor_part_number: Some("296-1234-1-nd".to_string()),
            date_code: None,
            quantity: None,
        });

        let url = redirector.redirect(&scan).unwrap();
        assert_eq!(
            url,
            format!("https://inventory.example.com/parts/{}", part_id(1))
        );
    }

    #[test]
    fn vendor_labels_fall_back_to_the_manufacturer_number() {
        let mut part = Part::new_with_id(part_id(3), Name::new("BC547").unwrap(), category());
        part.manufacturer_product_number = Some("BC547B".to_string());

        let mut store = InventoryStore::default();
        store.save_part(part);
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let scan = ScanResult::Vendor(VendorScan {
            vendor: "Mouser".to_string(),
            manufacturer_part_number: Some("bc547b".to_string()),
            vendor_part_number: Some("512-BC547B".to_string()),
            date_code: None,
            quantity: None,
        });

        let url = redirector.redirect(&scan).unwrap();
        assert_eq!(
            url,
            format!("https://inventory.example.com/parts/{}", part_id(3))
        );
    }

    #[test]
    fn unmatched_vendor_label_is_an_error() {
        let store = InventoryStore::default();
        let urls = urls();
        let redirector = BarcodeRedirector::new(&store, &urls);

        let scan = ScanResult::Vendor(VendorScan {
            vendor: "Mouser".to_string(),
            manufacturer_part_number: Some("unknown-mpn".to_string()),
            vendor_part_number: None,
            date_code: None,
            quantity: None,
        });

        let err = redirector.redirect(&scan).unwrap_err();
        assert_eq!(
            err,
            RedirectError::NoVendorMatch {
                vendor: "Mouser".to_string()
            }
        );
    }

    #[test]
    fn trailing_slash_in_the_base_url_is_ignored() {
        let urls = SiteUrls::new("https://inventory.example.com/");
        assert_eq!(
            urls.part_show(part_id(42)),
            format!("https://inventory.example.com/parts/{}", part_id(42))
        );
    }
}
