//! Decoded barcode and QR payloads.
//!
//! A scan is either a local reference (a label printed by this system,
//! pointing at a part, lot or storage location) or a vendor label in the
//! Data-Matrix field format distributors print on bags and reels.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ElementId, LotId, PartId};

/// A local label reference: target type and identifier, fused so an invalid
/// combination cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "id", rename_all = "snake_case")]
pub enum LocalScan {
    /// A part label.
    Part(PartId),
    /// A stock lot label.
    PartLot(LotId),
    /// A storage location label.
    StorageLocation(ElementId),
}

/// Part identifiers decoded from a vendor's Data-Matrix label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorScan {
    /// Name of the vendor, `"unknown"` when the label carried none.
    pub vendor: String,
    /// Manufacturer part number (`1P` field).
    pub manufacturer_part_number: Option<String>,
    /// The vendor's own part number (`P` field).
    pub vendor_part_number: Option<String>,
    /// Production date code (`9D` field).
    pub date_code: Option<String>,
    /// Packaged quantity (`Q` field).
    pub quantity: Option<u32>,
}

/// A decoded scan payload. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanResult {
    /// A reference to an entity in this inventory.
    Local(LocalScan),
    /// A vendor label.
    Vendor(VendorScan),
}

/// Errors from decoding a scan payload.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScanParseError {
    /// The payload matches no supported format.
    #[error("scan payload '{0}' is not in a recognized format")]
    UnrecognisedPayload(String),

    /// A local payload named a target type this system cannot redirect.
    #[error("unknown scan target '{0}'")]
    UnknownTarget(String),
}

/// Local payloads: `part/<uuid>`, optionally wrapped in a scan URL.
static LOCAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:https?://\S+/scan/)?([a-z_]+)/([0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12})$",
    )
    .expect("pattern is valid")
});

/// ASCII Group Separator, the field delimiter of Data-Matrix labels.
const GS: char = '\u{1d}';
/// Label envelope: `[)>` + Record Separator + format `06`.
const ENVELOPE: &str = "[)>\u{1e}06";

/// Decodes a raw payload string into a [`ScanResult`].
///
/// Vendor labels are recognized by their envelope or embedded group
/// separators; everything else is treated as a local payload.
///
/// # Errors
///
/// Returns [`ScanParseError::UnknownTarget`] for a local payload with an
/// unsupported target word, and [`ScanParseError::UnrecognisedPayload`] when
/// the payload matches no format at all.
pub fn parse_payload(payload: &str) -> Result<ScanResult, ScanParseError> {
    if payload.starts_with(ENVELOPE) || payload.contains(GS) {
        return parse_vendor(payload).map(ScanResult::Vendor);
    }
    parse_local(payload.trim()).map(ScanResult::Local)
}

fn parse_local(payload: &str) -> Result<LocalScan, ScanParseError> {
    let captures = LOCAL_PATTERN
        .captures(payload)
        .ok_or_else(|| ScanParseError::UnrecognisedPayload(payload.to_string()))?;

    let target = captures[1].to_lowercase();
    let id = Uuid::parse_str(&captures[2])
        .map_err(|_| ScanParseError::UnrecognisedPayload(payload.to_string()))?;

    match target.as_str() {
        "part" => Ok(LocalScan::Part(id.into())),
        "lot" | "part_lot" => Ok(LocalScan::PartLot(id.into())),
        "location" | "storelocation" => Ok(LocalScan::StorageLocation(id.into())),
        _ => Err(ScanParseError::UnknownTarget(target)),
    }
}

fn parse_vendor(payload: &str) -> Result<VendorScan, ScanParseError> {
    let body = payload.strip_prefix(ENVELOPE).unwrap_or(payload);

    let mut vendor: Option<String> = None;
    let mut manufacturer_part_number = None;
    let mut vendor_part_number = None;
    let mut date_code = None;
    let mut quantity = None;

    for raw in body.split(GS) {
        let field = raw.trim_matches(|c: char| matches!(c, '\u{1e}' | '\u{4}') || c.is_whitespace());
        if field.is_empty() {
            continue;
        }

        // Two-character data identifiers shadow single-character ones, so
        // they are checked first.
        if let Some(rest) = field.strip_prefix("1P") {
            manufacturer_part_number = Some(rest.to_string());
        } else if let Some(rest) = field.strip_prefix("1V") {
            vendor = Some(rest.to_string());
        } else if let Some(rest) = field.strip_prefix("9D") {
            date_code = Some(rest.to_string());
        } else if let Some(rest) = field.strip_prefix('P') {
            vendor_part_number = Some(rest.to_string());
        } else if let Some(rest) = field.strip_prefix('V') {
            if vendor.is_none() {
                vendor = Some(rest.to_string());
            }
        } else if let Some(rest) = field.strip_prefix('Q') {
            quantity = rest.parse().ok();
            if quantity.is_none() {
                tracing::debug!(field, "unparseable quantity field in vendor label");
            }
        } else {
            tracing::debug!(field, "ignoring unrecognized vendor label field");
        }
    }

    if manufacturer_part_number.is_none() && vendor_part_number.is_none() && vendor.is_none() {
        return Err(ScanParseError::UnrecognisedPayload(payload.to_string()));
    }

    Ok(VendorScan {
        vendor: vendor.unwrap_or_else(|| "unknown".to_string()),
        manufacturer_part_number,
        vendor_part_number,
        date_code,
        quantity,
    })
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const ID: &str = "b9f8aa3e-5a6d-44bb-9a93-bd2f0ca0a712";

    #[test]
    fn local_part_payload() {
        let scan = parse_payload(&format!("part/{ID}")).unwrap();
        assert_eq!(
            scan,
            ScanResult::Local(LocalScan::Part(ID.parse::<Uuid>().unwrap().into()))
        );
    }

    #[test]
    fn local_payload_wrapped_in_scan_url() {
        let scan = parse_payload(&format!("https://inventory.example.com/scan/lot/{ID}")).unwrap();
        assert!(matches!(scan, ScanResult::Local(LocalScan::PartLot(_))));
    }

    #[test_case("location"; "short form")]
    #[test_case("storelocation"; "long form")]
    fn local_location_payload(target: &str) {
        let scan = parse_payload(&format!("{target}/{ID}")).unwrap();
        assert!(matches!(
            scan,
            ScanResult::Local(LocalScan::StorageLocation(_))
        ));
    }

    #[test]
    fn local_target_is_case_insensitive() {
        let scan = parse_payload(&format!("PART/{}", ID.to_uppercase())).unwrap();
        assert!(matches!(scan, ScanResult::Local(LocalScan::Part(_))));
    }

    #[test]
    fn unknown_local_target_is_rejected() {
        let error = parse_payload(&format!("user/{ID}")).unwrap_err();
        assert_eq!(error, ScanParseError::UnknownTarget("user".to_string()));
    }

    #[test_case(""; "empty")]
    #[test_case("part/12345"; "malformed id")]
    #[test_case("hello world"; "free text")]
    fn unrecognised_local_payloads(payload: &str) {
        assert!(matches!(
            parse_payload(payload),
            Err(ScanParseError::UnrecognisedPayload(_))
        ));
    }

    #[test]
    fn vendor_label_with_envelope() {
        let payload =
            "[)>\u{1e}06\u{1d}1PBC547B\u{1d}PBC547BTA-ND\u{1d}Q100\u{1d}9D2336\u{1d}1VFairchild\u{1d}4LCN\u{1e}\u{4}";
        let ScanResult::Vendor(scan) = parse_payload(payload).unwrap() else {
            panic!("expected a vendor scan");
        };

        assert_eq!(scan.vendor, "Fairchild");
        assert_eq!(scan.manufacturer_part_number.as_deref(), Some("BC547B"));
        assert_eq!(scan.vendor_part_number.as_deref(), Some("BC547BTA-ND"));
        assert_eq!(scan.date_code.as_deref(), Some("2336"));
        assert_eq!(scan.quantity, Some(100));
    }

    #[test]
    fn vendor_label_without_envelope() {
        let ScanResult::Vendor(scan) = parse_payload("PX-123\u{1d}VMouser").unwrap() else {
            panic!("expected a vendor scan");
        };
        assert_eq!(scan.vendor, "Mouser");
        assert_eq!(scan.vendor_part_number.as_deref(), Some("X-123"));
    }

    #[test]
    fn single_v_does_not_override_1v() {
        let ScanResult::Vendor(scan) =
            parse_payload("1VDigi-Key\u{1d}VSomeoneElse\u{1d}P42").unwrap()
        else {
            panic!("expected a vendor scan");
        };
        assert_eq!(scan.vendor, "Digi-Key");
    }

    #[test]
    fn missing_vendor_falls_back_to_unknown() {
        let ScanResult::Vendor(scan) = parse_payload("1PBC547B\u{1d}Q50").unwrap() else {
            panic!("expected a vendor scan");
        };
        assert_eq!(scan.vendor, "unknown");
        assert_eq!(scan.quantity, Some(50));
    }

    #[test]
    fn unparseable_quantity_is_dropped() {
        let ScanResult::Vendor(scan) = parse_payload("1PBC547B\u{1d}Qmany").unwrap() else {
            panic!("expected a vendor scan");
        };
        assert_eq!(scan.quantity, None);
    }

    #[test]
    fn vendor_label_with_no_recognized_fields_is_rejected() {
        let error = parse_payload("4LCN\u{1d}1TLOT99").unwrap_err();
        assert!(matches!(error, ScanParseError::UnrecognisedPayload(_)));
    }
}
