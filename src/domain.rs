//! Domain models for the parts inventory.
//!
//! This module contains the structural element hierarchies, the parts with
//! their stock lots, and the pure logic over them: path resolution, tree
//! materialization, barcode decoding and redirect dispatch.

/// Structural elements and the hierarchy kinds.
pub mod element;
pub use element::{ElementId, ElementKind, StructuralElement, UnknownKindError};

mod name;
pub use name::{InvalidNameError, Name};

mod natsort;
pub use natsort::{NameOrdering, natural_cmp};

/// Parts, stock lots, supplier offers and attachments.
pub mod part;
pub use part::{
    Attachment, LotId, ManufacturingStatus, OrderDetail, Part, PartId, PartLot, PriceDetail,
    ProviderReference,
};

mod config;
pub use config::Config;

/// Decoded barcode and QR payloads.
pub mod scan;
pub use scan::{LocalScan, ScanParseError, ScanResult, VendorScan, parse_payload};

/// Path resolution over the hierarchies.
pub mod resolver;
pub use resolver::{NewElementCache, PathResolver, ResolveOptions};

/// Tree views over the hierarchies.
pub mod tree;
pub use tree::{ConsistencyError, TreeNode};

/// Scan-to-URL dispatch.
pub mod redirect;
pub use redirect::{BarcodeRedirector, RedirectError, SiteUrls, UrlGenerator};
