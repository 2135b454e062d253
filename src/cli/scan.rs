use std::{path::PathBuf, process};

use clap::Parser;
use stockroom::{
    Warehouse,
    domain::{
        redirect::{BarcodeRedirector, SiteUrls},
        scan::{ScanResult, VendorScan, parse_payload},
    },
};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Turn a barcode payload into a navigation URL")]
pub struct Scan {
    /// Raw payload, e.g. "part/<uuid>" or a Data-Matrix transfer
    payload: Option<String>,

    /// Vendor name for a manually entered vendor label
    #[arg(long, conflicts_with = "payload")]
    vendor: Option<String>,

    /// Vendor part number (P field)
    #[arg(long, value_name = "NUMBER", requires = "vendor")]
    vpn: Option<String>,

    /// Manufacturer part number (1P field)
    #[arg(long, value_name = "NUMBER", requires = "vendor")]
    mpn: Option<String>,

    /// Production date code (9D field)
    #[arg(long, value_name = "CODE", requires = "vendor")]
    date_code: Option<String>,

    /// Packaged quantity (Q field)
    #[arg(long, value_name = "COUNT", requires = "vendor")]
    qty: Option<u32>,
}

impl Scan {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let warehouse = Warehouse::open(&root)?;

        let scan = match (&self.payload, &self.vendor) {
            (Some(payload), _) => match parse_payload(payload) {
                Ok(scan) => scan,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(2);
                }
            },
            (None, Some(vendor)) => ScanResult::Vendor(VendorScan {
                vendor: vendor.clone(),
                manufacturer_part_number: self.mpn.clone(),
                vendor_part_number: self.vpn.clone(),
                date_code: self.date_code.clone(),
                quantity: self.qty,
            }),
            (None, None) => anyhow::bail!("provide a payload or --vendor"),
        };
        tracing::debug!(?scan, "decoded scan");

        let urls = SiteUrls::new(warehouse.config().base_url());
        let redirector = BarcodeRedirector::new(warehouse.store(), &urls);

        match redirector.redirect(&scan) {
            Ok(url) => println!("{url}"),
            Err(e) => {
                eprintln!("{e}");
                process::exit(2);
            }
        }

        Ok(())
    }
}
