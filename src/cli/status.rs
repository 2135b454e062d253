use std::{collections::BTreeMap, path::PathBuf, process};

use clap::Parser;
use stockroom::{
    ElementKind, ElementStore as _, PartStore as _, Warehouse, domain::tree,
    storage::AttachmentStats,
};
use tracing::instrument;

use super::terminal::{Colorize, is_narrow};

#[derive(Debug, Parser, Default)]
#[command(about = "Show element counts, part totals and hierarchy health")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Clone, Copy)]
struct Totals {
    elements: usize,
    parts: usize,
    lots: usize,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let warehouse = Warehouse::open(&root)?;
        let store = warehouse.store();

        let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut cycles: Vec<(ElementKind, Vec<String>)> = Vec::new();
        for kind in ElementKind::ALL {
            counts.insert(kind.label(), store.all_of_kind(kind).len());
            for cycle in tree::find_cycles(store, kind) {
                cycles.push((kind, cycle.iter().map(ToString::to_string).collect()));
            }
        }

        let element_total: usize = counts.values().sum();
        let part_total = store.part_count();
        let lot_total: usize = store
            .all_parts()
            .iter()
            .map(|part| part.lots.len())
            .sum();
        let attachments = AttachmentStats::collect(store);

        if element_total == 0 && part_total == 0 {
            println!("Empty inventory. Load the demonstration data with 'inv seed'.");
            return Ok(());
        }

        let totals = Totals {
            elements: element_total,
            parts: part_total,
            lots: lot_total,
        };

        match self.output {
            OutputFormat::Json => {
                Self::output_json(&counts, totals, attachments, &cycles)?;
            }
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(totals, cycles.len());
                } else {
                    Self::output_table(&counts, totals, attachments, &cycles);
                }
            }
        }

        // Exit with a non-zero code when the hierarchies need attention.
        if !cycles.is_empty() {
            process::exit(2);
        }

        Ok(())
    }

    fn output_json(
        counts: &BTreeMap<&'static str, usize>,
        totals: Totals,
        attachments: AttachmentStats,
        cycles: &[(ElementKind, Vec<String>)],
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let kinds: Vec<_> = counts
            .iter()
            .map(|(kind, count)| json!({ "kind": kind, "count": count }))
            .collect();

        let cycle_groups: Vec<_> = cycles
            .iter()
            .map(|(kind, members)| json!({ "kind": kind.label(), "members": members }))
            .collect();

        let output = json!({
            "kinds": kinds,
            "elements": totals.elements,
            "parts": totals.parts,
            "lots": totals.lots,
            "attachments": attachments,
            "cycles": {
                "count": cycles.len(),
                "groups": cycle_groups,
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(totals: Totals, cycle_count: usize) {
        println!(
            "elements={} parts={} lots={} cycles={cycle_count}",
            totals.elements, totals.parts, totals.lots
        );
    }

    fn output_table(
        counts: &BTreeMap<&'static str, usize>,
        totals: Totals,
        attachments: AttachmentStats,
        cycles: &[(ElementKind, Vec<String>)],
    ) {
        const MAX_CYCLE_DISPLAY: usize = 5;
        let narrow = is_narrow();

        println!("Inventory counts");
        println!("{}", "────────────────".dim());

        if narrow {
            // Stacked output for narrow terminals
            for (kind, count) in counts {
                println!("{kind}: {count}");
            }
            println!("Elements: {}", totals.elements);
            println!("Parts: {} ({} lots)", totals.parts, totals.lots);
        } else {
            // Table layout
            println!("{:<14} Count", "Kind");
            for (kind, count) in counts {
                println!("{kind:<14} {count}");
            }
            println!("{:<14} {}", "Elements", totals.elements);
            println!("{:<14} {} ({} lots)", "Parts", totals.parts, totals.lots);
        }

        println!();

        println!(
            "Attachments: {} secure, {} external, {} user uploaded, {} downloaded",
            attachments.secure,
            attachments.external,
            attachments.user_uploaded,
            attachments.downloaded
        );

        println!();

        if cycles.is_empty() {
            println!("Cycles: {} ✅", "0".success());
        } else {
            println!("Cycles: {} ⚠️", cycles.len().warning());
            for (kind, members) in cycles.iter().take(MAX_CYCLE_DISPLAY) {
                println!("  - {}: {}", kind.label(), members.join(" -> "));
            }
            if cycles.len() > MAX_CYCLE_DISPLAY {
                println!(
                    "  - ... and {} more cycles",
                    cycles.len() - MAX_CYCLE_DISPLAY
                );
            }
            println!(
                "{}",
                "Run 'inv check' to list every broken reference.".dim()
            );
        }
    }
}
