use std::{collections::HashSet, path::PathBuf, process};

use clap::Parser;
use stockroom::{
    ElementKind, ElementStore as _, Warehouse,
    domain::{PathResolver, ResolveOptions},
    storage::CaseMatch,
};
use tracing::instrument;

use super::{parse_kind, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Resolve a delimited path to a chain of elements")]
pub struct Resolve {
    /// Hierarchy to resolve against (category, footprint, location,
    /// manufacturer, supplier)
    #[arg(value_parser = parse_kind)]
    kind: ElementKind,

    /// The path, e.g. "Passives->Resistors->SMD"
    path: String,

    /// Create missing elements along the path
    #[arg(long)]
    create: bool,

    /// Single-name lookup: case-folded, alternative names included, any
    /// parent
    #[arg(long, conflicts_with_all = ["ignore_case", "alt_names", "delimiter"])]
    lax: bool,

    /// Case-insensitive name matching
    #[arg(long)]
    ignore_case: bool,

    /// Also match alternative names
    #[arg(long)]
    alt_names: bool,

    /// Path delimiter (defaults to the configured one)
    #[arg(long, value_name = "DELIMITER")]
    delimiter: Option<String>,

    /// Print only the id of the last resolved element
    #[arg(long, short)]
    quiet: bool,
}

impl Resolve {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut warehouse = Warehouse::open(&root)?;

        let options = ResolveOptions {
            delimiter: self
                .delimiter
                .clone()
                .unwrap_or_else(|| warehouse.config().delimiter().to_string()),
            case: if self.ignore_case {
                CaseMatch::Folded
            } else {
                CaseMatch::Sensitive
            },
            allow_alternative_names: self.alt_names,
            allow_creation: self.create,
        };

        let (chain, created) = {
            let mut resolver = PathResolver::new(warehouse.store(), self.kind);
            let chain = if self.lax {
                resolver
                    .resolve_single_lax(&self.path, self.create)
                    .map_or_else(Vec::new, |element| vec![element])
            } else {
                resolver.resolve_path(&self.path, &options)
            };
            (chain, resolver.into_created())
        };

        if chain.is_empty() {
            eprintln!("No {} matches '{}'", self.kind.label(), self.path);
            process::exit(2);
        }

        let created_ids: HashSet<_> = created.iter().map(|element| element.id).collect();
        if !created.is_empty() {
            let count = created.len();
            for element in created {
                warehouse.save_element(element);
            }
            let report = warehouse.flush()?;
            tracing::debug!(created = count, written = report.total(), "persisted new elements");
        }

        if self.quiet {
            let last = chain.last().expect("chain is non-empty");
            println!("{}", last.id);
            return Ok(());
        }

        for (depth, element) in chain.iter().enumerate() {
            let indent = "  ".repeat(depth);
            let id = format!("[{}]", element.id);
            if created_ids.contains(&element.id) {
                println!("{indent}{} {} {}", element.name, id.dim(), "(new)".success());
            } else {
                println!("{indent}{} {}", element.name, id.dim());
            }
        }

        Ok(())
    }
}
