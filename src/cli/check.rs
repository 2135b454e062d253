use std::{path::PathBuf, process};

use clap::Parser;
use stockroom::{
    ElementId, ElementKind, ElementStore as _, InventoryStore, PartStore as _, Warehouse,
    domain::tree,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Check referential integrity across the inventory")]
pub struct Check {
    /// Types of checks to run (can be specified multiple times)
    #[arg(long, value_name = "TYPE")]
    check: Vec<CheckType>,

    /// Output format (table, json, summary)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum, PartialEq, Eq)]
enum CheckType {
    /// Parent references exist and stay within their hierarchy
    Parents,
    /// Hierarchies are free of reference cycles
    Cycles,
    /// Part references point at elements of the right kind
    Parts,
    /// Run all checks
    All,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Summary,
}

#[derive(Debug, Default)]
struct CheckResult {
    parent_issues: Vec<String>,
    cycle_issues: Vec<String>,
    part_issues: Vec<String>,
}

impl CheckResult {
    fn total(&self) -> usize {
        self.parent_issues.len() + self.cycle_issues.len() + self.part_issues.len()
    }
}

impl Check {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let warehouse = Warehouse::open(&root)?;
        let store = warehouse.store();

        let checks = if self.check.is_empty() || self.check.contains(&CheckType::All) {
            vec![CheckType::Parents, CheckType::Cycles, CheckType::Parts]
        } else {
            self.check.clone()
        };

        let mut result = CheckResult::default();
        for check in &checks {
            match check {
                CheckType::Parents => check_parents(store, &mut result),
                CheckType::Cycles => check_cycles(store, &mut result),
                CheckType::Parts => check_parts(store, &mut result),
                CheckType::All => unreachable!("All should have been expanded"),
            }
        }

        match self.output {
            OutputFormat::Table => output_table(&result),
            OutputFormat::Json => output_json(&result)?,
            OutputFormat::Summary => println!("issues={}", result.total()),
        }

        if result.total() > 0 {
            process::exit(2);
        }

        Ok(())
    }
}

fn check_parents(store: &InventoryStore, result: &mut CheckResult) {
    for kind in ElementKind::ALL {
        for element in store.all_of_kind(kind) {
            let Some(parent) = element.parent else {
                continue;
            };
            match store.element(parent) {
                None => result.parent_issues.push(format!(
                    "{} '{}': parent {parent} does not exist",
                    kind.label(),
                    element.name
                )),
                Some(found) if found.kind != kind => result.parent_issues.push(format!(
                    "{} '{}': parent {parent} is a {}",
                    kind.label(),
                    element.name,
                    found.kind.label()
                )),
                Some(_) => {}
            }
        }
    }
}

fn check_cycles(store: &InventoryStore, result: &mut CheckResult) {
    for kind in ElementKind::ALL {
        for cycle in tree::find_cycles(store, kind) {
            let members: Vec<String> = cycle.iter().map(ToString::to_string).collect();
            result
                .cycle_issues
                .push(format!("{}: {}", kind.label(), members.join(" -> ")));
        }
    }
}

fn check_parts(store: &InventoryStore, result: &mut CheckResult) {
    for part in store.all_parts() {
        let name = part.name.as_str();
        check_reference(
            store,
            name,
            "category",
            Some(part.category),
            ElementKind::Category,
            result,
        );
        check_reference(
            store,
            name,
            "footprint",
            part.footprint,
            ElementKind::Footprint,
            result,
        );
        check_reference(
            store,
            name,
            "manufacturer",
            part.manufacturer,
            ElementKind::Manufacturer,
            result,
        );
        for lot in &part.lots {
            check_reference(
                store,
                name,
                "lot location",
                lot.storage_location,
                ElementKind::StorageLocation,
                result,
            );
        }
        for order in &part.order_details {
            check_reference(
                store,
                name,
                "supplier",
                Some(order.supplier),
                ElementKind::Supplier,
                result,
            );
        }
    }
}

fn check_reference(
    store: &InventoryStore,
    part_name: &str,
    role: &str,
    id: Option<ElementId>,
    kind: ElementKind,
    result: &mut CheckResult,
) {
    let Some(id) = id else {
        return;
    };
    match store.element(id) {
        None => result
            .part_issues
            .push(format!("part '{part_name}': {role} {id} does not exist")),
        Some(found) if found.kind != kind => result.part_issues.push(format!(
            "part '{part_name}': {role} {id} is a {}",
            found.kind.label()
        )),
        Some(_) => {}
    }
}

fn output_table(result: &CheckResult) {
    print_section("Parents", &result.parent_issues, "All parent references valid");
    print_section("Cycles", &result.cycle_issues, "All hierarchies acyclic");
    print_section("Parts", &result.part_issues, "All part references valid");

    let total = result.total();
    if total == 0 {
        println!("\n{}", "Inventory is consistent (0 issues)".success());
    } else {
        println!("\n{}", format!("Summary: {total} issues found").warning());
    }
}

fn print_section(label: &str, issues: &[String], healthy: &str) {
    if issues.is_empty() {
        println!("✓ {label}:  {healthy}");
    } else {
        println!(
            "{}",
            format!("✗ {label}:  {} issues found", issues.len()).warning()
        );
        for issue in issues {
            println!("  - {issue}");
        }
    }
}

fn output_json(result: &CheckResult) -> anyhow::Result<()> {
    use serde_json::json;

    let output = json!({
        "status": if result.total() == 0 { "consistent" } else { "issues_found" },
        "issues": {
            "parents": result.parent_issues,
            "cycles": result.cycle_issues,
            "parts": result.part_issues,
        },
        "summary": {
            "total_issues": result.total(),
        }
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
