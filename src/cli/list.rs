use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use regex::Regex;
use stockroom::{
    ElementId, ElementKind, ElementStore as _, Warehouse,
    domain::{NameOrdering, tree},
};
use tracing::instrument;

use super::parse_kind;

#[derive(Debug, Parser)]
#[command(about = "List the elements of one hierarchy")]
pub struct List {
    /// Hierarchy to list (category, footprint, location, manufacturer,
    /// supplier)
    #[arg(value_parser = parse_kind)]
    kind: ElementKind,

    /// Only elements whose name matches this regular expression
    #[arg(long, value_name = "PATTERN")]
    filter: Option<String>,

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

#[derive(Debug)]
struct Row {
    name: String,
    alternative_names: Vec<String>,
    path: String,
    id: ElementId,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let warehouse = Warehouse::open(&root)?;
        let store = warehouse.store();
        let delimiter = warehouse.config().delimiter();

        let filter = match &self.filter {
            Some(pattern) => Some(
                Regex::new(pattern)
                    .with_context(|| format!("invalid filter pattern '{pattern}'"))?,
            ),
            None => None,
        };

        // Depth-first order keeps every element under its ancestors.
        let elements = tree::flatten(store, self.kind, None, NameOrdering::Ascending)?;

        let mut rows = Vec::new();
        for element in elements {
            if let Some(pattern) = &filter {
                if !pattern.is_match(element.name.as_str()) {
                    continue;
                }
            }
            rows.push(Row {
                name: element.name.to_string(),
                alternative_names: element
                    .alternative_names
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                path: store.full_path(element.id, delimiter)?,
                id: element.id,
            });
        }

        match self.output {
            OutputFormat::Json => render_json(&rows)?,
            OutputFormat::Table => render_table(&rows, self.quiet),
        }

        Ok(())
    }
}

fn render_table(rows: &[Row], quiet: bool) {
    let data: Vec<[String; 3]> = rows
        .iter()
        .map(|row| {
            [
                row.path.clone(),
                row.alternative_names.join(", "),
                row.id.to_string(),
            ]
        })
        .collect();

    if quiet {
        for row in &data {
            println!("{}", row.join("\t"));
        }
        return;
    }

    if data.is_empty() {
        println!("No matches");
        return;
    }

    let headers = ["Path", "Alt names", "Id"];

    // Determine column widths for alignment.
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            data.iter()
                .map(|row| row[idx].len())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();

    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in &data {
        for (value, width) in row.iter().zip(&widths) {
            print!("{value:<width$}  ");
        }
        println!();
    }
}

fn render_json(rows: &[Row]) -> anyhow::Result<()> {
    use serde_json::json;

    let rows_out: Vec<_> = rows
        .iter()
        .map(|row| {
            json!({
                "name": row.name,
                "alternative_names": row.alternative_names,
                "path": row.path,
                "id": row.id,
            })
        })
        .collect();

    serde_json::to_writer_pretty(std::io::stdout(), &rows_out)
        .context("failed to render json output")?;
    println!();
    Ok(())
}
