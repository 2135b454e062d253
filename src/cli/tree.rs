use std::{path::PathBuf, process};

use anyhow::Context as _;
use clap::Parser;
use stockroom::{
    ElementKind, Warehouse,
    domain::{
        NameOrdering, PathResolver,
        redirect::SiteUrls,
        tree::{self, TreeNode},
    },
};
use tracing::instrument;

use super::{parse_kind, terminal::Colorize};

#[derive(Debug, Parser)]
#[command(about = "Print one hierarchy as a tree")]
pub struct Tree {
    /// Hierarchy to print (category, footprint, location, manufacturer,
    /// supplier)
    #[arg(value_parser = parse_kind)]
    kind: ElementKind,

    /// Only the subtrees below this path
    #[arg(long, value_name = "PATH")]
    parent: Option<String>,

    /// Largest names first
    #[arg(long)]
    desc: bool,

    /// Attach part-list URLs to every node
    #[arg(long)]
    links: bool,

    /// Output format (text, json)
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Tree {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let warehouse = Warehouse::open(&root)?;
        let store = warehouse.store();
        let order = if self.desc {
            NameOrdering::Descending
        } else {
            NameOrdering::Ascending
        };

        let parent = match &self.parent {
            None => None,
            Some(path) => {
                let mut resolver = PathResolver::new(store, self.kind);
                let chain =
                    resolver.resolve_path_strict(path, warehouse.config().delimiter(), false);
                match chain.last() {
                    Some(element) => Some(element.id),
                    None => {
                        eprintln!("No {} matches '{path}'", self.kind.label());
                        process::exit(2);
                    }
                }
            }
        };

        let nodes = if self.links {
            let urls = SiteUrls::new(warehouse.config().base_url());
            tree::build_tree_with_links(store, self.kind, parent, order, &urls)?
        } else {
            tree::build_tree(store, self.kind, parent, order)?
        };

        match self.output {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(std::io::stdout(), &nodes)
                    .context("failed to render json output")?;
                println!();
            }
            OutputFormat::Text => {
                if nodes.is_empty() {
                    println!("No {} yet", self.kind.plural());
                    return Ok(());
                }
                render_text(&nodes, 0);
            }
        }

        Ok(())
    }
}

fn render_text(nodes: &[TreeNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for node in nodes {
        match &node.href {
            Some(href) => println!("{indent}{} {}", node.label, href.dim()),
            None => println!("{indent}{}", node.label),
        }
        render_text(&node.children, depth + 1);
    }
}
