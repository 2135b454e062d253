use std::path::PathBuf;

mod check;
mod list;
mod resolve;
mod scan;
mod seed;
mod status;
mod terminal;
mod tree;

use check::Check;
use clap::ArgAction;
use list::List;
use resolve::Resolve;
use scan::Scan;
use seed::Seed;
use status::Status;
use stockroom::{ElementKind, Warehouse};
use tracing::instrument;
use tree::Tree;

/// Parse an element kind from a string.
///
/// This is a CLI boundary function that accepts singular and plural
/// spellings in any case ("category", "Categories").
fn parse_kind(s: &str) -> Result<ElementKind, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The path to the root of the inventory directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show inventory status (default)
    Status(Status),

    /// Initialise an empty inventory directory
    Init,

    /// Load the demonstration inventory
    Seed(Seed),

    /// Print one hierarchy as a tree
    Tree(Tree),

    /// List the elements of one hierarchy
    List(List),

    /// Resolve a delimited path to a chain of elements
    Resolve(Resolve),

    /// Turn a barcode payload into a navigation URL
    Scan(Scan),

    /// Check referential integrity across the inventory
    Check(Check),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init => Init::run(&root)?,
            Self::Seed(command) => command.run(root)?,
            Self::Tree(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Resolve(command) => command.run(root)?,
            Self::Scan(command) => command.run(root)?,
            Self::Check(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &PathBuf) -> anyhow::Result<()> {
        Warehouse::init(root)?;

        println!("Initialised inventory in {}", root.display());
        println!("  Created: .inv/config.toml");
        for kind in ElementKind::ALL {
            println!("  Created: {}/", kind.plural());
        }
        println!("  Created: parts/");
        println!();
        println!("Next steps:");
        println!("  inv seed                      # load the demonstration inventory");
        println!("  inv tree category             # print a hierarchy");

        Ok(())
    }
}
