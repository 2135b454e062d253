use std::path::PathBuf;

use clap::Parser;
use stockroom::{Warehouse, storage::fixtures};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Load the demonstration inventory")]
pub struct Seed {
    /// Skip the confirmation prompt
    #[arg(long, short)]
    force: bool,
}

impl Seed {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut warehouse = Warehouse::open(&root)?;

        // An empty warehouse has nothing to clobber; seed it silently.
        let occupied =
            warehouse.store().element_count() + warehouse.store().part_count() > 0;
        if occupied && !self.force {
            eprint!(
                "\n{} already has content. Overwrite matching entries? (y/N) ",
                warehouse.root().display()
            );
            use std::io::{self, BufRead};
            let stdin = io::stdin();
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            if !line.trim().eq_ignore_ascii_case("y") {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        fixtures::seed_demo(&mut warehouse);
        let report = warehouse.flush()?;

        println!(
            "Seeded {} elements and {} parts into {}",
            report.elements,
            report.parts,
            warehouse.root().display()
        );

        Ok(())
    }
}
