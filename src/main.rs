//! Binary entry point. By default it loads the CSV store and drives the
//! Ratatui event loop; `export` and `list` answer a filtered query without
//! taking over the terminal.
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use branch_inventory::{
    logging, report, run_app, storage, App, AppConfig, InventoryFilter, InventoryStore,
};

#[derive(Parser)]
#[command(name = "branch-inventory")]
#[command(about = "Per-branch stock levels with reorder thresholds")]
struct Cli {
    /// Inventory CSV file (overrides INVENTORY_FILE)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Keep everything in memory; nothing is read or saved
    #[arg(long, global = true)]
    memory: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the terminal UI (default)
    Tui,

    /// Write the filtered inventory as CSV
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the filtered inventory as a table
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Only these branches (repeatable)
    #[arg(long = "branch")]
    branches: Vec<String>,

    /// Only these categories (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Only this item name
    #[arg(long)]
    item: Option<String>,

    /// Only items at or below their minimum quantity
    #[arg(long)]
    below_threshold: bool,
}

impl FilterArgs {
    fn to_filter(&self) -> InventoryFilter {
        let mut filter = InventoryFilter::all().below_threshold_only(self.below_threshold);
        if !self.branches.is_empty() {
            filter = filter.with_branches(self.branches.iter().cloned());
        }
        if !self.categories.is_empty() {
            filter = filter.with_categories(self.categories.iter().cloned());
        }
        if let Some(item) = &self.item {
            filter = filter.with_item_name(item.clone());
        }
        filter
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::resolve(cli.file, cli.memory)?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(config),
        Command::Export { filter, output } => {
            logging::init_stderr();
            let store = load_store(&config).0;
            let filter = filter.to_filter();
            match output {
                Some(path) => {
                    storage::export_to_path(&path, store.query(&filter))?;
                }
                None => storage::export(io::stdout().lock(), store.query(&filter))
                    .context("failed to write CSV to stdout")?,
            }
            Ok(())
        }
        Command::List { filter } => {
            logging::init_stderr();
            let store = load_store(&config).0;
            let filter = filter.to_filter();
            print!("{}", report::render_table(store.query(&filter)));
            Ok(())
        }
    }
}

/// Bring up logging, hydrate the store, and hand control to the TUI. A data
/// file that exists but cannot be read is reported in the footer rather than
/// aborting startup.
fn run_tui(config: AppConfig) -> Result<()> {
    logging::init_file(&config.log_file())?;
    let (store, warning) = load_store(&config);

    let mut app = App::new(store, config);
    if let Some(warning) = warning {
        app.warn(warning);
    }
    run_app(&mut app)
}

fn load_store(config: &AppConfig) -> (InventoryStore, Option<String>) {
    if !config.persist {
        return (InventoryStore::new(), None);
    }
    let loaded = storage::load_or_empty(&config.data_file);
    let warning = match (loaded.warning, loaded.skipped) {
        (Some(err), _) => Some(format!("{err}; starting with an empty inventory.")),
        (None, 0) => None,
        (None, skipped) => Some(format!(
            "Skipped {skipped} row(s) without an item name; they are dropped on the next save."
        )),
    };
    (InventoryStore::from_records(loaded.records), warning)
}
