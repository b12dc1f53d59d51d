use std::path::PathBuf;

use clap::Parser;

/// Print the visible columns and cells of a JSON table document.
#[derive(Debug, Parser)]
#[command(name = "tabula-cli", version)]
pub struct Args {
    /// Table document: `{ "columns": [...], "rows": [...] }`.
    pub file: PathBuf,

    /// Hide a column. Repeatable.
    #[arg(long = "hide", value_name = "ID")]
    pub hide: Vec<String>,

    /// Show every column before applying `--hide`.
    #[arg(long, conflicts_with = "hide_all")]
    pub show_all: bool,

    /// Hide every hideable column before applying `--hide`.
    #[arg(long)]
    pub hide_all: bool,

    /// Log memo recomputation and construction to the log file.
    #[arg(long)]
    pub debug: bool,
}
