mod args;
mod document;
mod error;
mod render;

use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};
use tabula::table::Table;

use crate::args::Args;
use crate::document::Document;
use crate::error::CliError;

fn run(args: Args) -> Result<(), CliError> {
    let level = if args.debug { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = File::create("tabula-cli.log").map_err(CliError::LogFile)?;
    WriteLogger::init(level, Config::default(), log_file)?;

    let document = Document::load(&args.file)?;
    log::info!(
        "loaded {}: {} root columns, {} rows",
        args.file.display(),
        document.columns.len(),
        document.rows.len()
    );

    let table = Table::new(document.into_options().with_debug_all(args.debug))?;

    if args.show_all {
        table.toggle_all_columns_visible(Some(true))?;
    } else if args.hide_all {
        table.toggle_all_columns_visible(Some(false))?;
    }
    for id in &args.hide {
        let column = table.get_column(id)?;
        if !column.get_can_hide() {
            log::warn!("column {id} cannot be hidden");
        }
        column.toggle_visibility(Some(false))?;
    }

    for line in render::render(&table)? {
        println!("{line}");
    }
    println!();
    println!("{}", render::summary(&table));
    Ok(())
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
