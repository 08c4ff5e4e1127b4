mod app;
mod data;
mod error;
mod paths;
mod terminal;

use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::info;
use simplelog::{Config, LevelFilter, WriteLogger};
use tableview::prelude::*;

use crate::app::App;
use crate::error::AppError;
use crate::terminal::Screen;

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ToggleArg {
    /// Every header tap flips the tapped column
    #[default]
    Always,
    /// The first tap on an inactive column only activates it
    ActiveOnly,
}

impl From<ToggleArg> for SortToggle {
    fn from(arg: ToggleArg) -> Self {
        match arg {
            ToggleArg::Always => SortToggle::Always,
            ToggleArg::ActiveOnly => SortToggle::ActiveOnly,
        }
    }
}

/// Browse a table of cars with mouse and keyboard selection.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON file with an array of cars; a built-in sample is used otherwise
    #[arg(long)]
    data: Option<PathBuf>,
    /// Allow selecting several rows
    #[arg(long)]
    multiple: bool,
    /// Log file path, defaults to the platform cache directory
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
    /// Header tap behavior
    #[arg(long, value_enum, default_value_t)]
    sort_toggle: ToggleArg,
}

fn init_logging(args: &Args) -> Result<PathBuf, AppError> {
    let path = match &args.log_file {
        Some(path) => path.clone(),
        None => paths::log_file().ok_or(AppError::NoLogDir)?,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    WriteLogger::init(args.log_level, Config::default(), File::create(&path)?)?;
    Ok(path)
}

fn run(args: Args) -> Result<(), AppError> {
    let log_path = init_logging(&args)?;
    info!("Logging to {}", log_path.display());

    let rows = match &args.data {
        Some(path) => data::load(path)?,
        None => data::sample(),
    };
    let selection_type = if args.multiple {
        SelectionType::Multiple
    } else {
        SelectionType::Single
    };

    let table = TableConfig::new()
        .selection_type(selection_type)
        .columns(data::columns())
        .sort_toggle(args.sort_toggle.into())
        .build(rows)?;

    let mut screen = Screen::new()?;
    App::new(table).run(&mut screen)
}

fn main() -> ExitCode {
    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
