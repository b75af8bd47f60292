use std::{env, path::PathBuf};

use clap::Parser;
use cli::{Args, Commands};
use error::{CliError, CliResult};
use export::export_json;
use info::show_packages;
use list::list_packages;
use logging::setup_logging;
use options::show_options;
use stats::show_stats;
use tlpdb_config::{
    config::{config_path, generate_default_config, set_config_path, Config},
    error::ConfigError,
    utils::resolve_path,
};
use tlpdb_core::Database;
use tracing::{debug, info, warn};

mod cli;
mod error;
mod export;
mod info;
mod list;
mod logging;
mod options;
mod stats;
mod utils;

fn absolute(path: &str) -> CliResult<PathBuf> {
    let path = resolve_path(path);
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir().map_err(|source| CliError::IoError {
        action: "retrieving current directory".into(),
        source,
    })?;
    Ok(cwd.join(path))
}

fn load_database(args: &Args, config: &Config) -> CliResult<Database> {
    let path = match args.database.as_deref() {
        Some(path) => absolute(path)?,
        None => config.database_path().ok_or(CliError::NoDatabase)?,
    };
    debug!("Using package database {}", path.display());

    Ok(Database::from_path(&path, config.parse_options())?)
}

fn print_config() -> CliResult<()> {
    let path = config_path();
    if !path.exists() {
        warn!("Config file {} not found", path.display());
    }

    let config = Config::new()?;
    let content = toml::to_string_pretty(&config).map_err(ConfigError::from)?;
    info!("{}", content);
    Ok(())
}

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        utils::set_color(false);
    }

    if let Some(ref c) = args.config {
        set_config_path(absolute(c)?);
    }

    match args.command {
        Commands::DefConfig => {
            generate_default_config()?;
        }
        Commands::Config => print_config()?,
        ref command => {
            let config = Config::new()?;

            let display = config.display();
            if !display.colors() {
                utils::set_color(false);
            }
            utils::set_icons(display.icons());

            let db = load_database(&args, &config)?;

            match command {
                Commands::Info {
                    packages,
                } => show_packages(&db, packages)?,
                Commands::List {
                    category,
                } => list_packages(&db, category.clone())?,
                Commands::Options => show_options(&db, &config)?,
                Commands::Export {
                    output,
                    pretty,
                } => {
                    let output = output.as_deref().map(absolute).transpose()?;
                    export_json(&db, output.as_deref(), *pretty)?;
                }
                Commands::Stats => show_stats(&db)?,
                Commands::DefConfig | Commands::Config => unreachable!(),
            }
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
