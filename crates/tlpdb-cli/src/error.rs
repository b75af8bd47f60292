use miette::Diagnostic;
use thiserror::Error;
use tlpdb_config::error::ConfigError;
use tlpdb_core::TlpdbError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] TlpdbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("No package database given")]
    #[diagnostic(
        code(tlpdb::cli::no_database),
        help("Pass --database, set TLPDB_DATABASE, or add database_path to the config file")
    )]
    NoDatabase,

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(tlpdb::cli::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },
}

pub type CliResult<T> = std::result::Result<T, CliError>;
