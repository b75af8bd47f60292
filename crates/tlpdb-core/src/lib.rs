//! Decoder for flat TeX Live package databases.
//!
//! A flat database (`texlive.tlpdb`) is a line-oriented text file holding one
//! record per package, separated by blank lines. This crate turns it into
//! immutable [`Package`] records and an index from package name to position.
//!
//! # Overview
//!
//! - [`attributes`]: the `key=value key2="quoted value"` mini-language used by
//!   file group headers and doc file entries
//! - [`parser`]: the line grammar, with continuation lines and per-architecture
//!   binary groups
//! - [`database`]: the decoded records and lookup helpers
//! - [`options`]: installation options kept as `opt_<key>:<value>` tokens
//!
//! # Example
//!
//! ```
//! use tlpdb_core::{Database, ParseOptions};
//!
//! let text = "\
//! name a2ping
//! category Package
//! revision 52964
//! runfiles size=3
//!  texmf-dist/scripts/a2ping/a2ping.pl
//!
//! ";
//! let db = Database::parse_str(text, ParseOptions::default()).unwrap();
//! let pkg = db.get("a2ping").unwrap();
//! assert_eq!(pkg.revision(), Some(52964));
//! assert_eq!(pkg.run_files(), ["texmf-dist/scripts/a2ping/a2ping.pl"]);
//! ```

pub mod attributes;
pub mod database;
pub mod error;
pub mod options;
pub mod package;
pub mod parser;

pub use attributes::Attributes;
pub use database::Database;
pub use error::{
    AttributeError, AttributeErrorReason, ErrorContext, ParseError, Result, TlpdbError,
};
pub use options::{InstallOption, INSTALLATION_PACKAGE, OPTION_PREFIX};
pub use package::Package;
pub use parser::{DuplicateNamePolicy, ExtraAttributePolicy, ParseOptions, Parser};
