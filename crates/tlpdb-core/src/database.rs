//! The decoded database: sealed records plus a name index.

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader, Write},
    path::Path,
};

use serde::Serialize;
use tracing::debug;

use crate::{
    error::{ErrorContext, Result, TlpdbError},
    package::Package,
    parser::{ParseOptions, Parser},
};

/// Every sealed record of one stream, in stream order, with a name index.
///
/// When a name repeats, both records stay in [`Database::packages`] and the
/// index points at the later one.
#[derive(Debug, Default, Clone, Serialize)]
pub struct Database {
    packages: Vec<Package>,
    index: BTreeMap<String, usize>,
}

impl Database {
    pub(crate) fn from_parts(packages: Vec<Package>, index: BTreeMap<String, usize>) -> Self {
        Self {
            packages,
            index,
        }
    }

    /// Decodes a sequence of lines. Line endings may or may not be present.
    pub fn from_lines<I, L>(lines: I, options: ParseOptions) -> Result<Self>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        lines
            .into_iter()
            .try_fold(Parser::new(options), |mut parser, line| {
                parser.feed(line.as_ref())?;
                Ok::<_, TlpdbError>(parser)
            })?
            .finish()
    }

    /// Decodes in-memory database text.
    pub fn parse_str(text: &str, options: ParseOptions) -> Result<Self> {
        Self::from_lines(text.split('\n'), options)
    }

    /// Decodes a database from any buffered reader, one `\n` terminated line
    /// at a time.
    pub fn from_reader<R: BufRead>(reader: R, options: ParseOptions) -> Result<Self> {
        reader
            .split(b'\n')
            .enumerate()
            .try_fold(Parser::new(options), |mut parser, (idx, line)| {
                let line = line.with_context(|| format!("reading line {}", idx + 1))?;
                parser.feed(&line)?;
                Ok::<_, TlpdbError>(parser)
            })?
            .finish()
    }

    /// Opens and decodes a database file.
    pub fn from_path<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        debug!("Reading package database from {}", path.display());

        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let db = Self::from_reader(BufReader::new(file), options)?;

        debug!(count = db.len(), "decoded package database");
        Ok(db)
    }

    /// All sealed records in stream order.
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Name to position in [`Database::packages`].
    pub fn index(&self) -> &BTreeMap<String, usize> {
        &self.index
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Package> {
        self.position(name).map(|idx| &self.packages[idx])
    }

    /// Like [`Database::get`], but a missing package is an error.
    pub fn require(&self, name: &str) -> Result<&Package> {
        self.get(name)
            .ok_or_else(|| TlpdbError::PackageNotFound(name.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Package> {
        self.packages.iter()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Distinct categories in order of first appearance.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for category in self.packages.iter().filter_map(Package::category) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    pub fn into_parts(self) -> (Vec<Package>, BTreeMap<String, usize>) {
        (self.packages, self.index)
    }

    /// Writes the database as JSON for downstream consumers.
    pub fn write_json<W: Write>(&self, writer: W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Database {
    type Item = &'a Package;
    type IntoIter = std::slice::Iter<'a, Package>;

    fn into_iter(self) -> Self::IntoIter {
        self.packages.iter()
    }
}
