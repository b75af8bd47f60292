//! Package records decoded from a flat database.
//!
//! A [`Package`] is produced by the parser and sealed when its terminating
//! blank line is reached. Fields are only reachable through accessors, so a
//! sealed record cannot be changed afterwards.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;

use crate::attributes::Attributes;

/// One package of the database.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub(crate) name: String,
    pub(crate) category: Option<String>,
    pub(crate) revision: Option<u64>,
    pub(crate) relocated: u64,

    pub(crate) short_description: Option<String>,
    pub(crate) long_description: Option<String>,

    pub(crate) catalogue_id: Option<String>,
    pub(crate) catalogue_data: BTreeMap<String, String>,

    pub(crate) dependencies: Vec<String>,

    pub(crate) source_files: Vec<String>,
    pub(crate) source_size: Option<u64>,

    pub(crate) run_files: Vec<String>,
    pub(crate) run_size: Option<u64>,

    pub(crate) doc_files: Vec<String>,
    pub(crate) doc_size: Option<u64>,
    /// Only doc files that carried trailing attributes have an entry.
    pub(crate) doc_file_metadata: BTreeMap<String, Attributes>,

    /// Files per architecture tag.
    pub(crate) bin_files: BTreeMap<String, Vec<String>>,
    pub(crate) bin_size: BTreeMap<String, u64>,

    pub(crate) post_actions: Vec<String>,
    pub(crate) executes: Vec<String>,

    /// Keywords the decoder does not know, stored verbatim.
    pub(crate) extra_attributes: BTreeMap<String, String>,
}

impl Package {
    #[cfg(test)]
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// Relocation flag as written in the database; `0` when absent.
    pub fn relocated(&self) -> u64 {
        self.relocated
    }

    pub fn is_relocated(&self) -> bool {
        self.relocated != 0
    }

    pub fn short_description(&self) -> Option<&str> {
        self.short_description.as_deref()
    }

    /// All `longdesc` lines joined in order with single spaces.
    pub fn long_description(&self) -> Option<&str> {
        self.long_description.as_deref()
    }

    pub fn catalogue_id(&self) -> Option<&str> {
        self.catalogue_id.as_deref()
    }

    /// Values from `catalogue-<key>` lines, keyed by `<key>`.
    pub fn catalogue_data(&self) -> &BTreeMap<String, String> {
        &self.catalogue_data
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn source_files(&self) -> &[String] {
        &self.source_files
    }

    pub fn source_size(&self) -> Option<u64> {
        self.source_size
    }

    pub fn run_files(&self) -> &[String] {
        &self.run_files
    }

    pub fn run_size(&self) -> Option<u64> {
        self.run_size
    }

    pub fn doc_files(&self) -> &[String] {
        &self.doc_files
    }

    pub fn doc_size(&self) -> Option<u64> {
        self.doc_size
    }

    pub fn doc_file_metadata(&self) -> &BTreeMap<String, Attributes> {
        &self.doc_file_metadata
    }

    /// Attributes attached to a single doc file, such as `details` or
    /// `language`.
    pub fn doc_file_attributes(&self, file: &str) -> Option<&Attributes> {
        self.doc_file_metadata.get(file)
    }

    pub fn bin_files(&self) -> &BTreeMap<String, Vec<String>> {
        &self.bin_files
    }

    pub fn bin_size(&self) -> &BTreeMap<String, u64> {
        &self.bin_size
    }

    /// Binary files for one architecture tag.
    pub fn bin_files_for(&self, arch: &str) -> &[String] {
        self.bin_files.get(arch).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn architectures(&self) -> impl Iterator<Item = &str> {
        self.bin_size.keys().map(String::as_str)
    }

    pub fn post_actions(&self) -> &[String] {
        &self.post_actions
    }

    pub fn executes(&self) -> &[String] {
        &self.executes
    }

    pub fn extra_attributes(&self) -> &BTreeMap<String, String> {
        &self.extra_attributes
    }

    pub fn extra_attribute(&self, key: &str) -> Option<&str> {
        self.extra_attributes.get(key).map(String::as_str)
    }
}

struct OrDash<'a, T: fmt::Display>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for OrDash<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("-"),
        }
    }
}

/// Multi-line summary of every populated field.
impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.name, OrDash(&self.short_description))?;
        writeln!(f, "  category = {}", OrDash(&self.category))?;
        writeln!(f, "  revision = {}", OrDash(&self.revision))?;
        writeln!(f, "  srcsize = {}", OrDash(&self.source_size))?;
        writeln!(f, "  srcfiles = {:?}", self.source_files)?;
        writeln!(f, "  binsize = {:?}", self.bin_size)?;
        writeln!(f, "  binfiles = {:?}", self.bin_files)?;
        writeln!(f, "  docsize = {}", OrDash(&self.doc_size))?;
        writeln!(f, "  docfiles = {:?}", self.doc_files)?;
        for (file, attrs) in &self.doc_file_metadata {
            writeln!(f, "    {file}: {attrs}")?;
        }
        writeln!(f, "  runsize = {}", OrDash(&self.run_size))?;
        writeln!(f, "  runfiles = {:?}", self.run_files)?;
        writeln!(f, "  depends = {:?}", self.dependencies)?;
        write!(f, "  longdesc = {}", OrDash(&self.long_description))?;
        if let Some(catalogue) = &self.catalogue_id {
            write!(f, "\n  catalogue = {catalogue}")?;
        }
        if !self.catalogue_data.is_empty() {
            write!(f, "\n  cataloguedata = {:?}", self.catalogue_data)?;
        }
        if !self.post_actions.is_empty() {
            write!(f, "\n  postactions = {:?}", self.post_actions)?;
        }
        if !self.executes.is_empty() {
            write!(f, "\n  executes = {:?}", self.executes)?;
        }
        for (key, value) in &self.extra_attributes {
            write!(f, "\n  {key} = {value}")?;
        }
        Ok(())
    }
}
