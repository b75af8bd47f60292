//! Line-oriented record stream parser.
//!
//! The flat database is a sequence of records separated by blank lines. Every
//! non-blank line starts with a keyword followed by a single space and the
//! field value. A line that starts with a space is a continuation line: it has
//! an empty keyword and belongs to the keyword seen on the previous line.
//!
//! ```text
//! name collection-basic
//! category Collection
//! revision 59159
//! shortdesc Essential programs and files
//! longdesc These files are regarded as basic for any TeX system,
//! longdesc covering plain TeX macros, Computer Modern fonts, and
//! longdesc configuration for common drivers.
//! depend amsfonts
//! depend bibtex
//! runfiles size=2
//!  texmf-dist/tex/plain/base/plain.tex
//! binfiles arch=x86_64-linux size=1
//!  bin/x86_64-linux/tex
//!
//! ```

use std::{borrow::Cow, collections::BTreeMap, mem, str};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::{
    attributes::Attributes,
    database::Database,
    error::{ParseError, Result, TlpdbError},
    package::Package,
};

/// What to do when a package name repeats within one stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateNamePolicy {
    /// Keep every record in sequence order and point the index at the last one.
    #[default]
    KeepLast,
    /// Abort the parse with [`ParseError::DuplicatePackage`].
    Reject,
}

/// What to do when an unrecognized keyword repeats within one record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtraAttributePolicy {
    /// Keep the first value and silently ignore later ones.
    #[default]
    FirstWins,
    /// Overwrite with the latest value.
    LastWins,
    /// Abort the parse with [`ParseError::DuplicateExtraAttribute`].
    Reject,
}

/// Knobs for the decoder's permissive corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub duplicate_names: DuplicateNamePolicy,
    pub extra_attributes: ExtraAttributePolicy,
}

/// Recognized field keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword<'a> {
    Name,
    Category,
    Revision,
    Relocated,
    ShortDesc,
    LongDesc,
    Depend,
    Catalogue,
    CatalogueData(&'a str),
    SrcFiles,
    RunFiles,
    DocFiles,
    BinFiles,
    PostAction,
    Execute,
    Other(&'a str),
}

impl<'a> Keyword<'a> {
    fn parse(keyword: &'a str) -> Self {
        match keyword {
            "name" => Self::Name,
            "category" => Self::Category,
            "revision" => Self::Revision,
            "relocated" => Self::Relocated,
            "shortdesc" => Self::ShortDesc,
            "longdesc" => Self::LongDesc,
            "depend" => Self::Depend,
            "catalogue" => Self::Catalogue,
            "srcfiles" => Self::SrcFiles,
            "runfiles" => Self::RunFiles,
            "docfiles" => Self::DocFiles,
            "binfiles" => Self::BinFiles,
            "postaction" => Self::PostAction,
            "execute" => Self::Execute,
            other => {
                match other.strip_prefix("catalogue-") {
                    Some(sub) => Self::CatalogueData(sub),
                    None => Self::Other(other),
                }
            }
        }
    }
}

/// The value part of one line, still in raw bytes.
struct Field<'a> {
    keyword: &'a str,
    raw: &'a [u8],
    /// Byte offset of `raw` within the line.
    offset: usize,
}

impl Field<'_> {
    fn text(&self) -> String {
        String::from_utf8_lossy(self.raw).into_owned()
    }

    /// Strict UTF-8 decode for description fields.
    fn decode(&self) -> std::result::Result<&str, ParseError> {
        str::from_utf8(self.raw).map_err(|err| {
            ParseError::TextDecode {
                keyword: self.keyword.to_string(),
                offset: self.offset + err.valid_up_to(),
            }
        })
    }

    fn integer(&self) -> std::result::Result<u64, ParseError> {
        parse_integer(self.keyword, &self.text())
    }

    fn attributes(&self) -> std::result::Result<Attributes, ParseError> {
        Ok(Attributes::parse(&self.text())?)
    }
}

fn parse_integer(keyword: &str, value: &str) -> std::result::Result<u64, ParseError> {
    value.parse().map_err(|_| {
        ParseError::IntegerParse {
            keyword: keyword.to_string(),
            value: value.to_string(),
        }
    })
}

/// Per-record state: the package being filled plus what continuation lines
/// need to know about the lines before them.
#[derive(Debug, Default)]
struct RecordBuilder {
    package: Package,
    last_keyword: String,
    last_arch: Option<String>,
}

impl RecordBuilder {
    fn require<'a>(
        &self,
        attrs: &'a Attributes,
        keyword: &str,
        attribute: &'static str,
    ) -> std::result::Result<&'a str, ParseError> {
        attrs.get(attribute).ok_or_else(|| {
            ParseError::MissingRequiredAttribute {
                keyword: keyword.to_string(),
                attribute,
                context: self.package.name.clone(),
            }
        })
    }

    fn size(&self, field: &Field<'_>) -> std::result::Result<u64, ParseError> {
        let attrs = field.attributes()?;
        let size = self.require(&attrs, field.keyword, "size")?;
        parse_integer(field.keyword, size)
    }

    fn apply(
        &mut self,
        keyword: &str,
        raw: &[u8],
        offset: usize,
        line: &[u8],
        options: &ParseOptions,
    ) -> std::result::Result<(), ParseError> {
        let header = !keyword.is_empty();
        let keyword = if header {
            keyword.to_string()
        } else if self.last_keyword.is_empty() {
            return Err(ParseError::UnexpectedLeadingKeyword {
                line: String::from_utf8_lossy(line).into_owned(),
            });
        } else {
            mem::take(&mut self.last_keyword)
        };

        let field = Field {
            keyword: &keyword,
            raw,
            offset,
        };
        let pkg = &mut self.package;

        match Keyword::parse(&keyword) {
            Keyword::Name => {
                let name = field.text();
                if name.is_empty() {
                    return Err(ParseError::EmptyName {
                        line: String::from_utf8_lossy(line).into_owned(),
                    });
                }
                pkg.name = name;
            }
            Keyword::Category => pkg.category = Some(field.text()),
            Keyword::Revision => pkg.revision = Some(field.integer()?),
            Keyword::Relocated => pkg.relocated = field.integer()?,
            Keyword::ShortDesc => pkg.short_description = Some(field.decode()?.to_string()),
            Keyword::LongDesc => {
                let text = field.decode()?;
                match pkg.long_description.as_mut() {
                    Some(desc) => {
                        desc.push(' ');
                        desc.push_str(text);
                    }
                    None => pkg.long_description = Some(text.to_string()),
                }
            }
            Keyword::Depend => pkg.dependencies.push(field.text()),
            Keyword::Catalogue => pkg.catalogue_id = Some(field.text()),
            Keyword::CatalogueData(sub) => {
                pkg.catalogue_data.insert(sub.to_string(), field.text());
            }
            Keyword::SrcFiles if header => self.package.source_size = Some(self.size(&field)?),
            Keyword::SrcFiles => pkg.source_files.push(field.text()),
            Keyword::RunFiles if header => self.package.run_size = Some(self.size(&field)?),
            Keyword::RunFiles => pkg.run_files.push(field.text()),
            Keyword::DocFiles if header => self.package.doc_size = Some(self.size(&field)?),
            Keyword::DocFiles => {
                let text = field.text();
                let (file, tail) = text.split_once(' ').unwrap_or((text.as_str(), ""));
                if !tail.is_empty() {
                    let attrs = Attributes::parse(tail)?;
                    pkg.doc_file_metadata.insert(file.to_string(), attrs);
                }
                pkg.doc_files.push(file.to_string());
            }
            Keyword::BinFiles if header => {
                let attrs = field.attributes()?;
                let arch = self.require(&attrs, field.keyword, "arch")?.to_string();
                let size = parse_integer(field.keyword, self.require(&attrs, field.keyword, "size")?)?;
                self.package.bin_size.insert(arch.clone(), size);
                self.last_arch = Some(arch);
            }
            Keyword::BinFiles => {
                let arch = self.last_arch.as_ref().ok_or_else(|| {
                    ParseError::UnknownArchitectureContinuation {
                        line: String::from_utf8_lossy(line).into_owned(),
                    }
                })?;
                self.package
                    .bin_files
                    .entry(arch.clone())
                    .or_default()
                    .push(field.text());
            }
            Keyword::PostAction => pkg.post_actions.push(field.text()),
            Keyword::Execute => pkg.executes.push(field.text()),
            Keyword::Other(key) => {
                insert_extra(
                    &mut pkg.extra_attributes,
                    &pkg.name,
                    key,
                    field.text(),
                    options.extra_attributes,
                )?;
            }
        }

        self.last_keyword = keyword;
        Ok(())
    }
}

fn insert_extra(
    extra: &mut BTreeMap<String, String>,
    package: &str,
    key: &str,
    value: String,
    policy: ExtraAttributePolicy,
) -> std::result::Result<(), ParseError> {
    if !extra.contains_key(key) {
        extra.insert(key.to_string(), value);
        return Ok(());
    }

    match policy {
        ExtraAttributePolicy::FirstWins => {
            trace!(package, key, "ignoring repeated attribute");
        }
        ExtraAttributePolicy::LastWins => {
            extra.insert(key.to_string(), value);
        }
        ExtraAttributePolicy::Reject => {
            return Err(ParseError::DuplicateExtraAttribute {
                keyword: key.to_string(),
                package: package.to_string(),
            });
        }
    }
    Ok(())
}

fn trim_line_ending(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\r' | b'\n'] = line {
        line = rest;
    }
    line
}

/// Incremental decoder over database lines.
///
/// Lines are fed one at a time; a record is sealed into the output when the
/// next blank line arrives. When [`Parser::feed`] fails, the record under
/// construction is dropped while every sealed record stays available through
/// [`Parser::sealed`].
#[derive(Debug, Default)]
pub struct Parser {
    options: ParseOptions,
    current: Option<RecordBuilder>,
    packages: Vec<Package>,
    index: BTreeMap<String, usize>,
    line_number: usize,
}

impl Parser {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Consumes one line. Trailing `\r` and `\n` bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TlpdbError::Parse`] with the 1-based line number on any
    /// grammar violation.
    pub fn feed(&mut self, line: &[u8]) -> Result<()> {
        self.line_number += 1;
        let line_number = self.line_number;

        self.consume(trim_line_ending(line)).map_err(|source| {
            if let Some(builder) = self.current.take() {
                debug!(
                    package = builder.package.name,
                    "discarding unsealed record"
                );
            }
            TlpdbError::Parse {
                line_number,
                source,
            }
        })
    }

    fn consume(&mut self, line: &[u8]) -> std::result::Result<(), ParseError> {
        if line.is_empty() {
            if let Some(builder) = self.current.take() {
                self.seal(builder.package)?;
            }
            return Ok(());
        }

        let (keyword, raw, offset) = match line.iter().position(|&b| b == b' ') {
            Some(idx) => (&line[..idx], &line[idx + 1..], idx + 1),
            None => (line, &line[line.len()..], line.len()),
        };
        let keyword: Cow<'_, str> = String::from_utf8_lossy(keyword);

        if self.current.is_none() && keyword != "name" {
            return Err(ParseError::UnexpectedLeadingKeyword {
                line: String::from_utf8_lossy(line).into_owned(),
            });
        }

        let builder = self.current.get_or_insert_with(RecordBuilder::default);
        builder.apply(&keyword, raw, offset, line, &self.options)
    }

    fn seal(&mut self, package: Package) -> std::result::Result<(), ParseError> {
        let position = self.packages.len();

        if let Some(previous) = self.index.get(&package.name) {
            match self.options.duplicate_names {
                DuplicateNamePolicy::KeepLast => {
                    warn!(
                        package = package.name,
                        previous, position, "duplicate package name, index now points at the later record"
                    );
                }
                DuplicateNamePolicy::Reject => {
                    return Err(ParseError::DuplicatePackage {
                        name: package.name,
                    });
                }
            }
        }

        debug!(package = package.name, position, "sealed record");
        self.index.insert(package.name.clone(), position);
        self.packages.push(package);
        Ok(())
    }

    /// Records sealed so far, in stream order.
    pub fn sealed(&self) -> &[Package] {
        &self.packages
    }

    /// Name of the record currently being built, if any.
    pub fn open_record(&self) -> Option<&str> {
        self.current.as_ref().map(|builder| builder.package.name())
    }

    /// Number of lines consumed so far.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Seals a trailing record that was not followed by a blank line.
    ///
    /// On error the trailing record is dropped and every earlier record stays
    /// available through [`Parser::sealed`] and [`Parser::into_database`].
    pub fn close(&mut self) -> Result<()> {
        let Some(builder) = self.current.take() else {
            return Ok(());
        };
        let line_number = self.line_number;
        self.seal(builder.package).map_err(|source| {
            TlpdbError::Parse {
                line_number,
                source,
            }
        })
    }

    /// Sealed records so far; an open record is dropped.
    pub fn into_database(self) -> Database {
        Database::from_parts(self.packages, self.index)
    }

    /// Closes the stream and returns the decoded database.
    ///
    /// Use [`Parser::close`] followed by [`Parser::into_database`] to keep the
    /// sealed records when the trailing record is rejected.
    pub fn finish(mut self) -> Result<Database> {
        self.close()?;
        Ok(self.into_database())
    }
}
