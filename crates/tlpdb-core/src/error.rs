//! Error types for the tlpdb decoder.
//!
//! Decoding a flat database is strict: every variant here aborts the parse of
//! the current stream. Unrecognized keywords are not errors and never show up
//! here.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Why an attribute line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeErrorReason {
    /// A separator or the end of the line was reached before any `=`.
    NoKey,
    /// The same key appeared twice in one line.
    DuplicateKey(String),
    /// The last pair in the line has nothing after its `=`.
    EmptyTrailingValue,
    /// A quote was opened before the key was closed by `=`.
    QuotedKeyBeforeEquals,
}

impl AttributeErrorReason {
    /// Stable machine-readable code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoKey => "no-key",
            Self::DuplicateKey(_) => "duplicate-key",
            Self::EmptyTrailingValue => "empty-trailing-value",
            Self::QuotedKeyBeforeEquals => "quoted-key-before-equals",
        }
    }
}

impl fmt::Display for AttributeErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoKey => write!(f, "no key found"),
            Self::DuplicateKey(key) => write!(f, "key '{key}' already assigned"),
            Self::EmptyTrailingValue => write!(f, "no value found for the last key"),
            Self::QuotedKeyBeforeEquals => write!(f, "possibly quoted key"),
        }
    }
}

/// Failure of the attribute-line decoder.
///
/// The diagnostic code names the reason, e.g. `tlpdb::attribute::no_key`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed attribute line ({}): {reason} in '{line}'", reason.code())]
pub struct AttributeError {
    pub line: String,
    pub reason: AttributeErrorReason,
}

impl Diagnostic for AttributeError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.reason {
            AttributeErrorReason::NoKey => "tlpdb::attribute::no_key",
            AttributeErrorReason::DuplicateKey(_) => "tlpdb::attribute::duplicate_key",
            AttributeErrorReason::EmptyTrailingValue => "tlpdb::attribute::empty_trailing_value",
            AttributeErrorReason::QuotedKeyBeforeEquals => {
                "tlpdb::attribute::quoted_key_before_equals"
            }
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(
            "Attribute lines have the shape key=value key2=\"quoted value\"",
        ))
    }
}

/// Grammar violations raised while decoding a record stream.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedAttributeLine(#[from] AttributeError),

    #[error("Missing '{attribute}' attribute for {context} : {keyword}")]
    #[diagnostic(
        code(tlpdb::parse::missing_attribute),
        help("Header lines for file groups must carry size= (and arch= for binfiles)")
    )]
    MissingRequiredAttribute {
        keyword: String,
        attribute: &'static str,
        context: String,
    },

    #[error("Package name is empty: '{line}'")]
    #[diagnostic(
        code(tlpdb::parse::empty_name),
        help("A record starts with 'name <package>'")
    )]
    EmptyName { line: String },

    #[error("First line of a record must be a name: '{line}'")]
    #[diagnostic(code(tlpdb::parse::unexpected_leading_keyword))]
    UnexpectedLeadingKeyword { line: String },

    #[error("binfiles entry before any architecture was declared: '{line}'")]
    #[diagnostic(
        code(tlpdb::parse::unknown_architecture),
        help("A 'binfiles arch=... size=...' header must precede its file lines")
    )]
    UnknownArchitectureContinuation { line: String },

    #[error("Invalid UTF-8 in {keyword} at byte {offset}")]
    #[diagnostic(code(tlpdb::parse::text_decode))]
    TextDecode { keyword: String, offset: usize },

    #[error("Invalid integer for {keyword}: '{value}'")]
    #[diagnostic(code(tlpdb::parse::integer))]
    IntegerParse { keyword: String, value: String },

    #[error("Duplicate package name: {name}")]
    #[diagnostic(
        code(tlpdb::parse::duplicate_package),
        help("Set duplicate_names = \"keep-last\" to accept repeated records")
    )]
    DuplicatePackage { name: String },

    #[error("Repeated attribute '{keyword}' in package {package}")]
    #[diagnostic(
        code(tlpdb::parse::duplicate_extra_attribute),
        help("Set extra_attributes to \"first-wins\" or \"last-wins\" to accept repeats")
    )]
    DuplicateExtraAttribute { keyword: String, package: String },
}

/// Errors that can occur while loading or querying a package database.
#[derive(Error, Diagnostic, Debug)]
pub enum TlpdbError {
    #[error("Parse error on line {line_number}: {source}")]
    #[diagnostic(code(tlpdb::parse))]
    Parse {
        line_number: usize,
        #[source]
        #[diagnostic_source]
        source: ParseError,
    },

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(tlpdb::io), help("Check that the file exists and is readable"))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error("Package '{0}' not found")]
    #[diagnostic(
        code(tlpdb::package_not_found),
        help("Check the package name against `tlpdb list`")
    )]
    PackageNotFound(String),

    #[error(transparent)]
    #[diagnostic(code(tlpdb::json))]
    Json(#[from] serde_json::Error),
}

impl TlpdbError {
    /// The grammar violation behind this error, if it is one.
    pub fn parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A specialized Result type for database operations.
pub type Result<T> = std::result::Result<T, TlpdbError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            TlpdbError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_codes() {
        assert_eq!(AttributeErrorReason::NoKey.code(), "no-key");
        assert_eq!(
            AttributeErrorReason::DuplicateKey("size".into()).code(),
            "duplicate-key"
        );
        assert_eq!(
            AttributeErrorReason::EmptyTrailingValue.code(),
            "empty-trailing-value"
        );
        assert_eq!(
            AttributeErrorReason::QuotedKeyBeforeEquals.code(),
            "quoted-key-before-equals"
        );
    }

    #[test]
    fn test_attribute_diagnostic_codes() {
        let code = |reason| {
            let err = ParseError::from(AttributeError {
                line: "x".into(),
                reason,
            });
            err.code().map(|c| c.to_string())
        };

        assert_eq!(
            code(AttributeErrorReason::NoKey).as_deref(),
            Some("tlpdb::attribute::no_key")
        );
        assert_eq!(
            code(AttributeErrorReason::DuplicateKey("size".into())).as_deref(),
            Some("tlpdb::attribute::duplicate_key")
        );
        assert_eq!(
            code(AttributeErrorReason::EmptyTrailingValue).as_deref(),
            Some("tlpdb::attribute::empty_trailing_value")
        );
        assert_eq!(
            code(AttributeErrorReason::QuotedKeyBeforeEquals).as_deref(),
            Some("tlpdb::attribute::quoted_key_before_equals")
        );

        let err = ParseError::EmptyName {
            line: "name".into(),
        };
        assert_eq!(
            err.code().map(|c| c.to_string()).as_deref(),
            Some("tlpdb::parse::empty_name")
        );
    }

    #[test]
    fn test_error_display() {
        let err = ParseError::UnexpectedLeadingKeyword {
            line: "category Package".into(),
        };
        assert_eq!(
            err.to_string(),
            "First line of a record must be a name: 'category Package'"
        );

        let err = AttributeError {
            line: "size".into(),
            reason: AttributeErrorReason::NoKey,
        };
        assert_eq!(
            err.to_string(),
            "Malformed attribute line (no-key): no key found in 'size'"
        );

        let err = TlpdbError::Parse {
            line_number: 3,
            source: ParseError::IntegerParse {
                keyword: "revision".into(),
                value: "abc".into(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Parse error on line 3: Invalid integer for revision: 'abc'"
        );
        assert!(matches!(
            err.parse_error(),
            Some(ParseError::IntegerParse { .. })
        ));
    }

    #[test]
    fn test_io_context() {
        let result: std::io::Result<()> = Err(std::io::Error::other("boom"));
        let err = result.with_context(|| "reading texlive.tlpdb".into()).unwrap_err();
        assert_eq!(err.to_string(), "Error while reading texlive.tlpdb: boom");
    }
}
