//! Decoder for `key=value` attribute lines.
//!
//! Header lines such as `binfiles arch=x86_64-linux size=4` and doc file
//! entries such as `readme.txt details="Package introduction" language="en"`
//! carry a space separated list of attributes after their leading token. Values
//! may be wrapped in double quotes to embed spaces; the quotes themselves are
//! never part of the value.

use std::{collections::BTreeMap, fmt, mem, str::FromStr};

use serde::Serialize;

use crate::error::{AttributeError, AttributeErrorReason};

/// Decoded attributes of a single line, keyed by attribute name.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    /// Decodes an attribute line.
    ///
    /// The line is scanned once, left to right. A space outside of a quoted
    /// span terminates the pending pair; an `=` closes the key only when no key
    /// is pending, so values may contain `=` literally.
    ///
    /// # Errors
    ///
    /// Returns [`AttributeError`] when a pair has no key, a key repeats, a key
    /// is preceded by a quote, or the last value in the line is empty.
    pub fn parse(line: &str) -> Result<Self, AttributeError> {
        let fail = |reason| {
            AttributeError {
                line: line.to_string(),
                reason,
            }
        };

        let mut attrs = BTreeMap::new();
        let mut key: Option<String> = None;
        let mut chars = String::new();
        let mut quote_count = 0usize;

        for c in line.chars() {
            match c {
                '=' if key.is_none() => {
                    if quote_count != 0 {
                        return Err(fail(AttributeErrorReason::QuotedKeyBeforeEquals));
                    }
                    key = Some(mem::take(&mut chars));
                }
                '"' => quote_count += 1,
                ' ' if quote_count % 2 == 0 => {
                    let key = key.take().ok_or_else(|| fail(AttributeErrorReason::NoKey))?;
                    if attrs.contains_key(&key) {
                        return Err(fail(AttributeErrorReason::DuplicateKey(key)));
                    }
                    attrs.insert(key, mem::take(&mut chars));
                    quote_count = 0;
                }
                _ => chars.push(c),
            }
        }

        let key = key.ok_or_else(|| fail(AttributeErrorReason::NoKey))?;
        if chars.is_empty() {
            return Err(fail(AttributeErrorReason::EmptyTrailingValue));
        }
        if attrs.contains_key(&key) {
            return Err(fail(AttributeErrorReason::DuplicateKey(key)));
        }
        attrs.insert(key, chars);

        Ok(Self(attrs))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl FromStr for Attributes {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<BTreeMap<String, String>> for Attributes {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

/// Renders the attributes back into line form, quoting values that contain
/// spaces or are empty. Empty values are written first since a line may not
/// end with one.
impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (empty, filled): (Vec<_>, Vec<_>) =
            self.0.iter().partition(|(_, value)| value.is_empty());
        for (idx, (key, value)) in empty.into_iter().chain(filled).enumerate() {
            if idx > 0 {
                f.write_str(" ")?;
            }
            if value.is_empty() || value.contains(' ') {
                write!(f, "{key}=\"{value}\"")?;
            } else {
                write!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}
