//! Installation options stored as dependency tokens.
//!
//! The installation metadata record keeps its settings as `depend` lines of
//! the form `opt_<key>:<value>`, for example `depend opt_paper:a4`.

use serde::Serialize;

use crate::{database::Database, error::Result};

/// Name of the record that carries installation metadata.
pub const INSTALLATION_PACKAGE: &str = "00texlive.installation";

/// Prefix of option-style dependency tokens.
pub const OPTION_PREFIX: &str = "opt_";

/// A single `key = value` installation option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstallOption {
    pub key: String,
    pub value: String,
}

impl InstallOption {
    /// Splits a dependency token into an option if it carries `prefix`.
    ///
    /// The value is everything after the first `:`; a token without `:` has an
    /// empty value.
    pub fn from_token(token: &str, prefix: &str) -> Option<Self> {
        let rest = token.strip_prefix(prefix)?;
        let (key, value) = rest.split_once(':').unwrap_or((rest, ""));
        Some(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// Extracts options from dependency tokens, keeping their order.
pub fn options_from_dependencies<'a, I>(dependencies: I, prefix: &str) -> Vec<InstallOption>
where
    I: IntoIterator<Item = &'a String>,
{
    dependencies
        .into_iter()
        .filter_map(|dep| InstallOption::from_token(dep, prefix))
        .collect()
}

impl Database {
    /// Options recorded in the installation metadata record `package`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TlpdbError::PackageNotFound`] if the record is absent.
    pub fn installation_options(&self, package: &str, prefix: &str) -> Result<Vec<InstallOption>> {
        let pkg = self.require(package)?;
        Ok(options_from_dependencies(pkg.dependencies(), prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::ParseOptions, TlpdbError};

    #[test]
    fn test_from_token() {
        let opt = InstallOption::from_token("opt_paper:a4", OPTION_PREFIX).unwrap();
        assert_eq!(opt.key, "paper");
        assert_eq!(opt.value, "a4");

        let opt = InstallOption::from_token("opt_location:http://x:8080", OPTION_PREFIX).unwrap();
        assert_eq!(opt.key, "location");
        assert_eq!(opt.value, "http://x:8080");

        let opt = InstallOption::from_token("opt_flag", OPTION_PREFIX).unwrap();
        assert_eq!(opt.key, "flag");
        assert_eq!(opt.value, "");

        assert!(InstallOption::from_token("setting_available_architectures:x", OPTION_PREFIX).is_none());
    }

    #[test]
    fn test_installation_options() {
        let text = "\
name 00texlive.installation
category TLCore
depend opt_create_formats:1
depend setting_available_architectures:x86_64-linux
depend opt_paper:a4

";
        let db = Database::parse_str(text, ParseOptions::default()).unwrap();
        let opts = db
            .installation_options(INSTALLATION_PACKAGE, OPTION_PREFIX)
            .unwrap();
        assert_eq!(
            opts,
            [
                InstallOption {
                    key: "create_formats".into(),
                    value: "1".into()
                },
                InstallOption {
                    key: "paper".into(),
                    value: "a4".into()
                },
            ]
        );

        let settings = db
            .installation_options(INSTALLATION_PACKAGE, "setting_")
            .unwrap();
        assert_eq!(settings[0].key, "available_architectures");
    }

    #[test]
    fn test_missing_installation_record() {
        let db = Database::parse_str("name a\n\n", ParseOptions::default()).unwrap();
        assert!(matches!(
            db.installation_options(INSTALLATION_PACKAGE, OPTION_PREFIX),
            Err(TlpdbError::PackageNotFound(_))
        ));
    }
}
