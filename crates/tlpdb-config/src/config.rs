use std::{
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, RwLock},
};

use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use tlpdb_core::{
    DuplicateNamePolicy, ExtraAttributePolicy, ParseOptions, INSTALLATION_PACKAGE, OPTION_PREFIX,
};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    display::DisplaySettings,
    error::{ConfigError, Result},
    utils::{resolve_path, xdg_config_home},
};

/// Application's configuration
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Flat package database read when no path is given on the command line.
    /// The TLPDB_DATABASE environment variable takes precedence.
    pub database_path: Option<String>,

    /// Name of the record holding installation metadata.
    /// Default: "00texlive.installation"
    pub installation_package: Option<String>,

    /// Prefix of option-style dependency tokens in the installation record.
    /// Default: "opt_"
    pub option_prefix: Option<String>,

    /// Handling of repeated package names: "keep-last" keeps every record and
    /// indexes the later one, "reject" aborts the parse.
    /// Default: "keep-last"
    pub duplicate_names: Option<DuplicateNamePolicy>,

    /// Handling of a repeated unrecognized keyword within one record:
    /// "first-wins", "last-wins", or "reject".
    /// Default: "first-wins"
    pub extra_attributes: Option<ExtraAttributePolicy>,

    /// Output settings.
    pub display: Option<DisplaySettings>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("TLPDB_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("tlpdb").join("config.toml"),
    })
});

/// Currently selected configuration file.
pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .map(|path| path.clone())
        .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
}

/// Points later loads at a different configuration file.
pub fn set_config_path<P: Into<PathBuf>>(path: P) {
    let mut guard = CONFIG_PATH
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = path.into();
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            database_path: None,
            installation_package: Some(INSTALLATION_PACKAGE.to_string()),
            option_prefix: Some(OPTION_PREFIX.to_string()),
            duplicate_names: Some(DuplicateNamePolicy::default()),
            extra_attributes: Some(ExtraAttributePolicy::default()),
            display: Some(DisplaySettings {
                icons: Some(true),
                colors: Some(true),
            }),
        }
    }

    /// Loads the configuration from [`config_path`].
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load(config_path())
    }

    /// Loads the configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let mut config = match fs::read_to_string(path) {
            Ok(content) => {
                debug!("Loading configuration from {}", path.display());
                toml::from_str(&content)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration at {}, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;

        Ok(config)
    }

    pub fn resolve(&mut self) -> Result<()> {
        if self.installation_package.as_deref() == Some("") {
            return Err(ConfigError::EmptyValue("installation_package"));
        }
        if self.option_prefix.as_deref() == Some("") {
            return Err(ConfigError::EmptyValue("option_prefix"));
        }

        self.installation_package
            .get_or_insert_with(|| INSTALLATION_PACKAGE.to_string());
        self.option_prefix
            .get_or_insert_with(|| OPTION_PREFIX.to_string());
        self.duplicate_names.get_or_insert_with(Default::default);
        self.extra_attributes.get_or_insert_with(Default::default);
        self.display.get_or_insert_with(Default::default);

        Ok(())
    }

    /// Database path from `TLPDB_DATABASE` or the config file.
    pub fn database_path(&self) -> Option<PathBuf> {
        if let Ok(env_path) = std::env::var("TLPDB_DATABASE") {
            return Some(resolve_path(&env_path));
        }
        self.database_path.as_deref().map(resolve_path)
    }

    pub fn installation_package(&self) -> &str {
        self.installation_package
            .as_deref()
            .unwrap_or(INSTALLATION_PACKAGE)
    }

    pub fn option_prefix(&self) -> &str {
        self.option_prefix.as_deref().unwrap_or(OPTION_PREFIX)
    }

    pub fn display(&self) -> DisplaySettings {
        self.display.clone().unwrap_or_default()
    }

    /// Decoder options derived from the policy settings.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            duplicate_names: self.duplicate_names.unwrap_or_default(),
            extra_attributes: self.extra_attributes.unwrap_or_default(),
        }
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(display_table) = doc.get_mut("display").and_then(|t| t.as_table_mut()) {
            annotate_toml_table::<DisplaySettings>(display_table, false)?;
        }

        Ok(doc)
    }
}

/// Writes the annotated default configuration to [`config_path`].
pub fn generate_default_config() -> Result<PathBuf> {
    let path = config_path();
    write_default_config(&path)?;
    Ok(path)
}

/// Writes the annotated default configuration to `path`, refusing to
/// overwrite an existing file.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(path.display().to_string()));
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::test_utils::with_env;

    #[test]
    fn test_default_config_creation() {
        let config = Config::default_config();

        assert_eq!(config.installation_package(), "00texlive.installation");
        assert_eq!(config.option_prefix(), "opt_");
        assert_eq!(config.duplicate_names, Some(DuplicateNamePolicy::KeepLast));
        assert_eq!(config.extra_attributes, Some(ExtraAttributePolicy::FirstWins));
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("config.toml")).unwrap();
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_load_policies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "duplicate_names = \"reject\"\nextra_attributes = \"last-wins\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        let options = config.parse_options();
        assert_eq!(options.duplicate_names, DuplicateNamePolicy::Reject);
        assert_eq!(options.extra_attributes, ExtraAttributePolicy::LastWins);
        assert_eq!(config.installation_package(), "00texlive.installation");
    }

    #[test]
    fn test_load_invalid_policy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "duplicate_names = \"sometimes\"\n").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    fn test_resolve_rejects_empty_values() {
        let mut config = Config::default_config();
        config.option_prefix = Some(String::new());
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::EmptyValue("option_prefix"))
        ));
    }

    #[test]
    fn test_resolve_sets_defaults() {
        let mut config: Config = toml::from_str("").unwrap();
        config.resolve().unwrap();

        assert_eq!(
            config.installation_package.as_deref(),
            Some("00texlive.installation")
        );
        assert_eq!(config.option_prefix.as_deref(), Some("opt_"));
        assert!(config.display.is_some());
    }

    #[test]
    #[serial]
    fn test_database_path_env_override() {
        let mut config = Config::default_config();
        config.database_path = Some("/srv/texlive/tlpkg/texlive.tlpdb".into());

        with_env(vec![("TLPDB_DATABASE", Some("/custom/texlive.tlpdb"))], || {
            assert_eq!(
                config.database_path(),
                Some(PathBuf::from("/custom/texlive.tlpdb"))
            );
        });

        with_env(vec![("TLPDB_DATABASE", None)], || {
            assert_eq!(
                config.database_path(),
                Some(PathBuf::from("/srv/texlive/tlpkg/texlive.tlpdb"))
            );
        });
    }

    #[test]
    fn test_write_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tlpdb").join("config.toml");

        write_default_config(&path).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.option_prefix(), "opt_");

        assert!(matches!(
            write_default_config(&path),
            Err(ConfigError::ConfigAlreadyExists(_))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default_config();
        let serialized = toml::to_string(&config).unwrap();
        assert!(serialized.contains("duplicate_names = \"keep-last\""));

        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(
            deserialized.extra_attributes,
            Some(ExtraAttributePolicy::FirstWins)
        );
    }
}
