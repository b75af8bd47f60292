use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};

/// Display settings for CLI output formatting
#[derive(Clone, Debug, Default, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct DisplaySettings {
    /// Show unicode icons/symbols in output
    /// Default: true
    pub icons: Option<bool>,

    /// Colorize output
    /// Default: true
    pub colors: Option<bool>,
}

impl DisplaySettings {
    pub fn icons(&self) -> bool {
        self.icons.unwrap_or(true)
    }

    pub fn colors(&self) -> bool {
        self.colors.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_defaults() {
        let settings = DisplaySettings::default();
        assert!(settings.icons());
        assert!(settings.colors());
    }

    #[test]
    fn test_display_from_toml() {
        let settings: DisplaySettings = toml::from_str("icons = false").unwrap();
        assert!(!settings.icons());
        assert!(settings.colors());
    }
}
