use std::{
    fmt::Display,
    sync::{LazyLock, RwLock},
};

use nu_ansi_term::Color;

pub struct Icons;

impl Icons {
    pub const ARCH: &str = "🖥";
    pub const CATALOGUE: &str = "📚";
    pub const DEPENDS: &str = "🔗";
    pub const DESCRIPTION: &str = "📝";
    pub const DOCS: &str = "📖";
    pub const PACKAGE: &str = "📦";
    pub const SCRIPT: &str = "📃";
    pub const SIZE: &str = "💾";
    pub const SOURCE: &str = "🔨";
    pub const TYPE: &str = "📁";
    pub const VERSION: &str = "🏁";
}

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));
pub static ICONS: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

fn flag(lock: &RwLock<bool>) -> bool {
    lock.read().map(|v| *v).unwrap_or(true)
}

fn set_flag(lock: &RwLock<bool>, value: bool) {
    if let Ok(mut guard) = lock.write() {
        *guard = value;
    }
}

pub fn set_color(enabled: bool) {
    set_flag(&COLOR, enabled);
}

pub fn set_icons(enabled: bool) {
    set_flag(&ICONS, enabled);
}

pub fn icons_enabled() -> bool {
    flag(&ICONS)
}

pub fn icon_or<'a>(icon: &'a str, fallback: &'a str) -> &'a str {
    if icons_enabled() {
        icon
    } else {
        fallback
    }
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if flag(&COLOR) {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Sizes in the database are counted in 4 KiB blocks.
pub fn format_blocks(blocks: u64) -> String {
    format_bytes(blocks.saturating_mul(4096))
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.50 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn test_format_blocks() {
        assert_eq!(format_blocks(1), "4.00 KiB");
        assert_eq!(format_blocks(256), "1.00 MiB");
    }
}
