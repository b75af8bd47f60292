use nu_ansi_term::Color::{Blue, Cyan, Green, Red};
use tlpdb_core::{Database, Package};
use tracing::{debug, info};

use crate::{
    error::CliResult,
    utils::{icon_or, Colored, Icons},
};

fn matches_category(package: &Package, category: Option<&str>) -> bool {
    category.is_none_or(|wanted| package.category() == Some(wanted))
}

pub fn list_packages(db: &Database, category: Option<String>) -> CliResult<()> {
    debug!(category = ?category, "listing packages");

    let mut shown = 0;
    for package in db
        .iter()
        .filter(|pkg| matches_category(pkg, category.as_deref()))
    {
        shown += 1;
        info!(
            name = package.name(),
            category = package.category(),
            revision = package.revision(),
            shortdesc = package.short_description(),
            "{} {} [{}] r{}: {}",
            icon_or(Icons::PACKAGE, "-"),
            Colored(Blue, package.name()),
            Colored(Cyan, package.category().unwrap_or("-")),
            Colored(Green, package.revision().unwrap_or_default()),
            package.short_description().unwrap_or_default(),
        );
    }

    info!(
        "{}",
        Colored(
            Red,
            format!("Showing {} of {} packages", shown, db.len())
        )
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use tlpdb_core::ParseOptions;

    use super::*;

    #[test]
    fn test_matches_category() {
        let db = Database::parse_str(
            "name a\ncategory Package\n\nname b\n\n",
            ParseOptions::default(),
        )
        .unwrap();
        let a = db.get("a").unwrap();
        let b = db.get("b").unwrap();

        assert!(matches_category(a, None));
        assert!(matches_category(a, Some("Package")));
        assert!(!matches_category(a, Some("Collection")));
        assert!(!matches_category(b, Some("Package")));
        assert!(matches_category(b, None));
    }
}
