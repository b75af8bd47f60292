use std::collections::BTreeMap;

use nu_ansi_term::Color::{Blue, Cyan, Green, Magenta};
use tabled::{
    builder::Builder,
    settings::{themes::BorderCorrection, Panel, Style},
};
use tlpdb_core::Database;
use tracing::{debug, info};

use crate::{
    error::CliResult,
    utils::{format_blocks, icon_or, icons_enabled, Colored, Icons},
};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary<'a> {
    pub packages: usize,
    pub categories: BTreeMap<&'a str, usize>,
    pub uncategorized: usize,
    pub dependencies: usize,
    pub relocatable: usize,
    pub architectures: BTreeMap<&'a str, usize>,
    pub run_blocks: u64,
    pub doc_blocks: u64,
    pub source_blocks: u64,
}

impl<'a> Summary<'a> {
    pub fn collect(db: &'a Database) -> Self {
        db.iter().fold(Self::default(), |mut acc, pkg| {
            acc.packages += 1;
            match pkg.category() {
                Some(category) => *acc.categories.entry(category).or_default() += 1,
                None => acc.uncategorized += 1,
            }
            acc.dependencies += pkg.dependencies().len();
            acc.relocatable += usize::from(pkg.is_relocated());
            for arch in pkg.architectures() {
                *acc.architectures.entry(arch).or_default() += 1;
            }
            acc.run_blocks += pkg.run_size().unwrap_or_default();
            acc.doc_blocks += pkg.doc_size().unwrap_or_default();
            acc.source_blocks += pkg.source_size().unwrap_or_default();
            acc
        })
    }
}

pub fn show_stats(db: &Database) -> CliResult<()> {
    let summary = Summary::collect(db);
    debug!(?summary, "collected database summary");

    if icons_enabled() {
        let mut builder = Builder::new();

        builder.push_record([
            format!("{} Packages", Icons::PACKAGE),
            format!(
                "{} ({} relocatable)",
                Colored(Green, summary.packages),
                Colored(Cyan, summary.relocatable)
            ),
        ]);

        let categories = summary
            .categories
            .iter()
            .map(|(name, count)| format!("{}: {}", Colored(Cyan, name), count))
            .chain(
                (summary.uncategorized > 0)
                    .then(|| format!("{}: {}", Colored(Cyan, "-"), summary.uncategorized)),
            )
            .collect::<Vec<_>>()
            .join("\n");
        builder.push_record([format!("{} Categories", Icons::TYPE), categories]);

        builder.push_record([
            format!("{} Dependencies", Icons::DEPENDS),
            Colored(Blue, summary.dependencies).to_string(),
        ]);

        if !summary.architectures.is_empty() {
            let arches = summary
                .architectures
                .iter()
                .map(|(arch, count)| format!("{arch}: {count}"))
                .collect::<Vec<_>>()
                .join("\n");
            builder.push_record([format!("{} Architectures", Icons::ARCH), arches]);
        }

        builder.push_record([
            format!("{} Size", icon_or(Icons::SIZE, "*")),
            format!(
                "run {}, doc {}, source {}",
                Colored(Magenta, format_blocks(summary.run_blocks)),
                Colored(Magenta, format_blocks(summary.doc_blocks)),
                Colored(Magenta, format_blocks(summary.source_blocks))
            ),
        ]);

        let table = builder
            .build()
            .with(Panel::header("Summary"))
            .with(Style::rounded())
            .with(BorderCorrection {})
            .to_string();

        info!(
            packages = summary.packages,
            dependencies = summary.dependencies,
            "\n{table}"
        );
    } else {
        info!(
            packages = summary.packages,
            dependencies = summary.dependencies,
            "Packages: {}, dependencies: {}",
            summary.packages,
            summary.dependencies
        );
        for (name, count) in &summary.categories {
            info!("  {name}: {count}");
        }
        if summary.uncategorized > 0 {
            info!("  -: {}", summary.uncategorized);
        }
    }

    Ok(())
}
