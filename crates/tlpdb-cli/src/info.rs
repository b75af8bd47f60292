use nu_ansi_term::Color::{Blue, Cyan, Green, Magenta, Yellow};
use tabled::{builder::Builder, settings::Style};
use tlpdb_core::{Database, Package};
use tracing::{debug, info};

use crate::{
    error::CliResult,
    utils::{format_blocks, icons_enabled, Colored, Icons},
};

fn files_row(files: &[String], size: Option<u64>) -> String {
    let size = size
        .map(|s| format!(" ({})", Colored(Magenta, format_blocks(s))))
        .unwrap_or_default();
    format!("{} files{}", Colored(Blue, files.len()), size)
}

fn package_table(package: &Package) -> String {
    let mut builder = Builder::new();

    builder.push_record([
        format!("{} Name", Icons::PACKAGE),
        Colored(Blue, package.name()).to_string(),
    ]);

    if let Some(desc) = package.short_description() {
        builder.push_record([format!("{} Description", Icons::DESCRIPTION), desc.into()]);
    }

    if let Some(category) = package.category() {
        builder.push_record([
            format!("{} Category", Icons::TYPE),
            Colored(Cyan, category).to_string(),
        ]);
    }

    if let Some(revision) = package.revision() {
        builder.push_record([
            format!("{} Revision", Icons::VERSION),
            Colored(Green, revision).to_string(),
        ]);
    }

    if let Some(longdesc) = package.long_description() {
        builder.push_record([format!("{} Details", Icons::DESCRIPTION), longdesc.into()]);
    }

    if let Some(catalogue) = package.catalogue_id() {
        builder.push_record([format!("{} Catalogue", Icons::CATALOGUE), catalogue.into()]);
    }

    if !package.catalogue_data().is_empty() {
        let data = package
            .catalogue_data()
            .iter()
            .map(|(key, value)| format!("{}: {value}", Colored(Cyan, key)))
            .collect::<Vec<_>>()
            .join("\n");
        builder.push_record([format!("{} Catalogue data", Icons::CATALOGUE), data]);
    }

    if !package.dependencies().is_empty() {
        builder.push_record([
            format!("{} Depends", Icons::DEPENDS),
            package.dependencies().join("\n"),
        ]);
    }

    if !package.run_files().is_empty() {
        builder.push_record([
            format!("{} Run files", Icons::SIZE),
            files_row(package.run_files(), package.run_size()),
        ]);
    }

    if !package.doc_files().is_empty() {
        builder.push_record([
            format!("{} Doc files", Icons::DOCS),
            files_row(package.doc_files(), package.doc_size()),
        ]);
    }

    if !package.source_files().is_empty() {
        builder.push_record([
            format!("{} Source files", Icons::SOURCE),
            files_row(package.source_files(), package.source_size()),
        ]);
    }

    for arch in package.architectures() {
        builder.push_record([
            format!("{} {}", Icons::ARCH, arch),
            files_row(
                package.bin_files_for(arch),
                package.bin_size().get(arch).copied(),
            ),
        ]);
    }

    let scripts = package
        .post_actions()
        .iter()
        .map(|action| format!("postaction {action}"))
        .chain(
            package
                .executes()
                .iter()
                .map(|execute| format!("execute {execute}")),
        )
        .collect::<Vec<_>>();
    if !scripts.is_empty() {
        builder.push_record([format!("{} Actions", Icons::SCRIPT), scripts.join("\n")]);
    }

    for (key, value) in package.extra_attributes() {
        builder.push_record([Colored(Yellow, key).to_string(), value.clone()]);
    }

    builder.build().with(Style::rounded()).to_string()
}

pub fn show_packages(db: &Database, names: &[String]) -> CliResult<()> {
    debug!(count = names.len(), "showing package details");

    for name in names {
        let package = db.require(name)?;

        if icons_enabled() {
            let table = package_table(package);
            info!(
                name = package.name(),
                category = package.category(),
                revision = package.revision(),
                shortdesc = package.short_description(),
                "\n{table}"
            );
        } else {
            info!(
                name = package.name(),
                category = package.category(),
                revision = package.revision(),
                shortdesc = package.short_description(),
                "{package}"
            );
        }
    }

    Ok(())
}
