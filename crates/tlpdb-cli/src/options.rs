use nu_ansi_term::Color::{Blue, Green};
use tlpdb_config::config::Config;
use tlpdb_core::Database;
use tracing::{debug, info, warn};

use crate::{error::CliResult, utils::Colored};

pub fn show_options(db: &Database, config: &Config) -> CliResult<()> {
    let package = config.installation_package();
    let prefix = config.option_prefix();
    debug!(package, prefix, "reading installation options");

    let options = db.installation_options(package, prefix)?;
    if options.is_empty() {
        warn!("No options recorded in {package}");
        return Ok(());
    }

    for option in options {
        info!(
            key = option.key,
            value = option.value,
            "{} = {}",
            Colored(Blue, &option.key),
            Colored(Green, &option.value)
        );
    }

    Ok(())
}
