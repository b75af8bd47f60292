use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use tlpdb_core::Database;
use tracing::{debug, info};

use crate::error::{CliError, CliResult};

fn io_error(action: String) -> impl FnOnce(io::Error) -> CliError {
    move |source| CliError::IoError { action, source }
}

/// Writes `db` as JSON to `output`, or to stdout when no file is given.
pub fn export_json(db: &Database, output: Option<&Path>, pretty: bool) -> CliResult<()> {
    match output {
        Some(path) => {
            debug!("exporting {} packages to {}", db.len(), path.display());
            let file =
                File::create(path).map_err(io_error(format!("creating {}", path.display())))?;
            let mut writer = BufWriter::new(file);
            db.write_json(&mut writer, pretty)?;
            writer
                .flush()
                .map_err(io_error(format!("writing {}", path.display())))?;
            info!("Exported {} packages to {}", db.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            db.write_json(&mut writer, pretty)?;
            writeln!(writer).map_err(io_error("writing to stdout".into()))?;
        }
    }

    Ok(())
}
