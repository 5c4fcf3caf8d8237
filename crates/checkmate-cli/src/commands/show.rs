//! Show command implementation.

use crate::cli::ShowArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use checkmate_domain::{ClaimStore, FactCheckId};
use checkmate_store::SqliteStore;

/// Print one stored fact check.
pub fn execute_show(args: ShowArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let id: FactCheckId = args.id.parse().map_err(CliError::InvalidInput)?;
    let record = store.get_by_id(id)?.ok_or(CliError::NotFound(id))?;

    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
