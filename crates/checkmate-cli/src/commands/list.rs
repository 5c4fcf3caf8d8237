//! List command implementation.

use crate::cli::ListArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use checkmate_domain::ClaimStore;
use checkmate_store::SqliteStore;

/// Print the most recent fact checks, newest first.
pub fn execute_list(args: ListArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    if args.limit == 0 {
        return Err(CliError::InvalidInput("Limit must be at least 1".to_string()));
    }

    let records = store.list_recent(args.limit)?;
    println!("{}", formatter.format_records(&records)?);
    Ok(())
}
