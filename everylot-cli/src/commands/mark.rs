//! Mark command - record that a lot was published.

use std::path::PathBuf;

use everylot::store::LotStore;
use tracing::info;

use super::common::resolve_database;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the mark command.
pub struct MarkArgs {
    pub database: Option<PathBuf>,
    pub id: i64,
    pub post_id: i64,
}

/// Run the mark command.
pub fn run(runner: &CliRunner, args: MarkArgs) -> Result<(), CliError> {
    runner.log_startup("mark");
    let database = resolve_database(args.database, runner.config())?;

    let store = LotStore::open(&database)?;
    store.mark_as_tweeted(args.id, args.post_id)?;
    info!(lot_id = args.id, post_id = args.post_id, "Marked lot as posted");

    println!("Lot {} marked as posted ({})", args.id, args.post_id);
    Ok(())
}
