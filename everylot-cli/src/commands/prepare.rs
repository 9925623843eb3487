//! Prepare command - fetch a lot's image and compose its post.

use std::fs;
use std::path::PathBuf;

use everylot::lot::LotSelector;
use everylot::provider::ReqwestClient;
use everylot::store::LotStore;
use everylot::{EveryLot, ImageSource};
use tracing::info;

use super::common::{resolve_database, resolve_run_config, ImageKind, RunOverrides};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the prepare command.
pub struct PrepareArgs {
    pub database: Option<PathBuf>,
    pub id: Option<i64>,
    pub image: Option<ImageKind>,
    pub output: Option<PathBuf>,
    pub media_ids: Vec<String>,
    pub google_api_key: Option<String>,
    pub search_format: Option<String>,
    pub print_format: Option<String>,
}

/// Default image file name for a lot.
pub fn default_output(lot_id: i64, source: ImageSource) -> PathBuf {
    PathBuf::from(format!("lot-{}.{}", lot_id, source.file_extension()))
}

/// Run the prepare command.
pub fn run(runner: &CliRunner, args: PrepareArgs) -> Result<(), CliError> {
    runner.log_startup("prepare");
    let config = runner.config();

    let database = resolve_database(args.database, config)?;
    let run_config = resolve_run_config(
        RunOverrides {
            api_key: args.google_api_key,
            search_format: args.search_format,
            print_format: args.print_format,
        },
        config,
    )?;

    let store = LotStore::open(&database)?;
    let http = ReqwestClient::with_timeout(run_config.timeout_secs)?;
    let span = tracing::info_span!("everylot", db = %database.display());
    let bot = EveryLot::new(store, LotSelector::from_id(args.id), &run_config, http, span)?;

    let source = args.image.map(ImageSource::from).unwrap_or_default();
    let image = bot.fetch_image(source)?;
    let output = args
        .output
        .unwrap_or_else(|| default_output(bot.lot().id, source));
    let bytes = image.into_inner();
    fs::write(&output, &bytes).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    info!(lot_id = bot.lot().id, %source, path = %output.display(), bytes = bytes.len(), "Saved image");

    let payload = bot.compose(args.media_ids)?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
