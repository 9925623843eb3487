//! everylot CLI - Command-line interface
//!
//! Prepares posts for the every-lot bot: picks the next lot from the
//! database, saves a picture of it, and prints the post payload. Once the
//! post is published, `everylot mark` records it so the next run moves on.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::common::ImageKind;
use commands::{mark, prepare, show};
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "everylot")]
#[command(version, about = "Post a picture of every lot in a city", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ~/.config/everylot/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an image of a lot and print the post to publish
    Prepare {
        /// SQLite database with a lots table
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Lot to use instead of the next unposted one
        #[arg(long)]
        id: Option<i64>,

        /// Image to fetch
        #[arg(long, value_enum)]
        image: Option<ImageKind>,

        /// Where to save the image (defaults to lot-<id>.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Media identifier to attach; may be repeated
        #[arg(long = "media-id")]
        media_id: Vec<String>,

        /// Google Maps API key
        #[arg(long)]
        google_api_key: Option<String>,

        /// Address format for the Street View search
        #[arg(long)]
        search_format: Option<String>,

        /// Format of the posted status
        #[arg(long)]
        print_format: Option<String>,
    },

    /// Record that a lot was published
    Mark {
        /// SQLite database with a lots table
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Lot that was posted
        #[arg(long)]
        id: i64,

        /// Identifier of the published post
        #[arg(long)]
        post_id: i64,
    },

    /// Print a lot without contacting any service
    Show {
        /// SQLite database with a lots table
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Lot to show instead of the next unposted one
        #[arg(long)]
        id: Option<i64>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let runner = CliRunner::new(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Prepare {
            database,
            id,
            image,
            output,
            media_id,
            google_api_key,
            search_format,
            print_format,
        } => prepare::run(
            &runner,
            prepare::PrepareArgs {
                database,
                id,
                image,
                output,
                media_ids: media_id,
                google_api_key,
                search_format,
                print_format,
            },
        ),
        Commands::Mark {
            database,
            id,
            post_id,
        } => mark::run(&runner, mark::MarkArgs {
            database,
            id,
            post_id,
        }),
        Commands::Show { database, id } => show::run(&runner, show::ShowArgs { database, id }),
    }
}
