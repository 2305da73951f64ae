mod cli;
mod dates;
mod db;
mod error;
mod extractor;
mod fmt;
mod logging;
mod mailbox;
mod models;
mod panel;
mod query;
mod settings;
mod snapshot;
mod stats;
mod sync;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose) {
        eprintln!("Warning: logging disabled: {e}");
    }

    let result = match cli.command {
        Some(Commands::Init {
            data_dir,
            mailbox_dir,
        }) => cli::init::run(data_dir, mailbox_dir),
        Some(Commands::Sync { dry_run }) => cli::sync::run(dry_run),
        Some(Commands::Orders { filter }) => cli::orders::run(&filter),
        Some(Commands::Stats { filter }) => cli::stats::run(&filter),
        Some(Commands::View) => cli::view::run(),
        Some(Commands::Export {
            output,
            format,
            filter,
        }) => cli::export::run(output, format, &filter),
        Some(Commands::Cursor { set }) => cli::cursor::run(set),
        Some(Commands::Status) => cli::status::run(),
        None => cli::session::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
