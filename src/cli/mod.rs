pub mod cursor;
pub mod export;
pub mod init;
pub mod orders;
pub mod prompt;
pub mod session;
pub mod stats;
pub mod status;
pub mod sync;
pub mod view;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use rusqlite::Connection;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::models::Conditions;
use crate::settings::Settings;

/// Open the store under the configured data directory, creating it if needed.
pub(crate) fn open_db(settings: &Settings) -> Result<Connection> {
    std::fs::create_dir_all(PathBuf::from(&settings.data_dir))?;
    let conn = get_connection(&settings.db_path())?;
    init_db(&conn)?;
    Ok(conn)
}

#[derive(Parser)]
#[command(
    name = "basket",
    about = "Scrape order-confirmation emails into a local order history."
)]
pub struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose data and mailbox directories and create the database.
    Init {
        /// Where basket keeps its database and snapshots (default: ~/Documents/basket)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
        /// Folder of .eml files to scan (default: <data-dir>/mail)
        #[arg(long = "mailbox-dir")]
        mailbox_dir: Option<String>,
    },
    /// Scan the mailbox for new order confirmations and store them.
    Sync {
        /// Extract and report without writing anything
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// List stored orders matching a filter.
    Orders {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Purchase cadence and average spend.
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Interactively build a filter and view matching orders.
    View,
    /// Write matching orders to a JSON or CSV file.
    Export {
        /// Output path (default: <data-dir>/exports/orders-YYYY-MM-DD.<ext>)
        #[arg(long)]
        output: Option<String>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Show or move the sync watermark.
    Cursor {
        /// New watermark: YYYY-Mon-DD, e.g. 2021-Jan-01
        #[arg(long)]
        set: Option<String>,
    },
    /// Show configuration and store totals.
    Status,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

/// Overrides applied on top of the default conditions.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Orders after this date: YYYY-MM-DD
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// Orders before this date: YYYY-MM-DD
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Totals above this amount
    #[arg(long)]
    pub min: Option<String>,
    /// Totals below this amount
    #[arg(long)]
    pub max: Option<String>,
    /// Maximum rows
    #[arg(long)]
    pub limit: Option<String>,
}

impl FilterArgs {
    pub fn apply(&self, base: Conditions) -> Conditions {
        base.with_overrides(
            self.from_date.as_deref(),
            self.to_date.as_deref(),
            self.min.as_deref(),
            self.max.as_deref(),
            self.limit.as_deref(),
        )
    }
}
