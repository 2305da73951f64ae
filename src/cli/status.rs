use std::path::PathBuf;

use crate::cli::open_db;
use crate::db::{count_orders, load_cursor};
use crate::error::Result;
use crate::settings::load_settings;
use crate::snapshot::{read_snapshot, SNAPSHOT_FILE};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();

    println!("Data dir:   {}", settings.data_dir);
    println!("Database:   {}", db_path.display());
    println!("Mailbox:    {}", settings.mailbox_dir);
    println!("Search:     {}", settings.search_query);
    println!("Max fetch:  {}", settings.max_results);

    if !db_path.exists() {
        println!();
        println!("Database not found. Run `basket init` to set up.");
        return Ok(());
    }

    let conn = open_db(&settings)?;
    let orders = count_orders(&conn)?;
    let scanned: i64 = conn.query_row("SELECT count(*) FROM scanned_messages", [], |r| r.get(0))?;
    println!();
    println!("Orders:       {orders}");
    println!("Messages:     {scanned}");
    println!("Last update:  {}", load_cursor(&conn)?);

    let snapshot = PathBuf::from(&settings.data_dir).join(SNAPSHOT_FILE);
    if snapshot.exists() {
        match read_snapshot(&snapshot) {
            Ok(last) => println!("Last sync:    {} new orders", last.len()),
            Err(e) => println!("Last sync:    unreadable snapshot ({e})"),
        }
    }
    Ok(())
}
