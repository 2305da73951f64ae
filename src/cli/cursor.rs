use crate::cli::open_db;
use crate::dates::Cursor;
use crate::db::{load_cursor, save_cursor};
use crate::error::Result;
use crate::query::rewrite_search;
use crate::settings::load_settings;

pub fn run(set: Option<String>) -> Result<()> {
    let settings = load_settings();
    let conn = open_db(&settings)?;

    if let Some(raw) = set {
        let cursor = Cursor::parse(&raw)?;
        save_cursor(&conn, &cursor)?;
        println!("Last update set to {cursor}");
        return Ok(());
    }

    let cursor = load_cursor(&conn)?;
    println!("Last update: {cursor}");
    println!("Next search: {}", rewrite_search(&settings.search_query, &cursor));
    Ok(())
}
