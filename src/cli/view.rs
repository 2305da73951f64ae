use rusqlite::Connection;

use crate::cli::open_db;
use crate::cli::orders::print_orders;
use crate::cli::prompt::TermPrompter;
use crate::error::Result;
use crate::panel::{run_panel, Prompter};
use crate::settings::load_settings;
use crate::stats::retrieve_orders;

pub fn run() -> Result<()> {
    let conn = open_db(&load_settings())?;
    interactive(&conn, &mut TermPrompter)
}

pub fn interactive(conn: &Connection, p: &mut dyn Prompter) -> Result<()> {
    run_panel(p, |cond| {
        let orders = retrieve_orders(conn, cond)?;
        print_orders(&orders);
        Ok(())
    })
}
