use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::cli::{open_db, FilterArgs};
use crate::error::Result;
use crate::fmt::{cadence, money};
use crate::models::Conditions;
use crate::panel::{run_stats, Prompter};
use crate::query::summary;
use crate::settings::load_settings;
use crate::stats::get_pattern;

pub fn run(filter: &FilterArgs) -> Result<()> {
    let conn = open_db(&load_settings())?;
    show_pattern(&conn, &filter.apply(Conditions::for_stats()))
}

/// The stats menu from the interactive session.
pub fn interactive(conn: &Connection, p: &mut dyn Prompter) -> Result<()> {
    run_stats(p, |cond| show_pattern(conn, cond))
}

pub fn show_pattern(conn: &Connection, cond: &Conditions) -> Result<()> {
    let pattern = get_pattern(conn, cond)?;

    let mut table = Table::new();
    table.set_header(vec!["Measure", "Value"]);
    table.add_row(vec![Cell::new("Orders"), Cell::new(pattern.orders)]);
    table.add_row(vec![Cell::new("Days covered"), Cell::new(pattern.day_gap)]);
    table.add_row(vec![
        Cell::new("Purchasing"),
        Cell::new(cadence(pattern.cadence_days())),
    ]);
    table.add_row(vec![
        Cell::new("Average order"),
        Cell::new(money(pattern.average_total)),
    ]);
    println!("{}", summary(cond));
    println!("Purchase Pattern\n{table}");
    Ok(())
}
