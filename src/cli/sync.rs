use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{Cell, Table};
use rusqlite::Connection;

use crate::cli::open_db;
use crate::db::{load_cursor, save_cursor};
use crate::error::Result;
use crate::extractor::Template;
use crate::fmt::money;
use crate::mailbox::DirMailbox;
use crate::settings::{load_settings, Settings};
use crate::snapshot::{write_snapshot, SNAPSHOT_FILE};
use crate::sync::{sync, SyncOptions, SyncReport};

pub fn run(dry_run: bool) -> Result<()> {
    let settings = load_settings();
    let conn = open_db(&settings)?;
    let report = perform(&settings, &conn, dry_run)?;
    print_report(&report, dry_run);
    Ok(())
}

/// Sync, then persist the new cursor and the snapshot file.
pub fn perform(settings: &Settings, conn: &Connection, dry_run: bool) -> Result<SyncReport> {
    let cursor = load_cursor(conn)?;
    let mailbox = DirMailbox::new(&settings.mailbox_dir);
    let opts = SyncOptions {
        max_results: settings.max_results,
        dry_run,
    };
    let today = chrono::Local::now().date_naive();
    let report = sync(
        conn,
        &mailbox,
        &Template::default(),
        &settings.search_query,
        cursor,
        &opts,
        today,
    )?;

    if !dry_run {
        save_cursor(conn, &report.next_cursor)?;
        if settings.write_snapshot && !report.orders.is_empty() {
            let path = PathBuf::from(&settings.data_dir).join(SNAPSHOT_FILE);
            write_snapshot(&path, &report.orders)?;
        }
    }
    Ok(report)
}

pub fn print_report(report: &SyncReport, dry_run: bool) {
    println!("Search: {}", report.query);
    println!("{} messages listed", report.listed);

    if !report.orders.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Order", "Date", "Total"]);
        for order in &report.orders {
            table.add_row(vec![
                Cell::new(&order.id),
                Cell::new(&order.date),
                Cell::new(money(order.total)),
            ]);
        }
        let title = if dry_run { "Orders found (dry run)" } else { "Orders stored" };
        println!("{title}\n{table}");
    }

    if report.already_scanned > 0 {
        println!("{} already scanned", report.already_scanned);
    }
    for id in &report.not_found {
        println!("{}", format!("No order details in {id}").yellow());
    }
    for failure in &report.failures {
        println!(
            "{}",
            format!("Skipped {}: {}", failure.message_id, failure.reason).red()
        );
    }

    if dry_run {
        println!("Dry run: nothing written.");
    } else if report.failures.is_empty() && report.complete {
        println!("{}", format!("Sync complete. Last update is now {}", report.next_cursor).green());
    } else if report.failures.is_empty() {
        println!(
            "{}",
            format!(
                "Too many messages on {} to page through. Last update stays there; raise max_results.",
                report.next_cursor
            )
            .yellow()
        );
    } else {
        println!(
            "{}",
            format!(
                "Sync finished with {} skipped message(s). Last update stays at {}",
                report.failures.len(),
                report.next_cursor
            )
            .yellow()
        );
    }
}
