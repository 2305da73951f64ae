use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::Connection;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::dates::Cursor;
use crate::db::{insert_order, is_scanned, record_scan};
use crate::error::Result;
use crate::extractor::FieldSource;
use crate::mailbox::Mailbox;
use crate::models::Order;
use crate::query::rewrite_search;

pub struct SyncOptions {
    /// Page size for each mailbox search.
    pub max_results: usize,
    /// Extract and report without touching the store.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub message_id: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct SyncReport {
    pub query: String,
    pub listed: usize,
    pub orders: Vec<Order>,
    pub already_scanned: usize,
    /// Messages that matched the search but carried none of the markers.
    pub not_found: Vec<String>,
    pub failures: Vec<Failure>,
    /// False when the last search page came back full and could not be drained.
    pub complete: bool,
    pub next_cursor: Cursor,
}

pub fn checksum(body: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body.as_bytes());
    hex::encode(hasher.finalize())
}

/// Scan messages newer than `cursor`, store the orders found and report the rest.
///
/// The mailbox is searched a page at a time, oldest first. A full page moves
/// the search cutoff to the newest date on it and searches again. A message
/// that cannot be fetched or parsed is logged and skipped, and paging stops.
///
/// The returned cursor moves to `today` only when every listed message was
/// handled and the last page was not full. When the results could not be
/// drained it stops at the newest date reached, so nothing older is skipped.
/// With failures it stays put so the next run retries; stored messages are
/// skipped by checksum.
pub fn sync(
    conn: &Connection,
    mailbox: &dyn Mailbox,
    source: &dyn FieldSource,
    base_query: &str,
    cursor: Cursor,
    opts: &SyncOptions,
    today: NaiveDate,
) -> Result<SyncReport> {
    let mut report = SyncReport {
        query: rewrite_search(base_query, &cursor),
        listed: 0,
        orders: Vec::new(),
        already_scanned: 0,
        not_found: Vec::new(),
        failures: Vec::new(),
        complete: false,
        next_cursor: cursor,
    };
    let mut seen = HashSet::new();
    let mut after = cursor;

    loop {
        let query = rewrite_search(base_query, &after);
        info!(%query, max_results = opts.max_results, "searching mailbox");
        let page = mailbox.search(&query, opts.max_results)?;
        let full = page.len() >= opts.max_results;
        let newest = page.last().and_then(|l| l.date);
        let fresh: Vec<String> = page
            .into_iter()
            .map(|l| l.id)
            .filter(|id| seen.insert(id.clone()))
            .collect();
        info!(count = fresh.len(), "messages listed");
        report.listed += fresh.len();

        for id in &fresh {
            scan_message(conn, mailbox, source, id, opts, &mut report)?;
        }

        if !full {
            report.complete = true;
            break;
        }
        if !report.failures.is_empty() {
            break;
        }
        if fresh.is_empty() {
            warn!(
                after = %after,
                max_results = opts.max_results,
                "search page holds only messages already seen, raise max_results"
            );
            break;
        }
        match newest {
            Some(date) => after = after.max(Cursor::new(date)),
            None => break,
        }
    }

    if !opts.dry_run && report.failures.is_empty() {
        report.next_cursor = if report.complete {
            after.max(Cursor::new(today))
        } else {
            after
        };
    }
    Ok(report)
}

fn scan_message(
    conn: &Connection,
    mailbox: &dyn Mailbox,
    source: &dyn FieldSource,
    id: &str,
    opts: &SyncOptions,
    report: &mut SyncReport,
) -> Result<()> {
    let body = match mailbox.body(id) {
        Ok(b) => b,
        Err(e) => {
            warn!(message_id = %id, error = %e, "cannot fetch message, skipping");
            report.failures.push(Failure {
                message_id: id.to_string(),
                reason: e.to_string(),
            });
            return Ok(());
        }
    };

    let sum = checksum(&body);
    if is_scanned(conn, &sum)? {
        report.already_scanned += 1;
        return Ok(());
    }

    let order = match source.extract(&body).and_then(|found| found.into_order()) {
        Ok(order) => order,
        Err(e) => {
            warn!(message_id = %id, error = %e, "cannot extract order, skipping");
            report.failures.push(Failure {
                message_id: id.to_string(),
                reason: e.to_string(),
            });
            return Ok(());
        }
    };

    match order {
        Some(order) => {
            info!(message_id = %id, order = %order.summary(), "extracted order");
            if !opts.dry_run {
                // The order and its checksum land together or not at all.
                let tx = conn.unchecked_transaction()?;
                insert_order(&tx, &order, Some(id))?;
                record_scan(&tx, id, &sum, Some(&order.id), "stored")?;
                tx.commit()?;
            }
            report.orders.push(order);
        }
        None => {
            warn!(message_id = %id, "no order markers found");
            if !opts.dry_run {
                record_scan(conn, id, &sum, None, "no-order")?;
            }
            report.not_found.push(id.to_string());
        }
    }
    Ok(())
}
