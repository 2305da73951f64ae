use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::models::Order;

pub const SNAPSHOT_FILE: &str = "orders.json";

/// Write orders as a JSON array of `{id, date, total}` objects.
pub fn write_snapshot(path: &Path, orders: &[Order]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(orders)?;
    std::fs::write(path, format!("{json}\n"))?;
    debug!(path = %path.display(), count = orders.len(), "wrote snapshot");
    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<Order>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn write_csv(path: &Path, orders: &[Order]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    for order in orders {
        wtr.serialize(order)?;
    }
    wtr.flush()?;
    Ok(())
}
