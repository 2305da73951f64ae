use std::path::PathBuf;

use crate::cli::{open_db, ExportFormat, FilterArgs};
use crate::error::Result;
use crate::models::Conditions;
use crate::settings::load_settings;
use crate::snapshot::{write_csv, write_snapshot};
use crate::stats::retrieve_orders;

pub fn run(output: Option<String>, format: ExportFormat, filter: &FilterArgs) -> Result<()> {
    let settings = load_settings();
    let conn = open_db(&settings)?;
    let orders = retrieve_orders(&conn, &filter.apply(Conditions::default()))?;

    let path = match output {
        Some(p) => PathBuf::from(p),
        None => {
            let date = chrono::Local::now().format("%Y-%m-%d");
            PathBuf::from(&settings.data_dir)
                .join("exports")
                .join(format!("orders-{date}.{}", format.extension()))
        }
    };

    match format {
        ExportFormat::Json => write_snapshot(&path, &orders)?,
        ExportFormat::Csv => write_csv(&path, &orders)?,
    }
    println!("Wrote {} orders to {}", orders.len(), path.display());
    Ok(())
}
