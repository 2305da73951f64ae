use comfy_table::{Cell, Table};

use crate::cli::{open_db, FilterArgs};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{Conditions, Order};
use crate::query::summary;
use crate::settings::load_settings;
use crate::stats::retrieve_orders;

pub fn run(filter: &FilterArgs) -> Result<()> {
    let conn = open_db(&load_settings())?;
    let cond = filter.apply(Conditions::default());
    let orders = retrieve_orders(&conn, &cond)?;
    println!("{}", summary(&cond));
    print_orders(&orders);
    Ok(())
}

pub fn print_orders(orders: &[Order]) {
    if orders.is_empty() {
        println!("No orders match.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["Order", "Date", "Total"]);
    for order in orders {
        table.add_row(vec![
            Cell::new(&order.id),
            Cell::new(&order.date),
            Cell::new(money(order.total)),
        ]);
    }
    let total: f64 = orders.iter().map(|o| o.total).sum();
    println!("Orders\n{table}");
    println!("{} orders, {} total", orders.len(), money(total));
}
