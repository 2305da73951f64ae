use rusqlite::Connection;

use crate::db::query_orders;
use crate::error::Result;
use crate::models::{Conditions, Order};
use crate::query::{aggregate_query, range_query};

pub fn retrieve_orders(conn: &Connection, cond: &Conditions) -> Result<Vec<Order>> {
    let query = range_query(cond)?;
    query_orders(conn, &query)
}

/// Purchase pattern over the orders matched by a set of conditions.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// Days between the first and last matched order.
    pub day_gap: i64,
    pub average_total: f64,
    pub orders: i64,
}

impl Pattern {
    /// Average days per order, `None` when nothing matched.
    pub fn cadence_days(&self) -> Option<f64> {
        if self.orders == 0 {
            None
        } else {
            Some(self.day_gap as f64 / self.orders as f64)
        }
    }
}

pub fn get_pattern(conn: &Connection, cond: &Conditions) -> Result<Pattern> {
    let query = aggregate_query(cond)?;
    let (gap, avg, orders): (Option<i64>, Option<f64>, i64) =
        conn.query_row(&query.sql, query.bind(), |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))?;
    Ok(Pattern {
        day_gap: gap.unwrap_or(0),
        average_total: avg.unwrap_or(0.0),
        orders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db, insert_order};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_pattern_over_weekly_orders() {
        let (_dir, conn) = test_db();
        let days = [
            "2021-01-04",
            "2021-01-11",
            "2021-01-18",
            "2021-01-25",
            "2021-02-01",
        ];
        for (i, day) in days.iter().enumerate() {
            let total = 20.0 + i as f64 * 10.0;
            insert_order(&conn, &Order::new(format!("o{i}"), *day, total), None).unwrap();
        }
        let pattern = get_pattern(&conn, &Conditions::for_stats()).unwrap();
        assert_eq!(pattern.day_gap, 28);
        assert_eq!(pattern.orders, 5);
        assert!((pattern.average_total - 40.0).abs() < 1e-9);
        assert!((pattern.cadence_days().unwrap() - 5.6).abs() < 1e-9);
    }

    #[test]
    fn test_stats_row_cap_limits_the_window() {
        let (_dir, conn) = test_db();
        for day in 1..=10 {
            let order = Order::new(format!("o{day}"), format!("2021-03-{day:02}"), 10.0);
            insert_order(&conn, &order, None).unwrap();
        }
        let pattern = get_pattern(&conn, &Conditions::for_stats()).unwrap();
        assert_eq!(pattern.orders, 7);
        assert_eq!(pattern.day_gap, 6);
    }

    #[test]
    fn test_pattern_with_no_orders() {
        let (_dir, conn) = test_db();
        let pattern = get_pattern(&conn, &Conditions::default()).unwrap();
        assert_eq!(pattern.orders, 0);
        assert_eq!(pattern.cadence_days(), None);
    }

    #[test]
    fn test_retrieve_orders_rejects_bad_conditions() {
        let (_dir, conn) = test_db();
        let mut cond = Conditions::default();
        cond.set_row_limit("lots");
        assert!(retrieve_orders(&conn, &cond).is_err());
    }
}
