use chrono::NaiveDate;
use rusqlite::types::Value;

use crate::dates::Cursor;
use crate::error::QueryError;
use crate::models::Conditions;

/// SQL text plus the values bound to its `?N` placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Query {
    pub fn bind(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, Value>> {
        rusqlite::params_from_iter(self.params.iter())
    }
}

/// Checked form of [`Conditions`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub lower: f64,
    pub upper: f64,
    pub row_limit: i64,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| QueryError::InvalidDate(raw.to_string()))
}

pub fn parse_amount(raw: &str) -> Result<f64, QueryError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(QueryError::InvalidAmount(raw.to_string())),
    }
}

pub fn parse_row_limit(raw: &str) -> Result<i64, QueryError> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(QueryError::InvalidRowLimit(raw.to_string())),
    }
}

pub fn validate(cond: &Conditions) -> Result<Bounds, QueryError> {
    Ok(Bounds {
        start: parse_date(&cond.start)?,
        end: parse_date(&cond.end)?,
        lower: parse_amount(&cond.lower_bound)?,
        upper: parse_amount(&cond.upper_bound)?,
        row_limit: parse_row_limit(&cond.row_limit)?,
    })
}

const RANGE_SQL: &str = "SELECT id, order_id, order_date, grand_total FROM orders \
     WHERE ?1 < order_date AND order_date < ?2 \
     AND ?3 < grand_total AND grand_total < ?4 \
     ORDER BY order_date, id LIMIT ?5";

/// Orders strictly inside both the date and the amount window, capped at the row limit.
pub fn range_query(cond: &Conditions) -> Result<Query, QueryError> {
    let b = validate(cond)?;
    Ok(Query {
        sql: RANGE_SQL.to_string(),
        params: vec![
            Value::Text(b.start.format("%Y-%m-%d").to_string()),
            Value::Text(b.end.format("%Y-%m-%d").to_string()),
            Value::Real(b.lower),
            Value::Real(b.upper),
            Value::Integer(b.row_limit),
        ],
    })
}

/// Day span between the earliest and latest matched order, average total,
/// and number of matched rows, over the range query's result.
pub fn aggregate_query(cond: &Conditions) -> Result<Query, QueryError> {
    let inner = range_query(cond)?;
    Ok(Query {
        sql: format!(
            "SELECT CAST(julianday(MAX(t.order_date)) - julianday(MIN(t.order_date)) AS INTEGER) AS gap, \
             AVG(t.grand_total) AS spending, COUNT(*) AS orders \
             FROM ({}) t",
            inner.sql
        ),
        params: inner.params,
    })
}

/// One-line description of the current filter, for display.
pub fn summary(cond: &Conditions) -> String {
    format!(
        "Date: {}~{}/ Total amount: {} ~ {}/ Number of Rows: {}/ ",
        cond.start, cond.end, cond.lower_bound, cond.upper_bound, cond.row_limit
    )
}

/// Narrow a mailbox search to messages after the sync cursor.
pub fn rewrite_search(base: &str, cursor: &Cursor) -> String {
    format!("{} after:{}", base.trim_end(), cursor.search_date())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db, insert_order};
    use crate::models::Order;
    use rusqlite::Connection;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn fixture_conditions() -> Conditions {
        Conditions {
            start: "2021-01-01".to_string(),
            end: "2021-05-01".to_string(),
            lower_bound: "0".to_string(),
            upper_bound: "100".to_string(),
            row_limit: "10".to_string(),
        }
    }

    fn run(conn: &Connection, q: &Query) -> Vec<Order> {
        let mut stmt = conn.prepare(&q.sql).unwrap();
        stmt.query_map(q.bind(), Order::from_row)
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_range_query_binds_values() {
        let q = range_query(&fixture_conditions()).unwrap();
        assert!(!q.sql.contains("2021"));
        assert_eq!(
            q.params,
            vec![
                Value::Text("2021-01-01".to_string()),
                Value::Text("2021-05-01".to_string()),
                Value::Real(0.0),
                Value::Real(100.0),
                Value::Integer(10),
            ]
        );
    }

    #[test]
    fn test_range_query_bounds_are_exclusive() {
        let (_dir, conn) = test_db();
        for order in [
            Order::new("at-start", "2021-01-01", 20.0),
            Order::new("after-start", "2021-01-02", 20.0),
            Order::new("before-end", "2021-04-30", 20.0),
            Order::new("at-end", "2021-05-01", 20.0),
            Order::new("at-upper", "2021-02-01", 100.0),
            Order::new("under-upper", "2021-02-01", 99.99),
            Order::new("just-over-zero", "2021-02-02", 0.01),
            Order::new("too-early", "2020-12-31", 20.0),
        ] {
            insert_order(&conn, &order, None).unwrap();
        }
        let ids: Vec<String> = run(&conn, &range_query(&fixture_conditions()).unwrap())
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids[..2], ["after-start", "under-upper"]);
        assert_eq!(ids[2..], ["just-over-zero", "before-end"]);
    }

    #[test]
    fn test_range_query_respects_row_limit() {
        let (_dir, conn) = test_db();
        for day in 1..=20 {
            let order = Order::new(format!("o{day}"), format!("2021-03-{day:02}"), 10.0);
            insert_order(&conn, &order, None).unwrap();
        }
        let orders = run(&conn, &range_query(&fixture_conditions()).unwrap());
        assert_eq!(orders.len(), 10);
        assert_eq!(orders[0].date, "2021-03-01");
    }

    #[test]
    fn test_hostile_values_are_rejected_not_spliced() {
        let mut cond = fixture_conditions();
        cond.start = "2021-01-01' OR '1'='1".to_string();
        assert!(matches!(range_query(&cond), Err(QueryError::InvalidDate(_))));
        let mut cond = fixture_conditions();
        cond.upper_bound = "100; DROP TABLE orders".to_string();
        assert!(matches!(range_query(&cond), Err(QueryError::InvalidAmount(_))));
    }

    #[test]
    fn test_row_limit_validation() {
        assert_eq!(parse_row_limit("7"), Ok(7));
        assert!(parse_row_limit("0").is_err());
        assert!(parse_row_limit("-3").is_err());
        assert!(parse_row_limit("ten").is_err());
        assert!(parse_row_limit("2.5").is_err());
    }

    #[test]
    fn test_aggregate_query_over_matched_rows() {
        let (_dir, conn) = test_db();
        for order in [
            Order::new("a", "2021-01-10", 10.0),
            Order::new("b", "2021-01-20", 30.0),
            Order::new("c", "2021-02-09", 50.0),
            Order::new("outside", "2021-06-01", 500.0),
        ] {
            insert_order(&conn, &order, None).unwrap();
        }
        let q = aggregate_query(&fixture_conditions()).unwrap();
        let (gap, avg, count): (Option<i64>, Option<f64>, i64) = conn
            .query_row(&q.sql, q.bind(), |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .unwrap();
        assert_eq!(gap, Some(30));
        assert_eq!(avg, Some(30.0));
        assert_eq!(count, 3);
    }

    #[test]
    fn test_aggregate_query_on_empty_match() {
        let (_dir, conn) = test_db();
        let q = aggregate_query(&fixture_conditions()).unwrap();
        let (gap, avg, count): (Option<i64>, Option<f64>, i64) = conn
            .query_row(&q.sql, q.bind(), |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)))
            .unwrap();
        assert_eq!((gap, avg, count), (None, None, 0));
    }

    #[test]
    fn test_summary_line() {
        assert_eq!(
            summary(&Conditions::default()),
            "Date: 2021-01-01~2021-05-01/ Total amount: 0.0 ~ 100000/ Number of Rows: 100/ "
        );
    }

    #[test]
    fn test_rewrite_search_appends_after_clause() {
        let cursor = Cursor::parse("2021-Jan-05").unwrap();
        assert_eq!(
            rewrite_search("from:shop@example.com 'Grand total'", &cursor),
            "from:shop@example.com 'Grand total' after:2021/01/05"
        );
    }
}
