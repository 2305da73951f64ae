use serde::{Deserialize, Serialize};

/// One purchase pulled from a confirmation email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub total: f64,
}

impl Order {
    pub fn new(id: impl Into<String>, date: impl Into<String>, total: f64) -> Self {
        Self {
            id: id.into(),
            date: date.into(),
            total,
        }
    }

    /// Build from a stored row `(key, order_id, order_date, grand_total)`.
    /// The storage key is read and dropped.
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        let _key: i64 = row.get(0)?;
        Ok(Self {
            id: row.get(1)?,
            date: row.get(2)?,
            total: row.get(3)?,
        })
    }

    pub fn summary(&self) -> String {
        format!("{} {} {}", self.id, self.date, self.total)
    }
}

/// Filter used to pull orders back out of the store.
///
/// Every field always holds a value; editing replaces one group at a time
/// (dates, amounts, row cap). Values stay as entered and are checked when a
/// query is built from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conditions {
    pub start: String,
    pub end: String,
    pub lower_bound: String,
    pub upper_bound: String,
    pub row_limit: String,
}

pub const DEFAULT_ROW_LIMIT: &str = "100";
pub const STATS_ROW_LIMIT: &str = "7";

impl Default for Conditions {
    fn default() -> Self {
        Self {
            start: "2021-01-01".to_string(),
            end: "2021-05-01".to_string(),
            lower_bound: "0.0".to_string(),
            upper_bound: "100000".to_string(),
            row_limit: DEFAULT_ROW_LIMIT.to_string(),
        }
    }
}

impl Conditions {
    /// Defaults used by the stats menu: same window, capped at 7 rows.
    pub fn for_stats() -> Self {
        Self {
            row_limit: STATS_ROW_LIMIT.to_string(),
            ..Self::default()
        }
    }

    pub fn set_dates(&mut self, start: impl Into<String>, end: impl Into<String>) {
        self.start = start.into();
        self.end = end.into();
    }

    pub fn set_amounts(&mut self, lower: impl Into<String>, upper: impl Into<String>) {
        self.lower_bound = lower.into();
        self.upper_bound = upper.into();
    }

    pub fn set_row_limit(&mut self, limit: impl Into<String>) {
        self.row_limit = limit.into();
    }

    /// Apply optional CLI overrides on top of the current values.
    pub fn with_overrides(
        mut self,
        from: Option<&str>,
        to: Option<&str>,
        min: Option<&str>,
        max: Option<&str>,
        limit: Option<&str>,
    ) -> Self {
        if let Some(v) = from {
            self.start = v.to_string();
        }
        if let Some(v) = to {
            self.end = v.to_string();
        }
        if let Some(v) = min {
            self.lower_bound = v.to_string();
        }
        if let Some(v) = max {
            self.upper_bound = v.to_string();
        }
        if let Some(v) = limit {
            self.row_limit = v.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_conditions() {
        let c = Conditions::default();
        assert_eq!(c.start, "2021-01-01");
        assert_eq!(c.end, "2021-05-01");
        assert_eq!(c.lower_bound, "0.0");
        assert_eq!(c.upper_bound, "100000");
        assert_eq!(c.row_limit, "100");
        assert_eq!(Conditions::for_stats().row_limit, "7");
    }

    #[test]
    fn test_setters_replace_one_group() {
        let mut c = Conditions::default();
        c.set_amounts("10", "50");
        assert_eq!(c.lower_bound, "10");
        assert_eq!(c.upper_bound, "50");
        assert_eq!(c.start, "2021-01-01");
        c.set_dates("2021-02-01", "2021-03-01");
        c.set_row_limit("5");
        assert_eq!(c.end, "2021-03-01");
        assert_eq!(c.row_limit, "5");
    }

    #[test]
    fn test_overrides_only_touch_given_fields() {
        let c = Conditions::default().with_overrides(
            Some("2021-03-01"),
            None,
            None,
            Some("75"),
            None,
        );
        assert_eq!(c.start, "2021-03-01");
        assert_eq!(c.end, "2021-05-01");
        assert_eq!(c.upper_bound, "75");
        assert_eq!(c.row_limit, "100");
    }

    #[test]
    fn test_order_json_keys() {
        let order = Order::new("112-1", "2021-01-05", 23.45);
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], "112-1");
        assert_eq!(json["date"], "2021-01-05");
        assert_eq!(json["total"], 23.45);
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}
