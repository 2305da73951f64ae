use crate::dates::normalize_date;
use crate::error::ParseError;
use crate::models::Order;

pub const DELIVERY_TIME: &str = "delivery time:";
pub const GRAND_TOTAL: &str = "Grand total:";
pub const ORDER_ID: &str = "Details Order";

/// Tokens left unscanned at the end of a body so lookahead stays in bounds.
pub const TAIL_MARGIN: usize = 20;

/// Anything that can turn a message body into order fields.
pub trait FieldSource {
    fn extract(&self, body: &str) -> Result<Extraction, ParseError>;
}

/// Fields found in one body. A marker that never appears leaves its field `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub id: Option<String>,
    pub date: Option<String>,
    pub total: Option<f64>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.date.is_none() && self.total.is_none()
    }

    /// `Ok(None)` when nothing matched, an error when only some fields did.
    pub fn into_order(self) -> Result<Option<Order>, ParseError> {
        if self.is_empty() {
            return Ok(None);
        }
        let id = self.id.ok_or(ParseError::MissingField("order id"))?;
        let date = self.date.ok_or(ParseError::MissingField("delivery date"))?;
        let total = self.total.ok_or(ParseError::MissingField("grand total"))?;
        Ok(Some(Order::new(id, date, total)))
    }
}

/// A run of whitespace-separated words matched exactly, case-sensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    words: Vec<String>,
}

impl Marker {
    pub fn new(phrase: &str) -> Self {
        Self {
            words: phrase.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    fn matches_at(&self, tokens: &[&str], i: usize) -> bool {
        !self.words.is_empty()
            && tokens.len() >= i + self.words.len()
            && self.words.iter().zip(&tokens[i..]).all(|(w, t)| w == t)
    }
}

/// Marker layout of one sender's confirmation email.
#[derive(Debug, Clone)]
pub struct Template {
    pub delivery_time: Marker,
    pub grand_total: Marker,
    pub order_id: Marker,
    pub tail_margin: usize,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            delivery_time: Marker::new(DELIVERY_TIME),
            grand_total: Marker::new(GRAND_TOTAL),
            order_id: Marker::new(ORDER_ID),
            tail_margin: TAIL_MARGIN,
        }
    }
}

impl FieldSource for Template {
    /// Single left-to-right pass; the first occurrence of each marker wins.
    fn extract(&self, body: &str) -> Result<Extraction, ParseError> {
        let tokens: Vec<&str> = body.split_whitespace().collect();
        let end = tokens.len().saturating_sub(self.tail_margin);
        let mut found = Extraction::default();

        for i in 0..end {
            if found.date.is_none() && self.delivery_time.matches_at(&tokens, i) {
                let start = i + self.delivery_time.len();
                let phrase = tokens.get(start..start + 4).ok_or_else(|| {
                    let rest = &tokens[start.min(tokens.len())..];
                    ParseError::TooFewTokens(rest.len(), rest.join(" "))
                })?;
                found.date = Some(normalize_date(&phrase.join(" "))?);
            } else if found.total.is_none() && self.grand_total.matches_at(&tokens, i) {
                let raw = tokens
                    .get(i + self.grand_total.len())
                    .copied()
                    .unwrap_or_default();
                found.total = Some(parse_total(raw)?);
            } else if found.id.is_none() && self.order_id.matches_at(&tokens, i) {
                if let Some(id) = tokens.get(i + self.order_id.len()) {
                    found.id = Some(id.to_string());
                }
            }
        }
        Ok(found)
    }
}

/// `"$23.45"` → `23.45`. Only a strictly positive, finite amount is accepted.
pub fn parse_total(raw: &str) -> Result<f64, ParseError> {
    let trimmed = raw.trim_matches('$');
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(ParseError::InvalidTotal(raw.to_string())),
    }
}
