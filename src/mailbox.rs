use std::path::PathBuf;

use chrono::NaiveDate;
use mail_parser::{Message, MessageParser};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{BasketError, Result};

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub id: String,
    pub date: Option<NaiveDate>,
}

/// Where order emails come from.
pub trait Mailbox {
    /// Messages matching `query`, oldest first, at most `max_results`.
    /// Anything left out is dated no earlier than the last listing.
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Listing>>;

    /// Decoded plain text of the message's first text part.
    fn body(&self, id: &str) -> Result<String>;
}

// ---------------------------------------------------------------------------
// Search expressions
// ---------------------------------------------------------------------------

/// The subset of webmail search syntax the sync query uses:
/// `from:addr` (any of), quoted phrases (all of) and `after:YYYY/MM/DD`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub from: Vec<String>,
    pub phrases: Vec<String>,
    pub after: Option<NaiveDate>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |e: regex::Error| BasketError::Other(format!("search pattern: {e}"));
        let from_re = Regex::new(r"from:([^\s{}()]+)").map_err(invalid)?;
        let phrase_re = Regex::new(r#"'([^']*)'|"([^"]*)""#).map_err(invalid)?;
        let after_re = Regex::new(r"after:(\S+)").map_err(invalid)?;

        let from = from_re
            .captures_iter(raw)
            .map(|c| c[1].to_lowercase())
            .collect();
        let phrases = phrase_re
            .captures_iter(raw)
            .filter_map(|c| c.get(1).or_else(|| c.get(2)))
            .map(|m| m.as_str().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        let after = match after_re.captures(raw) {
            Some(c) => Some(NaiveDate::parse_from_str(&c[1], "%Y/%m/%d").map_err(|_| {
                BasketError::Mailbox(format!("bad after: date in search {raw:?}"))
            })?),
            None => None,
        };
        Ok(Self { from, phrases, after })
    }

    pub fn matches(&self, sender: &str, date: Option<NaiveDate>, text: &str) -> bool {
        let sender = sender.to_lowercase();
        if !self.from.is_empty() && !self.from.iter().any(|f| *f == sender) {
            return false;
        }
        if let Some(after) = self.after {
            match date {
                Some(d) if d >= after => {}
                _ => return false,
            }
        }
        let text = text.to_lowercase();
        self.phrases.iter().all(|p| text.contains(p.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Directory of .eml files
// ---------------------------------------------------------------------------

/// A folder of raw RFC 5322 messages; the file name is the message id.
pub struct DirMailbox {
    root: PathBuf,
}

impl DirMailbox {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read(&self, id: &str) -> Result<Vec<u8>> {
        if id.contains('/') || id.contains('\\') || id.starts_with('.') {
            return Err(BasketError::Mailbox(format!("invalid message id {id:?}")));
        }
        std::fs::read(self.root.join(id))
            .map_err(|e| BasketError::Mailbox(format!("cannot read message {id}: {e}")))
    }
}

fn sender_of(message: &Message<'_>) -> String {
    message
        .from()
        .and_then(|l| l.first())
        .and_then(|a| a.address.as_ref())
        .map(|s| s.to_string())
        .unwrap_or_default()
}

fn date_of(message: &Message<'_>) -> Option<NaiveDate> {
    let dt = message.date()?;
    NaiveDate::from_ymd_opt(dt.year as i32, dt.month as u32, dt.day as u32)
}

impl Mailbox for DirMailbox {
    fn search(&self, query: &str, max_results: usize) -> Result<Vec<Listing>> {
        let search = SearchQuery::parse(query)?;
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            BasketError::Mailbox(format!("cannot open mailbox {}: {e}", self.root.display()))
        })?;

        let mut hits = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.extension().is_some_and(|e| e.eq_ignore_ascii_case("eml")) {
                continue;
            }
            let Some(id) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            let raw = match std::fs::read(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(%id, error = %e, "skipping unreadable message");
                    continue;
                }
            };
            let Some(message) = MessageParser::default().parse(&raw) else {
                warn!(%id, "skipping unparsable message");
                continue;
            };
            let text = format!(
                "{}\n{}",
                message.subject().unwrap_or_default(),
                message.body_text(0).unwrap_or_default()
            );
            let date = date_of(&message);
            if search.matches(&sender_of(&message), date, &text) {
                hits.push(Listing { id, date });
            }
        }

        hits.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(max_results);
        debug!(query, found = hits.len(), "mailbox search");
        Ok(hits)
    }

    fn body(&self, id: &str) -> Result<String> {
        let raw = self.read(id)?;
        let message = MessageParser::default()
            .parse(&raw)
            .ok_or_else(|| BasketError::Mailbox(format!("cannot parse message {id}")))?;
        message
            .body_text(0)
            .map(|b| b.into_owned())
            .ok_or_else(|| BasketError::Mailbox(format!("message {id} has no text body")))
    }
}
