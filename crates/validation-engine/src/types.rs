use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Direction of a trade idea. Only these two values are ever accepted on the
/// wire; anything else is rejected during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, actionable trade idea.
///
/// Constructed only by the validator from an untrusted payload; once built it
/// is never mutated. Price ordering is guaranteed per side: buys satisfy
/// `stop < entry_hint < target`, sells satisfy `target < entry_hint < stop`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub ticker: String,
    pub side: Side,
    pub entry_hint: f64,
    pub stop: f64,
    pub target: f64,
    pub ev: f64,
    pub certainty: f64,
    pub rationale: Vec<String>,
    pub timestamp: DateTime<Utc>,
}
