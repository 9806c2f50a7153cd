use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::types::{Candidate, Side};

/// Exchange-symbol grammar: uppercase alphanumerics, optional class suffix.
pub const DEFAULT_SYMBOL_PATTERN: &str = r"^[A-Z0-9]{1,6}(\.[A-Z]{1,2})?$";

const DEFAULT_MAX_CLOCK_SKEW_MS: i64 = 5_000;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("missing or malformed field `{field}`: {reason}")]
    Structural { field: &'static str, reason: String },

    #[error("`{field}` out of range: {value} (allowed: {constraint})")]
    OutOfRange {
        field: &'static str,
        value: String,
        constraint: &'static str,
    },

    #[error("inconsistent price ordering for {side} candidate: entry={entry_hint} stop={stop} target={target}")]
    Inconsistent {
        side: Side,
        entry_hint: f64,
        stop: f64,
        target: f64,
    },

    #[error("rationale must contain at least one entry")]
    EmptyRationale,

    #[error("rationale entry {0} is blank")]
    BlankRationaleEntry(usize),

    #[error("timestamp is not an RFC 3339 instant: {0}")]
    BadTimestamp(String),

    #[error("timestamp is {skew_ms}ms in the future, beyond tolerance")]
    FutureTimestamp { skew_ms: i64 },
}

/// Validator options. The symbol pattern is compiled once here so validation
/// itself stays allocation-light and infallible on the config side.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub allow_empty_rationale: bool,
    pub max_clock_skew_ms: i64,
    symbol_pattern: Regex,
}

impl ValidatorConfig {
    pub fn new(
        allow_empty_rationale: bool,
        max_clock_skew_ms: i64,
        symbol_pattern: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            allow_empty_rationale,
            max_clock_skew_ms,
            symbol_pattern: Regex::new(symbol_pattern)?,
        })
    }

    pub fn symbol_pattern(&self) -> &str {
        self.symbol_pattern.as_str()
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            allow_empty_rationale: false,
            max_clock_skew_ms: DEFAULT_MAX_CLOCK_SKEW_MS,
            symbol_pattern: Regex::new(DEFAULT_SYMBOL_PATTERN)
                .expect("default symbol pattern compiles"),
        }
    }
}

/// Validates an untrusted candidate payload against the current clock.
pub fn validate(raw: &Value, config: &ValidatorConfig) -> Result<Candidate, ValidationError> {
    validate_at(raw, config, Utc::now())
}

/// Validates an untrusted candidate payload against an explicit clock.
///
/// Checks run in a fixed order and short-circuit on the first failure:
/// structure, domain ranges, price-ordering consistency, rationale, then
/// timestamp. All-or-nothing: no partial candidate is ever returned.
pub fn validate_at(
    raw: &Value,
    config: &ValidatorConfig,
    now: DateTime<Utc>,
) -> Result<Candidate, ValidationError> {
    // 1. Structure: every field present and of the right primitive kind.
    let ticker = require_string(raw, "ticker")?;
    let side_raw = require_string(raw, "side")?;
    let entry_hint = require_number(raw, "entry_hint")?;
    let stop = require_number(raw, "stop")?;
    let target = require_number(raw, "target")?;
    let ev = require_number(raw, "ev")?;
    let certainty = require_number(raw, "certainty")?;
    let rationale = require_string_array(raw, "rationale")?;
    let timestamp_raw = require_string(raw, "timestamp")?;

    // 2. Domain ranges.
    if ticker.is_empty() || !config.symbol_pattern.is_match(&ticker) {
        return Err(ValidationError::OutOfRange {
            field: "ticker",
            value: ticker,
            constraint: "exchange symbol grammar",
        });
    }
    let side = match side_raw.as_str() {
        "buy" => Side::Buy,
        "sell" => Side::Sell,
        _ => {
            return Err(ValidationError::OutOfRange {
                field: "side",
                value: side_raw,
                constraint: "buy|sell",
            })
        }
    };
    for (field, value) in [("entry_hint", entry_hint), ("stop", stop), ("target", target)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field,
                value: value.to_string(),
                constraint: "positive finite",
            });
        }
    }
    if !ev.is_finite() {
        return Err(ValidationError::OutOfRange {
            field: "ev",
            value: ev.to_string(),
            constraint: "finite",
        });
    }
    if !certainty.is_finite() || !(0.0..=1.0).contains(&certainty) {
        return Err(ValidationError::OutOfRange {
            field: "certainty",
            value: certainty.to_string(),
            constraint: "[0,1]",
        });
    }

    // 3. Consistency: price ordering per side. A violation here is a logical
    // contradiction in the payload, reported distinctly from range errors.
    let ordered = match side {
        Side::Buy => stop < entry_hint && entry_hint < target,
        Side::Sell => target < entry_hint && entry_hint < stop,
    };
    if !ordered {
        return Err(ValidationError::Inconsistent {
            side,
            entry_hint,
            stop,
            target,
        });
    }

    // 4. Rationale.
    if rationale.is_empty() && !config.allow_empty_rationale {
        return Err(ValidationError::EmptyRationale);
    }
    if let Some(index) = rationale.iter().position(|r| r.trim().is_empty()) {
        return Err(ValidationError::BlankRationaleEntry(index));
    }

    // 5. Timestamp: absolute instant, not in the future beyond tolerance.
    let timestamp = DateTime::parse_from_rfc3339(&timestamp_raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| ValidationError::BadTimestamp(timestamp_raw.clone()))?;
    let skew = timestamp - now;
    if skew > Duration::milliseconds(config.max_clock_skew_ms) {
        return Err(ValidationError::FutureTimestamp {
            skew_ms: skew.num_milliseconds(),
        });
    }

    Ok(Candidate {
        ticker,
        side,
        entry_hint,
        stop,
        target,
        ev,
        certainty,
        rationale,
        timestamp,
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require_field<'a>(raw: &'a Value, field: &'static str) -> Result<&'a Value, ValidationError> {
    raw.get(field).ok_or(ValidationError::Structural {
        field,
        reason: "missing".to_string(),
    })
}

fn require_string(raw: &Value, field: &'static str) -> Result<String, ValidationError> {
    let value = require_field(raw, field)?;
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ValidationError::Structural {
            field,
            reason: format!("expected string, got {}", kind_of(value)),
        })
}

fn require_number(raw: &Value, field: &'static str) -> Result<f64, ValidationError> {
    let value = require_field(raw, field)?;
    value.as_f64().ok_or_else(|| ValidationError::Structural {
        field,
        reason: format!("expected number, got {}", kind_of(value)),
    })
}

fn require_string_array(raw: &Value, field: &'static str) -> Result<Vec<String>, ValidationError> {
    let value = require_field(raw, field)?;
    let items = value.as_array().ok_or_else(|| ValidationError::Structural {
        field,
        reason: format!("expected array, got {}", kind_of(value)),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_owned)
                .ok_or_else(|| ValidationError::Structural {
                    field,
                    reason: format!("element {} is {}, expected string", i, kind_of(item)),
                })
        })
        .collect()
}
