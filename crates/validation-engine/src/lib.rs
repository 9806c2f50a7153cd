pub mod certainty;
pub mod types;
pub mod validator;

pub use certainty::{certainty_score, ensemble_agreement, expected_value, CertaintyInputs, SignalVote};
pub use types::{Candidate, Side};
pub use validator::{validate, validate_at, ValidationError, ValidatorConfig, DEFAULT_SYMBOL_PATTERN};
