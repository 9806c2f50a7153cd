use serde::Serialize;

use crate::config::RiskConfig;

#[derive(Debug, Clone, Serialize)]
pub struct RiskDecision {
    pub allowed: bool,
    pub qty: i64,
    pub stop: f64,
    pub target: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircuitBreakerState {
    pub tripped: bool,
    pub reason: String,
}

/// Certainty-scaled bracket sizing and account-level trip wires.
pub struct RiskGuard {
    config: RiskConfig,
}

impl RiskGuard {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    fn risk_multiplier(certainty: f64) -> f64 {
        (0.5 + certainty * 1.5).min(2.0)
    }

    fn reward_multiplier(certainty: f64) -> f64 {
        (1.5 + certainty * 2.0).min(4.0)
    }

    pub fn compute_bracket(&self, entry: f64, atr: f64, certainty: f64) -> (f64, f64) {
        let stop = entry - (1.0 + certainty) * atr;
        let target = entry + Self::reward_multiplier(certainty) * (entry - stop);
        (stop, target)
    }

    pub fn position_size(equity: f64, entry: f64, stop: f64, risk_per_trade: f64) -> i64 {
        // abs: sell brackets put the stop above the entry.
        let per_share_risk = (entry - stop).abs().max(0.01);
        let qty = ((equity * risk_per_trade) / per_share_risk) as i64;
        qty.max(0)
    }

    /// Sizes a trade for an already-validated candidate bracket. Certainty
    /// below the configured floor is a reject, not an error.
    pub fn size_candidate(&self, entry: f64, stop: f64, target: f64, certainty: f64) -> RiskDecision {
        if certainty < self.config.c_min {
            return RiskDecision {
                allowed: false,
                qty: 0,
                stop,
                target,
                rationale: format!(
                    "certainty below threshold: {:.2} < {:.2}",
                    certainty, self.config.c_min
                ),
            };
        }

        let risk_per_trade = self.config.base_risk * Self::risk_multiplier(certainty);
        let qty = Self::position_size(self.config.equity, entry, stop, risk_per_trade);
        RiskDecision {
            allowed: qty > 0,
            qty,
            stop,
            target,
            rationale: "risk sizing ok".to_string(),
        }
    }

    pub fn evaluate_trade(&self, entry: f64, atr: f64, certainty: f64) -> RiskDecision {
        if certainty < self.config.c_min {
            return RiskDecision {
                allowed: false,
                qty: 0,
                stop: 0.0,
                target: 0.0,
                rationale: format!(
                    "certainty below threshold: {:.2} < {:.2}",
                    certainty, self.config.c_min
                ),
            };
        }

        let risk_per_trade = self.config.base_risk * Self::risk_multiplier(certainty);
        let (stop, target) = self.compute_bracket(entry, atr, certainty);
        let qty = Self::position_size(self.config.equity, entry, stop, risk_per_trade);
        RiskDecision {
            allowed: qty > 0,
            qty,
            stop,
            target,
            rationale: "risk sizing ok".to_string(),
        }
    }

    pub fn check_circuit_breaker(&self, daily_loss: f64, drawdown: f64) -> CircuitBreakerState {
        if daily_loss <= -self.config.daily_max_loss {
            return CircuitBreakerState {
                tripped: true,
                reason: "daily loss limit exceeded".to_string(),
            };
        }
        if drawdown >= self.config.drawdown_max {
            return CircuitBreakerState {
                tripped: true,
                reason: "drawdown limit exceeded".to_string(),
            };
        }
        CircuitBreakerState {
            tripped: false,
            reason: "ok".to_string(),
        }
    }
}
