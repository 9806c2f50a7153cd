use serde::Deserialize;

use crate::types::{BundleMetrics, GateOp, GateResult, PromotionVerdict};

/// Gate thresholds. Defaults mirror the reference promotion policy, except
/// `min_worst_fold_sharpe`, which has no sanctioned default and must be
/// supplied explicitly by the caller or config file.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct GateThresholds {
    #[serde(default = "default_min_holdout_sharpe")]
    pub min_holdout_sharpe: f64,
    pub min_worst_fold_sharpe: f64,
    #[serde(default = "default_max_drawdown_pct")]
    pub max_drawdown_pct: f64,
    #[serde(default = "default_max_brier_score")]
    pub max_brier_score: f64,
}

fn default_min_holdout_sharpe() -> f64 {
    0.90
}

fn default_max_drawdown_pct() -> f64 {
    10.0
}

fn default_max_brier_score() -> f64 {
    0.12
}

impl GateThresholds {
    pub fn new(min_worst_fold_sharpe: f64) -> Self {
        Self {
            min_holdout_sharpe: default_min_holdout_sharpe(),
            min_worst_fold_sharpe,
            max_drawdown_pct: default_max_drawdown_pct(),
            max_brier_score: default_max_brier_score(),
        }
    }
}

/// Evaluates every gate unconditionally and combines them with logical AND.
///
/// No short-circuiting: the dashboard shows all four gates at once, so every
/// gate's status must be present even when an earlier one already failed.
pub fn evaluate(metrics: &BundleMetrics, thresholds: &GateThresholds) -> PromotionVerdict {
    PromotionVerdict::new(vec![
        GateResult::check(
            "holdout_sharpe",
            GateOp::AtLeast,
            thresholds.min_holdout_sharpe,
            metrics.holdout_sharpe,
        ),
        GateResult::check(
            "worst_fold_sharpe",
            GateOp::AtLeast,
            thresholds.min_worst_fold_sharpe,
            metrics.worst_fold_sharpe,
        ),
        GateResult::check(
            "max_drawdown_pct",
            GateOp::AtMost,
            thresholds.max_drawdown_pct,
            metrics.max_drawdown_pct,
        ),
        GateResult::check(
            "brier_score",
            GateOp::AtMost,
            thresholds.max_brier_score,
            metrics.brier_score,
        ),
    ])
}
