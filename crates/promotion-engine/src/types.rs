use serde::{Deserialize, Serialize};

/// Backtest/holdout metrics for one research bundle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BundleMetrics {
    pub holdout_sharpe: f64,
    pub worst_fold_sharpe: f64,
    pub max_drawdown_pct: f64,
    pub brier_score: f64,
}

/// Direction of a threshold comparison. Both sides are inclusive: a metric
/// exactly at its threshold passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOp {
    AtLeast,
    AtMost,
}

impl GateOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            GateOp::AtLeast => ">=",
            GateOp::AtMost => "<=",
        }
    }
}

/// One threshold comparison, recorded exactly as performed so the verdict is
/// auditable without recomputation.
#[derive(Debug, Clone, Serialize)]
pub struct GateResult {
    pub name: &'static str,
    pub op: GateOp,
    pub threshold: f64,
    pub observed: f64,
    pub pass: bool,
}

impl GateResult {
    pub(crate) fn check(name: &'static str, op: GateOp, threshold: f64, observed: f64) -> Self {
        // A non-finite observation never passes, whatever the comparison
        // would say.
        let pass = observed.is_finite()
            && match op {
                GateOp::AtLeast => observed >= threshold,
                GateOp::AtMost => observed <= threshold,
            };
        Self {
            name,
            op,
            threshold,
            observed,
            pass,
        }
    }
}

/// Outcome of evaluating every gate for a bundle.
///
/// The gate list is the only state; the overall flag is always derived from
/// it, so a failing verdict is traceable to at least one named failing gate.
#[derive(Debug, Clone, Serialize)]
pub struct PromotionVerdict {
    gates: Vec<GateResult>,
}

impl PromotionVerdict {
    pub(crate) fn new(gates: Vec<GateResult>) -> Self {
        Self { gates }
    }

    pub fn gates(&self) -> &[GateResult] {
        &self.gates
    }

    pub fn promoted(&self) -> bool {
        self.gates.iter().all(|g| g.pass)
    }

    pub fn failed_gates(&self) -> impl Iterator<Item = &GateResult> {
        self.gates.iter().filter(|g| !g.pass)
    }
}
