//! Calibrated-certainty blend applied upstream of candidate emission.
//!
//! The scanner's per-strategy signals each carry a confidence; the blend
//! folds their agreement together with model margin, regime fit, calibration
//! quality, and a liquidity penalty into a single probability in [0, 1].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalVote {
    pub name: String,
    pub confidence: f64,
    pub rationale: String,
}

#[derive(Debug, Clone, Copy)]
pub struct CertaintyInputs {
    pub model_margin: f64,
    pub liquidity_penalty: f64,
    pub regime_score: f64,
    pub calibration_score: f64,
}

/// Mean confidence across the ensemble, clamped to [0, 1]. An empty ensemble
/// carries no information and scores 0.
pub fn ensemble_agreement(signals: &[SignalVote]) -> f64 {
    if signals.is_empty() {
        return 0.0;
    }
    let avg = signals.iter().map(|s| s.confidence).sum::<f64>() / signals.len() as f64;
    avg.clamp(0.0, 1.0)
}

pub fn certainty_score(signals: &[SignalVote], inputs: &CertaintyInputs) -> f64 {
    let agreement = ensemble_agreement(signals);
    let score = 0.35 * inputs.model_margin
        + 0.25 * agreement
        + 0.15 * inputs.regime_score
        + 0.15 * inputs.calibration_score
        - 0.10 * inputs.liquidity_penalty;
    score.clamp(0.0, 1.0)
}

pub fn expected_value(edge: f64, costs: f64) -> f64 {
    edge - costs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(confidence: f64) -> SignalVote {
        SignalVote {
            name: "momentum_breakout".to_string(),
            confidence,
            rationale: "VWAP/MA alignment with volume surge".to_string(),
        }
    }

    #[test]
    fn empty_ensemble_has_zero_agreement() {
        assert_eq!(ensemble_agreement(&[]), 0.0);
    }

    #[test]
    fn agreement_is_mean_confidence() {
        let signals = vec![vote(0.8), vote(0.6), vote(0.4)];
        assert!((ensemble_agreement(&signals) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn blend_matches_weighted_sum() {
        let signals = vec![vote(0.8)];
        let inputs = CertaintyInputs {
            model_margin: 0.6,
            liquidity_penalty: 0.2,
            regime_score: 0.5,
            calibration_score: 0.7,
        };
        // 0.35*0.6 + 0.25*0.8 + 0.15*0.5 + 0.15*0.7 - 0.10*0.2
        let expected = 0.21 + 0.2 + 0.075 + 0.105 - 0.02;
        assert!((certainty_score(&signals, &inputs) - expected).abs() < 1e-12);
    }

    #[test]
    fn blend_is_clamped_to_unit_interval() {
        let signals = vec![vote(1.0)];
        let hot = CertaintyInputs {
            model_margin: 3.0,
            liquidity_penalty: 0.0,
            regime_score: 1.0,
            calibration_score: 1.0,
        };
        assert_eq!(certainty_score(&signals, &hot), 1.0);

        let cold = CertaintyInputs {
            model_margin: 0.0,
            liquidity_penalty: 5.0,
            regime_score: 0.0,
            calibration_score: 0.0,
        };
        assert_eq!(certainty_score(&[], &cold), 0.0);
    }

    #[test]
    fn expected_value_is_edge_net_of_costs() {
        assert!((expected_value(0.50, 0.08) - 0.42).abs() < 1e-12);
    }
}
