use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use promotion_engine::{evaluate, BundleMetrics, PromotionVerdict};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use validation_engine::{validate, Candidate, ValidatorConfig};

use crate::config::AppConfig;
use crate::journal::{now_iso, VerdictJournal};
use crate::risk::RiskGuard;

#[derive(Debug)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub sized: usize,
    pub promoted: bool,
}

/// One batch pass: validate every scanner payload, size the survivors, then
/// judge the research bundle against the promotion gates.
pub struct Pipeline {
    config: AppConfig,
    validator: ValidatorConfig,
    risk_guard: RiskGuard,
    journal: VerdictJournal,
    run_id: Uuid,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Result<Self> {
        let validator = config.validator.compile()?;
        let risk_guard = RiskGuard::new(config.risk.clone());
        let mut journal = VerdictJournal::open(PathBuf::from(&config.pipeline.journal_dir))?;

        let run_id = Uuid::new_v4();
        journal.write_event(json!({
            "ts": now_iso(),
            "kind": "run_start",
            "run_id": run_id.to_string(),
            "candidates_path": config.pipeline.candidates_path,
            "bundle_metrics_path": config.pipeline.bundle_metrics_path,
        }));
        info!("journal path: {}", journal.dir().display());

        Ok(Self {
            config,
            validator,
            risk_guard,
            journal,
            run_id,
        })
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let (accepted, rejected) = self.process_candidates()?;

        let mut sized = 0;
        for candidate in &accepted {
            let decision = self.risk_guard.size_candidate(
                candidate.entry_hint,
                candidate.stop,
                candidate.target,
                candidate.certainty,
            );
            if decision.allowed {
                sized += 1;
            }
            self.journal.write_event(json!({
                "ts": now_iso(),
                "kind": "candidate_sized",
                "run_id": self.run_id.to_string(),
                "ticker": candidate.ticker,
                "side": candidate.side,
                "decision": decision,
            }));
        }

        let verdict = self.evaluate_bundle()?;
        let summary = RunSummary {
            accepted: accepted.len(),
            rejected,
            sized,
            promoted: verdict.promoted(),
        };
        info!(
            "run complete: {} accepted, {} rejected, {} sized, promoted={}",
            summary.accepted, summary.rejected, summary.sized, summary.promoted
        );
        Ok(summary)
    }

    /// Validates every payload line. A bad line is journaled and skipped; it
    /// never aborts the rest of the batch.
    fn process_candidates(&mut self) -> Result<(Vec<Candidate>, usize)> {
        let path = &self.config.pipeline.candidates_path;
        let file = File::open(path).with_context(|| format!("open candidates file {}", path))?;

        let mut accepted = Vec::new();
        let mut rejected = 0usize;
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let raw: serde_json::Value = match serde_json::from_str(&line) {
                Ok(value) => value,
                Err(e) => {
                    warn!("line {}: unparseable payload: {}", line_no + 1, e);
                    self.journal_reject(line_no + 1, &format!("unparseable payload: {}", e));
                    rejected += 1;
                    continue;
                }
            };
            match validate(&raw, &self.validator) {
                Ok(candidate) => accepted.push(candidate),
                Err(err) => {
                    warn!("line {}: candidate rejected: {}", line_no + 1, err);
                    self.journal_reject(line_no + 1, &err.to_string());
                    rejected += 1;
                }
            }
        }

        info!("validated {} candidates, rejected {}", accepted.len(), rejected);
        Ok((accepted, rejected))
    }

    fn journal_reject(&mut self, line_no: usize, reason: &str) {
        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "candidate_rejected",
            "run_id": self.run_id.to_string(),
            "line": line_no,
            "reason": reason,
        }));
    }

    fn evaluate_bundle(&mut self) -> Result<PromotionVerdict> {
        let path = &self.config.pipeline.bundle_metrics_path;
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read bundle metrics {}", path))?;
        let metrics: BundleMetrics =
            serde_json::from_str(&content).with_context(|| format!("parse bundle metrics {}", path))?;

        let verdict = evaluate(&metrics, &self.config.gates);
        for gate in verdict.failed_gates() {
            info!(
                "gate failed: {} (required {} {}, observed {})",
                gate.name,
                gate.op.symbol(),
                gate.threshold,
                gate.observed
            );
        }
        self.journal.write_event(json!({
            "ts": now_iso(),
            "kind": "promotion_verdict",
            "run_id": self.run_id.to_string(),
            "promoted": verdict.promoted(),
            "gates": verdict.gates(),
        }));
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &std::path::Path, name: &str, content: &str) -> String {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn config_for(dir: &std::path::Path, candidates: &str, bundle: &str) -> AppConfig {
        let raw = format!(
            r#"
            [pipeline]
            candidates_path = "{}"
            bundle_metrics_path = "{}"
            journal_dir = "{}"

            [gates]
            min_worst_fold_sharpe = 0.30

            [risk]
            c_min = 0.55
            "#,
            candidates,
            bundle,
            dir.join("journal").to_string_lossy(),
        );
        toml::from_str(&raw).unwrap()
    }

    #[test]
    fn bad_candidates_never_abort_the_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        let lines = [
            format!(
                r#"{{"ticker":"AAPL","side":"buy","entry_hint":197.4,"stop":193.2,"target":207.8,"ev":0.42,"certainty":0.78,"rationale":["momentum breakout"],"timestamp":"{}"}}"#,
                now
            ),
            "not json at all".to_string(),
            format!(
                r#"{{"ticker":"MSFT","side":"buy","entry_hint":197.4,"stop":199.0,"target":207.8,"ev":0.42,"certainty":0.78,"rationale":["x"],"timestamp":"{}"}}"#,
                now
            ),
        ];
        let candidates = write_file(tmp.path(), "candidates.jsonl", &(lines.join("\n") + "\n"));
        let bundle = write_file(
            tmp.path(),
            "bundle.json",
            r#"{"holdout_sharpe":0.90,"worst_fold_sharpe":0.40,"max_drawdown_pct":10.0,"brier_score":0.12}"#,
        );

        let config = config_for(tmp.path(), &candidates, &bundle);
        let mut pipeline = Pipeline::new(config).unwrap();
        let summary = pipeline.run().unwrap();

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.sized, 1);
        assert!(summary.promoted);
    }

    #[test]
    fn failing_bundle_is_reported_not_errored() {
        let tmp = tempfile::tempdir().unwrap();
        let candidates = write_file(tmp.path(), "candidates.jsonl", "");
        let bundle = write_file(
            tmp.path(),
            "bundle.json",
            r#"{"holdout_sharpe":0.90,"worst_fold_sharpe":0.40,"max_drawdown_pct":10.01,"brier_score":0.12}"#,
        );

        let config = config_for(tmp.path(), &candidates, &bundle);
        let mut pipeline = Pipeline::new(config).unwrap();
        let summary = pipeline.run().unwrap();
        assert!(!summary.promoted);
        assert_eq!(summary.accepted, 0);
    }
}
