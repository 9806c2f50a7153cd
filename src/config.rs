use promotion_engine::GateThresholds;
use serde::Deserialize;
use validation_engine::{ValidatorConfig, DEFAULT_SYMBOL_PATTERN};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub validator: ValidatorSettings,
    pub gates: GateThresholds,
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    pub candidates_path: String,
    pub bundle_metrics_path: String,
    #[serde(default = "default_journal_dir")]
    pub journal_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidatorSettings {
    #[serde(default)]
    pub allow_empty_rationale: bool,
    #[serde(default = "default_max_clock_skew_ms")]
    pub max_clock_skew_ms: i64,
    #[serde(default = "default_symbol_pattern")]
    pub symbol_pattern: String,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            allow_empty_rationale: false,
            max_clock_skew_ms: default_max_clock_skew_ms(),
            symbol_pattern: default_symbol_pattern(),
        }
    }
}

impl ValidatorSettings {
    pub fn compile(&self) -> anyhow::Result<ValidatorConfig> {
        Ok(ValidatorConfig::new(
            self.allow_empty_rationale,
            self.max_clock_skew_ms,
            &self.symbol_pattern,
        )?)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    #[serde(default = "default_base_risk")]
    pub base_risk: f64,
    #[serde(default = "default_c_min")]
    pub c_min: f64,
    #[serde(default = "default_equity")]
    pub equity: f64,
    #[serde(default = "default_daily_max_loss")]
    pub daily_max_loss: f64,
    #[serde(default = "default_drawdown_max")]
    pub drawdown_max: f64,
}

fn default_journal_dir() -> String {
    "verdicts".to_string()
}

fn default_max_clock_skew_ms() -> i64 {
    5_000
}

fn default_symbol_pattern() -> String {
    DEFAULT_SYMBOL_PATTERN.to_string()
}

fn default_base_risk() -> f64 {
    0.0025
}

fn default_c_min() -> f64 {
    0.55
}

fn default_equity() -> f64 {
    100_000.0
}

fn default_daily_max_loss() -> f64 {
    0.03
}

fn default_drawdown_max() -> f64 {
    0.1
}

impl AppConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
