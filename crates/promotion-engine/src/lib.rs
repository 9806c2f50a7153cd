pub mod engine;
pub mod splits;
pub mod types;

pub use engine::{evaluate, GateThresholds};
pub use splits::{time_split, walk_forward_splits, TimeSplit};
pub use types::{BundleMetrics, GateOp, GateResult, PromotionVerdict};
