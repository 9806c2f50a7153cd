//! Time-ordered dataset splits backing the holdout metrics the gates judge.

use std::ops::Range;

/// 70/15/15 train/validation/holdout partition over `total` samples, with
/// integer truncation at the boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSplit {
    pub train: Range<usize>,
    pub val: Range<usize>,
    pub holdout: Range<usize>,
}

pub fn time_split(total: usize) -> TimeSplit {
    let train_end = total * 70 / 100;
    let val_end = total * 85 / 100;
    TimeSplit {
        train: 0..train_end,
        val: train_end..val_end,
        holdout: val_end..total,
    }
}

/// Walk-forward (train, validation) windows stepped across the sample range.
/// With `expanding` the train window always starts at 0; otherwise it rolls
/// forward with the step.
pub fn walk_forward_splits(
    total: usize,
    train_window: usize,
    val_window: usize,
    step: usize,
    expanding: bool,
) -> Vec<(Range<usize>, Range<usize>)> {
    let mut splits = Vec::new();
    if step == 0 {
        return splits;
    }
    let mut start = 0;
    while start + train_window + val_window <= total {
        let train_start = if expanding { 0 } else { start };
        let train_end = start + train_window;
        let val_end = train_end + val_window;
        splits.push((train_start..train_end, train_end..val_end));
        start += step;
    }
    splits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_samples_split_70_15_15() {
        let split = time_split(100);
        assert_eq!(split.train, 0..70);
        assert_eq!(split.val, 70..85);
        assert_eq!(split.holdout, 85..100);
    }

    #[test]
    fn expanding_walk_forward_windows() {
        let splits = walk_forward_splits(100, 60, 10, 10, true);
        assert_eq!(splits[0], (0..60, 60..70));
        assert_eq!(splits[1], (0..70, 70..80));
        assert_eq!(splits.len(), 4);
    }

    #[test]
    fn rolling_walk_forward_moves_the_train_start() {
        let splits = walk_forward_splits(100, 60, 10, 10, false);
        assert_eq!(splits[1], (10..70, 70..80));
    }

    #[test]
    fn degenerate_inputs_yield_no_windows() {
        assert!(walk_forward_splits(50, 60, 10, 10, true).is_empty());
        assert!(walk_forward_splits(100, 60, 10, 0, true).is_empty());
    }
}
