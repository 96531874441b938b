pub mod threshold_sgd;

pub use threshold_sgd::{Adjustment, ThresholdSgd};
