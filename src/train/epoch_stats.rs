use serde::{Serialize, Deserialize};

/// Per-epoch training statistics emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop
/// sends one `EpochStats` value at the end of every completed epoch. The
/// error figures are measured on each example's forward pass *before* its
/// weight update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    pub total_epochs: usize,
    /// Mean |target - output| over every output of every example.
    pub mean_abs_error: f64,
    pub mean_squared_error: f64,
    /// Neurons whose error passed the threshold gate, summed over examples.
    pub adjusted_neurons: usize,
    pub elapsed_ms: u64,
}
