use serde::{Deserialize, Serialize};

/// Hyperparameters recorded next to a parameter snapshot.
///
/// Informational only: loading never reads these back into the network.
/// All fields are optional so snapshots written without metadata still
/// deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SnapshotMetadata {
    pub training_name: Option<String>,
    pub sizes: Option<Vec<usize>>,
    pub learning_rate: Option<f64>,
    pub epochs: Option<usize>,
    pub error_threshold: Option<f64>,
    /// `Activation::name()` of the layers.
    pub activation: Option<String>,
}
