use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::network::metadata::SnapshotMetadata;

/// Every neuron's weights and bias, indexed `[layer][neuron]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSnapshot {
    #[serde(default, alias = "metaData")]
    pub metadata: Option<SnapshotMetadata>,
    /// `[layer][neuron][input]`.
    pub weights: Vec<Vec<Vec<f64>>>,
    /// `[layer][neuron]`.
    pub biases: Vec<Vec<f64>>,
}

impl TrainingSnapshot {
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn from_blob(blob: &[u8]) -> Result<TrainingSnapshot> {
        Ok(serde_json::from_slice(blob)?)
    }
}
