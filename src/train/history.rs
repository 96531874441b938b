use std::sync::mpsc;

use serde::{Serialize, Deserialize};

use crate::layers::neuron::NeuronId;

/// Components of the gradient computed for one neuron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientRecord {
    pub error: f64,
    pub activation_derivative: f64,
    pub learning_rate: f64,
    pub value: f64,
}

/// Diagnostic trace of one neuron's update for one example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// 0-based.
    pub epoch: usize,
    pub neuron: NeuronId,
    /// |error| compared against the threshold.
    pub error_magnitude: f64,
    #[serde(with = "crate::network::config::threshold_serde")]
    pub threshold: f64,
    pub adjusted: bool,
    pub gradient: GradientRecord,
    /// Parameters after the (possibly skipped) update.
    pub weights: Vec<f64>,
    pub bias: f64,
    pub inputs: Vec<f64>,
    pub outputs: Vec<f64>,
}

/// Receives history records while training. Never read back by training.
pub trait HistorySink {
    fn record(&mut self, record: HistoryRecord);

    /// Records are only built when this returns true.
    fn enabled(&self) -> bool {
        true
    }
}

/// Discards everything without building records.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

impl HistorySink for NoHistory {
    fn record(&mut self, _record: HistoryRecord) {}

    fn enabled(&self) -> bool {
        false
    }
}

impl HistorySink for Vec<HistoryRecord> {
    fn record(&mut self, record: HistoryRecord) {
        self.push(record);
    }
}

/// A dropped receiver silently discards further records.
impl HistorySink for mpsc::Sender<HistoryRecord> {
    fn record(&mut self, record: HistoryRecord) {
        let _ = self.send(record);
    }
}
