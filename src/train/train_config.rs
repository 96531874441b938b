use std::sync::mpsc;
use std::sync::{Arc, atomic::AtomicBool};

use crate::train::epoch_stats::EpochStats;
use crate::train::history::HistorySink;

/// Side channels for a `train_loop` run. Hyperparameters live on the
/// network itself.
///
/// # Fields
/// - `history`:     optional sink receiving one `HistoryRecord` per neuron
///                   per example
/// - `progress_tx`: optional channel sender; one `EpochStats` is sent per
///                   completed epoch. If the receiver is dropped the loop
///                   terminates early.
/// - `stop_flag`:   optional atomic flag, checked between epochs
#[derive(Default)]
pub struct TrainConfig<'a> {
    pub history: Option<&'a mut dyn HistorySink>,
    pub progress_tx: Option<mpsc::Sender<EpochStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl<'a> TrainConfig<'a> {
    /// No history, no progress channel, no stop flag.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(mut self, sink: &'a mut dyn HistorySink) -> Self {
        self.history = Some(sink);
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<EpochStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
