use std::sync::atomic::Ordering;
use std::time::Instant;

use log::{debug, info};

use crate::data::TrainingExample;
use crate::error::{NetworkError, Result};
use crate::loss::ResidualStats;
use crate::network::network::Network;
use crate::train::epoch_stats::EpochStats;
use crate::train::history::{HistorySink, NoHistory};
use crate::train::train_config::TrainConfig;

/// How a `train_loop` run ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSummary {
    pub epochs_run: usize,
    /// True when the stop flag or a dropped progress receiver ended the run.
    pub stopped_early: bool,
    pub last_epoch: Option<EpochStats>,
}

/// Trains `network` for its configured number of epochs, one example at a
/// time, in the order given.
///
/// Every example is checked against the network's input and output widths
/// before the first update, so a malformed dataset fails without touching
/// any weight.
///
/// # Early termination
/// The loop stops between epochs if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
pub fn train_loop(
    network: &mut Network,
    examples: &[TrainingExample],
    config: &mut TrainConfig<'_>,
) -> Result<TrainSummary> {
    if examples.is_empty() {
        return Err(NetworkError::EmptyDataset);
    }
    for example in examples {
        network.check_example(example)?;
    }

    let total_epochs = network.epochs();
    let mut summary = TrainSummary { epochs_run: 0, stopped_early: false, last_epoch: None };
    let mut no_history = NoHistory;

    for epoch in 0..total_epochs {
        if stop_requested(config) {
            summary.stopped_early = true;
            break;
        }

        let t_start = Instant::now();
        let mut residuals = ResidualStats::new();
        let mut adjusted_neurons = 0;

        for example in examples {
            let sink: &mut dyn HistorySink = match config.history.as_mut() {
                Some(sink) => &mut **sink,
                None => &mut no_history,
            };
            let outcome = network.train_example(epoch, example, sink)?;
            residuals.record(&outcome.residuals);
            adjusted_neurons += outcome.adjusted_neurons;
        }

        let stats = EpochStats {
            epoch: epoch + 1,
            total_epochs,
            mean_abs_error: residuals.mean_abs(),
            mean_squared_error: residuals.mean_squared(),
            adjusted_neurons,
            elapsed_ms: t_start.elapsed().as_millis() as u64,
        };
        debug!(
            "epoch {}/{}: mae={:.6} mse={:.6} adjusted={}",
            stats.epoch, stats.total_epochs, stats.mean_abs_error, stats.mean_squared_error, stats.adjusted_neurons
        );
        summary.epochs_run = epoch + 1;
        summary.last_epoch = Some(stats.clone());

        if let Some(ref tx) = config.progress_tx {
            if tx.send(stats).is_err() {
                summary.stopped_early = summary.epochs_run < total_epochs;
                break;
            }
        }
    }

    if summary.stopped_early {
        info!("Training stopped after {} of {} epochs.", summary.epochs_run, total_epochs);
    } else {
        network.lifecycle(format_args!("Training completed after {total_epochs} epochs."));
    }

    Ok(summary)
}

fn stop_requested(config: &TrainConfig<'_>) -> bool {
    config.stop_flag
        .as_ref()
        .map(|flag| flag.load(Ordering::Relaxed))
        .unwrap_or(false)
}
