use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use rand::{rngs::StdRng, SeedableRng};

use crate::activation::Activation;
use crate::data::TrainingExample;
use crate::error::{check_len, Result};
use crate::layers::dense::Layer;
use crate::network::config::{
    validate_error_threshold, validate_learning_rate, validate_training_name, NetworkConfig,
};
use crate::network::metadata::SnapshotMetadata;
use crate::optim::threshold_sgd::ThresholdSgd;
use crate::persistence::snapshot::TrainingSnapshot;
use crate::persistence::store::ParameterStore;
use crate::train::history::{GradientRecord, HistoryRecord, HistorySink};
use crate::train::loop_fn::{train_loop, TrainSummary};
use crate::train::train_config::TrainConfig;

/// Result of training on a single example.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleOutcome {
    /// `target - output`, measured before the update.
    pub residuals: Vec<f64>,
    /// Neurons that passed the threshold gate.
    pub adjusted_neurons: usize,
}

/// A stack of dense layers trained by thresholded online gradient descent.
///
/// Layer `i` (0-based in `layers()`, 1-based in neuron ids) takes
/// `sizes[i]` inputs and has `sizes[i + 1]` neurons.
pub struct Network {
    layers: Vec<Layer>,
    optimizer: ThresholdSgd,
    epochs: usize,
    training_name: String,
    show_logs: bool,
    record_history: bool,
    history: Vec<HistoryRecord>,
}

impl Network {
    /// Builds a network using the built-in activation named in `config`.
    pub fn new(config: NetworkConfig) -> Result<Network> {
        let activation = config.activation.shared();
        Network::with_activation(config, activation)
    }

    /// Builds a network with an arbitrary activation pair, shared by every
    /// neuron of every layer. `config.activation` is ignored.
    pub fn with_activation(config: NetworkConfig, activation: Arc<dyn Activation>) -> Result<Network> {
        if let Err(e) = config.validate() {
            warn!("Invalid network configuration: {e}");
            return Err(e);
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let layers = config.sizes
            .windows(2)
            .enumerate()
            .map(|(i, pair)| Layer::new(pair[1], pair[0], activation.clone(), i + 1, config.weight_init, &mut rng))
            .collect();

        let network = Network {
            layers,
            optimizer: ThresholdSgd::new(config.learning_rate, config.error_threshold),
            epochs: config.epochs,
            training_name: config.resolved_training_name(),
            show_logs: config.show_logs,
            record_history: config.record_history,
            history: Vec::new(),
        };
        network.lifecycle(format_args!("Network metadata: {:?}", network.metadata()));
        Ok(network)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Input width followed by every layer's neuron count.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::with_capacity(self.layers.len() + 1);
        sizes.push(self.input_size());
        sizes.extend(self.layers.iter().map(Layer::size));
        sizes
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map(Layer::input_size).unwrap_or(0)
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map(Layer::size).unwrap_or(0)
    }

    pub fn learning_rate(&self) -> f64 {
        self.optimizer.learning_rate
    }

    pub fn set_learning_rate(&mut self, learning_rate: f64) -> Result<()> {
        validate_learning_rate(learning_rate)?;
        self.optimizer.learning_rate = learning_rate;
        Ok(())
    }

    pub fn error_threshold(&self) -> f64 {
        self.optimizer.error_threshold
    }

    pub fn set_error_threshold(&mut self, error_threshold: f64) -> Result<()> {
        validate_error_threshold(error_threshold)?;
        self.optimizer.error_threshold = error_threshold;
        Ok(())
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn training_name(&self) -> &str {
        &self.training_name
    }

    pub fn set_training_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        validate_training_name(&name)?;
        self.training_name = name;
        Ok(())
    }

    pub fn show_logs(&self) -> bool {
        self.show_logs
    }

    pub fn set_show_logs(&mut self, show_logs: bool) {
        self.show_logs = show_logs;
    }

    pub fn record_history(&self) -> bool {
        self.record_history
    }

    pub fn set_record_history(&mut self, record_history: bool) {
        self.record_history = record_history;
    }

    /// Records collected by `train` while history recording was enabled.
    pub fn history(&self) -> &[HistoryRecord] {
        &self.history
    }

    pub fn take_history(&mut self) -> Vec<HistoryRecord> {
        std::mem::take(&mut self.history)
    }

    pub fn metadata(&self) -> SnapshotMetadata {
        SnapshotMetadata {
            training_name: Some(self.training_name.clone()),
            sizes: Some(self.sizes()),
            learning_rate: Some(self.learning_rate()),
            epochs: Some(self.epochs),
            error_threshold: Some(self.error_threshold()),
            activation: self.layers.first().map(|layer| layer.activation().name()),
        }
    }

    // -----------------------------------------------------------------------
    // Inference
    // -----------------------------------------------------------------------

    /// Activation trace: the raw input followed by every layer's output.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<Vec<f64>>> {
        check_len(|| "network input".to_string(), self.input_size(), input.len())?;
        let mut trace = Vec::with_capacity(self.layers.len() + 1);
        trace.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.forward(&trace[trace.len() - 1])?;
            trace.push(next);
        }
        Ok(trace)
    }

    /// Output of the last layer.
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let mut trace = self.forward(input)?;
        Ok(trace.pop().unwrap_or_default())
    }

    // -----------------------------------------------------------------------
    // Training
    // -----------------------------------------------------------------------

    /// Signed residuals `target[i] - output[i]` for the last entry of `trace`.
    pub fn output_errors(&self, trace: &[Vec<f64>], targets: &[f64]) -> Result<Vec<f64>> {
        check_len(|| "network target".to_string(), self.output_size(), targets.len())?;
        let output = trace.last().map(Vec::as_slice).unwrap_or_default();
        check_len(|| "network output".to_string(), self.output_size(), output.len())?;
        Ok(targets.iter().zip(output.iter()).map(|(t, o)| t - o).collect())
    }

    /// Per-layer error vectors, first layer to last, starting from the
    /// output residuals.
    ///
    /// Errors travel backwards through the transposed weights only; no
    /// activation derivative is folded into the signal between layers. The
    /// derivative is applied once per neuron, at its own output, in the
    /// weight update.
    pub fn calculate_errors(&self, output_errors: Vec<f64>) -> Result<Vec<Vec<f64>>> {
        let mut errors = vec![output_errors];
        for layer in self.layers.iter().skip(1).rev() {
            let upstream = layer.backpropagate(&errors[0])?;
            errors.insert(0, upstream);
        }
        Ok(errors)
    }

    /// Checks an example against the input and output widths.
    pub fn check_example(&self, example: &TrainingExample) -> Result<()> {
        check_len(|| "training inputs".to_string(), self.input_size(), example.inputs.len())?;
        check_len(|| "training targets".to_string(), self.output_size(), example.targets.len())
    }

    /// One forward pass, error computation and gated weight update.
    /// Pass `&mut NoHistory` when no diagnostics are wanted.
    ///
    /// Layers are adjusted from last to first. Each layer's update uses the
    /// activation trace from before any update in this call.
    pub fn train_example(
        &mut self,
        epoch: usize,
        example: &TrainingExample,
        history: &mut dyn HistorySink,
    ) -> Result<ExampleOutcome> {
        self.check_example(example)?;
        let trace = self.forward(&example.inputs)?;
        let residuals = self.output_errors(&trace, &example.targets)?;
        let errors = self.calculate_errors(residuals.clone())?;

        let optimizer = self.optimizer;
        let mut adjusted_neurons = 0;
        for (i, layer) in self.layers.iter_mut().enumerate().rev() {
            let (inputs, outputs) = (&trace[i], &trace[i + 1]);
            for (n, neuron) in layer.neurons_mut().iter_mut().enumerate() {
                let adjustment = optimizer.step(neuron, inputs, outputs[n], errors[i][n])?;
                if adjustment.adjusted {
                    adjusted_neurons += 1;
                }
                if history.enabled() {
                    history.record(HistoryRecord {
                        epoch,
                        neuron: neuron.id(),
                        error_magnitude: adjustment.error.abs(),
                        threshold: optimizer.error_threshold,
                        adjusted: adjustment.adjusted,
                        gradient: GradientRecord {
                            error: adjustment.error,
                            activation_derivative: adjustment.derivative,
                            learning_rate: optimizer.learning_rate,
                            value: adjustment.gradient,
                        },
                        weights: neuron.weights().to_vec(),
                        bias: neuron.bias(),
                        inputs: inputs.clone(),
                        outputs: outputs.clone(),
                    });
                }
            }
        }

        Ok(ExampleOutcome { residuals, adjusted_neurons })
    }

    /// Trains for the configured number of epochs. When history recording
    /// is enabled the records are appended to `history()`.
    pub fn train(&mut self, examples: &[TrainingExample]) -> Result<TrainSummary> {
        let mut records = std::mem::take(&mut self.history);
        let result = if self.record_history {
            let mut config = TrainConfig::new().with_history(&mut records);
            train_loop(self, examples, &mut config)
        } else {
            train_loop(self, examples, &mut TrainConfig::new())
        };
        self.history = records;
        result
    }

    /// Trains with caller-supplied side channels.
    pub fn train_with(&mut self, examples: &[TrainingExample], config: &mut TrainConfig<'_>) -> Result<TrainSummary> {
        train_loop(self, examples, config)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn snapshot(&self) -> TrainingSnapshot {
        TrainingSnapshot {
            metadata: Some(self.metadata()),
            weights: self.layers.iter()
                .map(|layer| layer.neurons().iter().map(|n| n.weights().to_vec()).collect())
                .collect(),
            biases: self.layers.iter()
                .map(|layer| layer.neurons().iter().map(|n| n.bias()).collect())
                .collect(),
        }
    }

    /// Overwrites every weight and bias from `snapshot`.
    ///
    /// The whole snapshot is checked against the topology first; on a
    /// mismatch nothing is modified.
    pub fn apply_snapshot(&mut self, snapshot: &TrainingSnapshot) -> Result<()> {
        check_len(|| "snapshot weight layers".to_string(), self.layers.len(), snapshot.weights.len())?;
        check_len(|| "snapshot bias layers".to_string(), self.layers.len(), snapshot.biases.len())?;
        for (layer, (weights, biases)) in self.layers.iter().zip(snapshot.weights.iter().zip(&snapshot.biases)) {
            let l = layer.index();
            check_len(|| format!("snapshot neurons of layer {l}"), layer.size(), weights.len())?;
            check_len(|| format!("snapshot biases of layer {l}"), layer.size(), biases.len())?;
            for (n, row) in weights.iter().enumerate() {
                check_len(|| format!("snapshot weights of neuron [{l}, {n}]"), layer.input_size(), row.len())?;
            }
        }

        for (layer, (weights, biases)) in self.layers.iter_mut().zip(snapshot.weights.iter().zip(&snapshot.biases)) {
            for (neuron, (row, bias)) in layer.neurons_mut().iter_mut().zip(weights.iter().zip(biases)) {
                neuron.set_parameters(row, *bias)?;
            }
        }
        Ok(())
    }

    /// Writes the current parameters under the training name.
    pub fn save_training<S: ParameterStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let blob = self.snapshot().to_blob()?;
        store.save(&self.training_name, &blob)?;
        self.lifecycle(format_args!("Training saved successfully as {:?}.", self.training_name));
        Ok(())
    }

    /// Restores parameters saved under the training name.
    ///
    /// Returns `Ok(false)` and leaves the network untouched when nothing was
    /// saved under that name.
    pub fn load_training<S: ParameterStore + ?Sized>(&mut self, store: &S) -> Result<bool> {
        let blob = match store.load(&self.training_name)? {
            Some(blob) => blob,
            None => {
                self.lifecycle(format_args!("Training {:?} was not loaded.", self.training_name));
                return Ok(false);
            }
        };
        let snapshot = TrainingSnapshot::from_blob(&blob)?;
        self.apply_snapshot(&snapshot)?;
        self.lifecycle(format_args!("Training {:?} loaded successfully.", self.training_name));
        Ok(true)
    }

    pub(crate) fn lifecycle(&self, message: fmt::Arguments<'_>) {
        if self.show_logs {
            info!("{message}");
        } else {
            debug!("{message}");
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("training_name", &self.training_name)
            .field("sizes", &self.sizes())
            .field("optimizer", &self.optimizer)
            .field("epochs", &self.epochs)
            .field("layers", &self.layers)
            .finish()
    }
}
