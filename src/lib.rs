pub mod error;
pub mod activation;
pub mod layers;
pub mod optim;
pub mod loss;
pub mod data;
pub mod network;
pub mod train;
pub mod persistence;

// Convenience re-exports
pub use error::{NetworkError, Result};
pub use activation::{Activation, ActivationFunction, CustomActivation};
pub use layers::{Layer, Neuron, NeuronId, WeightInit};
pub use optim::ThresholdSgd;
pub use data::TrainingExample;
pub use network::{Network, NetworkConfig, SnapshotMetadata};
pub use network::network::ExampleOutcome;
pub use train::{EpochStats, HistoryRecord, HistorySink, NoHistory, TrainConfig, TrainSummary};
pub use persistence::{JsonFileStore, MemoryStore, ParameterStore, TrainingSnapshot};
