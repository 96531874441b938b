pub mod neuron;
pub mod dense;

pub use neuron::{Neuron, NeuronId, WeightInit};
pub use dense::Layer;
