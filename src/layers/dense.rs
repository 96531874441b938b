use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::activation::Activation;
use crate::error::{check_len, Result};
use crate::layers::neuron::{Neuron, NeuronId, WeightInit};

/// A fully connected layer. Every neuron shares the same input width and
/// the same activation, held once here and cloned by reference into each
/// neuron.
#[derive(Clone)]
pub struct Layer {
    index: usize,
    input_size: usize,
    neurons: Vec<Neuron>,
    activation: Arc<dyn Activation>,
}

impl Layer {
    /// `index` is the 1-based position of the layer in its network.
    pub fn new<R: Rng + ?Sized>(
        size: usize,
        input_size: usize,
        activation: Arc<dyn Activation>,
        index: usize,
        init: WeightInit,
        rng: &mut R,
    ) -> Layer {
        let neurons = (0..size)
            .map(|i| Neuron::new(input_size, activation.clone(), NeuronId { layer: index, index: i }, init, rng))
            .collect();

        Layer { index, input_size, neurons, activation }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn size(&self) -> usize {
        self.neurons.len()
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub(crate) fn neurons_mut(&mut self) -> &mut [Neuron] {
        &mut self.neurons
    }

    pub fn activation(&self) -> &dyn Activation {
        self.activation.as_ref()
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_len(|| format!("input of layer {}", self.index), self.input_size, input.len())?;
        self.neurons.iter().map(|neuron| neuron.activate(input)).collect()
    }

    /// Transposed weight product: for every input position `j`,
    /// `Σ_k errors[k] * neurons[k].weights[j]`.
    pub fn backpropagate(&self, errors: &[f64]) -> Result<Vec<f64>> {
        check_len(|| format!("errors of layer {}", self.index), self.neurons.len(), errors.len())?;
        let mut upstream = vec![0.0; self.input_size];
        for (neuron, error) in self.neurons.iter().zip(errors.iter()) {
            for (acc, weight) in upstream.iter_mut().zip(neuron.weights().iter()) {
                *acc += error * weight;
            }
        }
        Ok(upstream)
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("index", &self.index)
            .field("input_size", &self.input_size)
            .field("activation", &self.activation.name())
            .field("neurons", &self.neurons)
            .finish()
    }
}
