use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::Activation;
use crate::error::{check_len, Result};

/// Position of a neuron in the network. Layer indices start at 1; index 0
/// is the raw input vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronId {
    pub layer: usize,
    pub index: usize,
}

impl fmt::Display for NeuronId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.layer, self.index)
    }
}

/// How fresh weights and biases are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WeightInit {
    /// Uniform in [-0.5, 0.5).
    #[default]
    Uniform,
    /// Every weight and bias starts at a fixed value.
    Constant { weight: f64, bias: f64 },
}

impl WeightInit {
    fn weight<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            WeightInit::Uniform => rng.gen::<f64>() - 0.5,
            WeightInit::Constant { weight, .. } => *weight,
        }
    }

    fn bias<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            WeightInit::Uniform => rng.gen::<f64>() - 0.5,
            WeightInit::Constant { bias, .. } => *bias,
        }
    }
}

/// A single unit: `activation(bias + Σ inputs[k] * weights[k])`.
///
/// The weight vector length is fixed at construction; every mutation goes
/// through `adjust` or `set_parameters`, both of which preserve it.
#[derive(Clone)]
pub struct Neuron {
    id: NeuronId,
    weights: Vec<f64>,
    bias: f64,
    activation: Arc<dyn Activation>,
}

impl Neuron {
    pub fn new<R: Rng + ?Sized>(
        input_size: usize,
        activation: Arc<dyn Activation>,
        id: NeuronId,
        init: WeightInit,
        rng: &mut R,
    ) -> Neuron {
        let weights = (0..input_size).map(|_| init.weight(rng)).collect();
        let bias = init.bias(rng);
        Neuron { id, weights, bias, activation }
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn input_size(&self) -> usize {
        self.weights.len()
    }

    pub fn activation(&self) -> &dyn Activation {
        self.activation.as_ref()
    }

    pub fn weighted_sum(&self, inputs: &[f64]) -> Result<f64> {
        check_len(|| format!("inputs of neuron {}", self.id), self.weights.len(), inputs.len())?;
        Ok(inputs.iter()
            .zip(self.weights.iter())
            .fold(self.bias, |sum, (input, weight)| sum + input * weight))
    }

    pub fn activate(&self, inputs: &[f64]) -> Result<f64> {
        Ok(self.activation.apply(self.weighted_sum(inputs)?))
    }

    /// `bias += gradient`, `weights[j] += inputs[j] * gradient`.
    pub fn adjust(&mut self, inputs: &[f64], gradient: f64) -> Result<()> {
        check_len(|| format!("inputs of neuron {}", self.id), self.weights.len(), inputs.len())?;
        self.bias += gradient;
        for (weight, input) in self.weights.iter_mut().zip(inputs.iter()) {
            *weight += input * gradient;
        }
        Ok(())
    }

    /// Overwrites weights and bias, rejecting a weight vector of another length.
    pub fn set_parameters(&mut self, weights: &[f64], bias: f64) -> Result<()> {
        check_len(|| format!("weights of neuron {}", self.id), self.weights.len(), weights.len())?;
        self.weights.copy_from_slice(weights);
        self.bias = bias;
        Ok(())
    }
}

impl fmt::Debug for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neuron")
            .field("id", &self.id)
            .field("weights", &self.weights)
            .field("bias", &self.bias)
            .field("activation", &self.activation.name())
            .finish()
    }
}
