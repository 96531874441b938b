use crate::error::Result;
use crate::layers::neuron::Neuron;

/// Online gradient descent with a per-neuron error gate.
///
/// A neuron whose error magnitude is at or below `error_threshold` is left
/// untouched for the current example.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdSgd {
    pub learning_rate: f64,
    pub error_threshold: f64,
}

/// What one `step` computed for one neuron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adjustment {
    pub error: f64,
    /// Activation derivative evaluated at the neuron's own output.
    pub derivative: f64,
    /// `error * derivative * learning_rate`, whether or not it was applied.
    pub gradient: f64,
    pub adjusted: bool,
}

impl ThresholdSgd {
    pub fn new(learning_rate: f64, error_threshold: f64) -> ThresholdSgd {
        ThresholdSgd { learning_rate, error_threshold }
    }

    pub fn passes_gate(&self, error: f64) -> bool {
        error.abs() > self.error_threshold
    }

    /// Applies one gated update to `neuron`, given the layer input and the
    /// neuron's output for the current example.
    pub fn step(&self, neuron: &mut Neuron, inputs: &[f64], output: f64, error: f64) -> Result<Adjustment> {
        let derivative = neuron.activation().derivative_from_output(output);
        let gradient = error * derivative * self.learning_rate;
        let adjusted = self.passes_gate(error);
        if adjusted {
            neuron.adjust(inputs, gradient)?;
        }
        Ok(Adjustment { error, derivative, gradient, adjusted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use crate::layers::neuron::{NeuronId, WeightInit};
    use rand::{rngs::StdRng, SeedableRng};

    fn sigmoid_neuron() -> Neuron {
        let mut rng = StdRng::seed_from_u64(0);
        Neuron::new(
            2,
            ActivationFunction::Sigmoid.shared(),
            NeuronId { layer: 1, index: 0 },
            WeightInit::Constant { weight: 0.0, bias: 0.0 },
            &mut rng,
        )
    }

    #[test]
    fn step_above_threshold_updates_parameters() {
        let mut n = sigmoid_neuron();
        let sgd = ThresholdSgd::new(0.5, 0.01);
        let adj = sgd.step(&mut n, &[1.0, 0.0], 0.5, 1.0).unwrap();
        assert!(adj.adjusted);
        assert_eq!(adj.derivative, 0.25);
        assert_eq!(adj.gradient, 0.125);
        assert_eq!(n.bias(), 0.125);
        assert_eq!(n.weights(), &[0.125, 0.0]);
    }

    #[test]
    fn step_at_threshold_is_gated() {
        let mut n = sigmoid_neuron();
        let sgd = ThresholdSgd::new(0.5, 0.25);
        let adj = sgd.step(&mut n, &[1.0, 1.0], 0.5, -0.25).unwrap();
        assert!(!adj.adjusted);
        assert_eq!(n.bias(), 0.0);
        assert_eq!(n.weights(), &[0.0, 0.0]);
    }

    #[test]
    fn infinite_threshold_blocks_everything() {
        let sgd = ThresholdSgd::new(1.0, f64::INFINITY);
        assert!(!sgd.passes_gate(1e300));
        assert!(!sgd.passes_gate(-1e300));
    }
}
