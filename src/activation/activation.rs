use serde::{Serialize, Deserialize};
use std::f64::consts::E;
use std::fmt;
use std::sync::Arc;

/// An activation function paired with its derivative.
///
/// The derivative is expressed in terms of the activation's *output*
/// `y = apply(x)`, not the raw weighted sum. Callers must pass the
/// post-activation value.
pub trait Activation: Send + Sync {
    fn apply(&self, x: f64) -> f64;

    fn derivative_from_output(&self, y: f64) -> f64;

    fn name(&self) -> String;
}

/// Built-in activations. These are the only ones a config file can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationFunction {
    #[default]
    Sigmoid,
    /// Heaviside step. Its derivative is taken as 1 everywhere, which turns
    /// the weight update into the perceptron rule.
    BinaryStep,
    Tanh,
    #[serde(rename = "relu")]
    ReLU,
    Identity,
}

impl ActivationFunction {
    /// Wraps the variant for sharing across the neurons of a layer.
    pub fn shared(self) -> Arc<dyn Activation> {
        Arc::new(self)
    }
}

impl Activation for ActivationFunction {
    fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::BinaryStep => if x >= 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
        }
    }

    fn derivative_from_output(&self, y: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => y * (1.0 - y),
            ActivationFunction::BinaryStep => 1.0,
            ActivationFunction::Tanh => 1.0 - y * y,
            ActivationFunction::ReLU => if y > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
        }
    }

    fn name(&self) -> String {
        let name = match self {
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::BinaryStep => "binary_step",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::Identity => "identity",
        };
        name.to_string()
    }
}

/// A user-supplied function/derivative pair.
#[derive(Clone, Copy)]
pub struct CustomActivation {
    pub label: &'static str,
    pub function: fn(f64) -> f64,
    pub derivative: fn(f64) -> f64,
}

impl CustomActivation {
    pub fn new(label: &'static str, function: fn(f64) -> f64, derivative: fn(f64) -> f64) -> Self {
        CustomActivation { label, function, derivative }
    }
}

impl fmt::Debug for CustomActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomActivation").field("label", &self.label).finish()
    }
}

impl Activation for CustomActivation {
    fn apply(&self, x: f64) -> f64 {
        (self.function)(x)
    }

    fn derivative_from_output(&self, y: f64) -> f64 {
        (self.derivative)(y)
    }

    fn name(&self) -> String {
        self.label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_centered_and_bounded() {
        let s = ActivationFunction::Sigmoid;
        assert_eq!(s.apply(0.0), 0.5);
        assert!(s.apply(40.0) <= 1.0);
        assert!(s.apply(-40.0) >= 0.0);
    }

    #[test]
    fn sigmoid_derivative_uses_output() {
        let s = ActivationFunction::Sigmoid;
        let y = s.apply(0.0);
        assert_eq!(s.derivative_from_output(y), 0.25);
    }

    #[test]
    fn binary_step_fires_at_zero() {
        let b = ActivationFunction::BinaryStep;
        assert_eq!(b.apply(0.0), 1.0);
        assert_eq!(b.apply(-1e-9), 0.0);
        assert_eq!(b.derivative_from_output(0.0), 1.0);
        assert_eq!(b.derivative_from_output(1.0), 1.0);
    }

    #[test]
    fn custom_pair_dispatches_to_its_functions() {
        fn double(x: f64) -> f64 { 2.0 * x }
        fn two(_: f64) -> f64 { 2.0 }
        let c = CustomActivation::new("double", double, two);
        assert_eq!(c.apply(3.0), 6.0);
        assert_eq!(c.derivative_from_output(6.0), 2.0);
        assert_eq!(c.name(), "double");
    }

    #[test]
    fn names_round_trip_through_serde() {
        let json = serde_json::to_string(&ActivationFunction::BinaryStep).unwrap();
        assert_eq!(json, "\"binary_step\"");
        let back: ActivationFunction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ActivationFunction::BinaryStep);
    }
}
