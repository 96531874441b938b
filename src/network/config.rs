use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Serialize, Deserialize};

use crate::activation::ActivationFunction;
use crate::error::{NetworkError, Result};
use crate::layers::neuron::WeightInit;

pub const DEFAULT_ERROR_THRESHOLD: f64 = 0.01;

/// Everything needed to build a `Network`.
///
/// Fields missing from a JSON file fall back to their defaults; a missing
/// `sizes`, `learning_rate` or `epochs` deserializes to an empty/zero value
/// and is then rejected by `validate`, which names the offending field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Layer widths, input first. At least two entries.
    #[serde(default)]
    pub sizes: Vec<usize>,
    #[serde(default)]
    pub learning_rate: f64,
    #[serde(default)]
    pub epochs: usize,
    #[serde(default)]
    pub activation: ActivationFunction,
    /// JSON has no infinity; an unbounded threshold is stored as `null`.
    #[serde(default = "default_error_threshold", with = "threshold_serde")]
    pub error_threshold: f64,
    /// Persistence key. Generated from the wall clock when absent.
    #[serde(default)]
    pub training_name: Option<String>,
    /// Seed for initial weights; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub weight_init: WeightInit,
    #[serde(default)]
    pub show_logs: bool,
    #[serde(default)]
    pub record_history: bool,
}

fn default_error_threshold() -> f64 {
    DEFAULT_ERROR_THRESHOLD
}

/// Writes non-finite thresholds as `null` and reads `null` back as infinity.
pub(crate) mod threshold_serde {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

impl NetworkConfig {
    /// A config with defaults for everything but the three required fields.
    pub fn new(sizes: Vec<usize>, learning_rate: f64, epochs: usize) -> Self {
        NetworkConfig {
            sizes,
            learning_rate,
            epochs,
            activation: ActivationFunction::default(),
            error_threshold: DEFAULT_ERROR_THRESHOLD,
            training_name: None,
            seed: None,
            weight_init: WeightInit::default(),
            show_logs: false,
            record_history: false,
        }
    }

    pub fn with_activation(mut self, activation: ActivationFunction) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_error_threshold(mut self, error_threshold: f64) -> Self {
        self.error_threshold = error_threshold;
        self
    }

    pub fn with_training_name(mut self, name: impl Into<String>) -> Self {
        self.training_name = Some(name.into());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_weight_init(mut self, weight_init: WeightInit) -> Self {
        self.weight_init = weight_init;
        self
    }

    pub fn with_logs(mut self, show_logs: bool) -> Self {
        self.show_logs = show_logs;
        self
    }

    pub fn with_history(mut self, record_history: bool) -> Self {
        self.record_history = record_history;
        self
    }

    /// Checks every field, returning the first invalid one.
    pub fn validate(&self) -> Result<()> {
        if self.sizes.len() < 2 {
            return Err(NetworkError::config(
                "sizes",
                format!("needs at least 2 entries, got {:?}", self.sizes),
            ));
        }
        if let Some(pos) = self.sizes.iter().position(|&s| s == 0) {
            return Err(NetworkError::config("sizes", format!("entry {pos} is zero")));
        }
        validate_learning_rate(self.learning_rate)?;
        if self.epochs == 0 {
            return Err(NetworkError::config("epochs", "must be a positive integer"));
        }
        validate_error_threshold(self.error_threshold)?;
        if let Some(name) = &self.training_name {
            validate_training_name(name)?;
        }
        if let WeightInit::Constant { weight, bias } = self.weight_init {
            if !weight.is_finite() || !bias.is_finite() {
                return Err(NetworkError::config("weight_init", "constant values must be finite"));
            }
        }
        Ok(())
    }

    /// The configured name, or `NeuralNetworkTraining_<unix millis>`.
    pub fn resolved_training_name(&self) -> String {
        match &self.training_name {
            Some(name) => name.clone(),
            None => {
                let millis = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_millis())
                    .unwrap_or(0);
                format!("NeuralNetworkTraining_{millis}")
            }
        }
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config from JSON. The result is not validated yet.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

pub(crate) fn validate_learning_rate(learning_rate: f64) -> Result<()> {
    if learning_rate.is_finite() && learning_rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::config(
            "learning_rate",
            format!("must be a positive real, got {learning_rate}"),
        ))
    }
}

pub(crate) fn validate_error_threshold(error_threshold: f64) -> Result<()> {
    if error_threshold >= 0.0 {
        Ok(())
    } else {
        Err(NetworkError::config(
            "error_threshold",
            format!("must be non-negative, got {error_threshold}"),
        ))
    }
}

pub(crate) fn validate_training_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        Err(NetworkError::config("training_name", "must not be empty"))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: NetworkError) -> &'static str {
        match err {
            NetworkError::InvalidConfig { field, .. } => field,
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn valid_config_passes() {
        NetworkConfig::new(vec![2, 3, 1], 0.15, 10).validate().unwrap();
    }

    #[test]
    fn reports_the_offending_field() {
        let cases = [
            (NetworkConfig::new(vec![2], 0.1, 1), "sizes"),
            (NetworkConfig::new(vec![2, 0, 1], 0.1, 1), "sizes"),
            (NetworkConfig::new(vec![2, 1], 0.0, 1), "learning_rate"),
            (NetworkConfig::new(vec![2, 1], f64::NAN, 1), "learning_rate"),
            (NetworkConfig::new(vec![2, 1], 0.1, 0), "epochs"),
            (NetworkConfig::new(vec![2, 1], 0.1, 1).with_error_threshold(-1.0), "error_threshold"),
            (NetworkConfig::new(vec![2, 1], 0.1, 1).with_error_threshold(f64::NAN), "error_threshold"),
            (NetworkConfig::new(vec![2, 1], 0.1, 1).with_training_name(" "), "training_name"),
        ];
        for (config, field) in cases {
            assert_eq!(field_of(config.validate().unwrap_err()), field);
        }
    }

    #[test]
    fn infinite_threshold_is_allowed() {
        NetworkConfig::new(vec![2, 1], 0.1, 1)
            .with_error_threshold(f64::INFINITY)
            .validate()
            .unwrap();
    }

    #[test]
    fn json_defaults_fill_optional_fields() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "sizes": [2, 3, 1], "learning_rate": 0.15, "epochs": 100 }"#).unwrap();
        assert_eq!(config.activation, ActivationFunction::Sigmoid);
        assert_eq!(config.error_threshold, DEFAULT_ERROR_THRESHOLD);
        assert_eq!(config.weight_init, WeightInit::Uniform);
        assert!(!config.show_logs);
    }

    #[test]
    fn missing_epochs_is_reported_by_name() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "sizes": [2, 1], "learning_rate": 0.5 }"#).unwrap();
        assert_eq!(field_of(config.validate().unwrap_err()), "epochs");
    }

    #[test]
    fn generated_training_name_has_prefix() {
        let config = NetworkConfig::new(vec![2, 1], 0.1, 1);
        assert!(config.resolved_training_name().starts_with("NeuralNetworkTraining_"));
    }

    #[test]
    fn infinite_threshold_survives_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frozen.json");
        let config = NetworkConfig::new(vec![2, 3, 1], 0.15, 10).with_error_threshold(f64::INFINITY);
        config.save_json(&path).unwrap();
        let loaded = NetworkConfig::load_json(&path).unwrap();
        assert_eq!(loaded.error_threshold, f64::INFINITY);
        assert_eq!(loaded, config);
        loaded.validate().unwrap();
    }

    #[test]
    fn json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = NetworkConfig::new(vec![2, 1], 0.5, 10)
            .with_activation(ActivationFunction::BinaryStep)
            .with_weight_init(WeightInit::Constant { weight: 1.0, bias: 1.0 })
            .with_training_name("and");
        config.save_json(&path).unwrap();
        assert_eq!(NetworkConfig::load_json(&path).unwrap(), config);
    }
}
