use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::Result;

/// One supervised sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub inputs: Vec<f64>,
    pub targets: Vec<f64>,
}

impl TrainingExample {
    pub fn new(inputs: Vec<f64>, targets: Vec<f64>) -> Self {
        TrainingExample { inputs, targets }
    }

    /// Reads a JSON array of `{ "inputs": [...], "targets": [...] }` records.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Vec<TrainingExample>> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn table(rows: [([f64; 2], f64); 4]) -> Vec<TrainingExample> {
    rows.iter()
        .map(|(inputs, target)| TrainingExample::new(inputs.to_vec(), vec![*target]))
        .collect()
}

/// XOR truth table.
pub fn xor_table() -> Vec<TrainingExample> {
    table([
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 1.0),
        ([1.0, 0.0], 1.0),
        ([1.0, 1.0], 0.0),
    ])
}

/// AND truth table.
pub fn and_table() -> Vec<TrainingExample> {
    table([
        ([0.0, 0.0], 0.0),
        ([0.0, 1.0], 0.0),
        ([1.0, 0.0], 0.0),
        ([1.0, 1.0], 1.0),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_json_uses_inputs_and_targets() {
        let json = r#"[{ "inputs": [0, 1], "targets": [1] }]"#;
        let data: Vec<TrainingExample> = serde_json::from_str(json).unwrap();
        assert_eq!(data, vec![TrainingExample::new(vec![0.0, 1.0], vec![1.0])]);
    }

    #[test]
    fn truth_tables_have_four_rows() {
        assert_eq!(xor_table().len(), 4);
        assert_eq!(and_table().iter().filter(|e| e.targets[0] == 1.0).count(), 1);
    }
}
