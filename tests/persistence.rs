//! Saving and restoring trained parameters through a `ParameterStore`.

use backprop_nn::data::xor_table;
use backprop_nn::persistence::{history_key, load_history, save_history};
use backprop_nn::{
    JsonFileStore, MemoryStore, Network, NetworkConfig, NetworkError, ParameterStore, TrainingSnapshot,
};

fn trained_xor(name: &str) -> (Network, NetworkConfig) {
    let config = NetworkConfig::new(vec![2, 3, 1], 0.15, 500)
        .with_training_name(name)
        .with_error_threshold(0.001)
        .with_seed(21);
    let mut network = Network::new(config.clone()).unwrap();
    network.train(&xor_table()).unwrap();
    (network, config)
}

fn grid_inputs() -> Vec<Vec<f64>> {
    let mut inputs = Vec::new();
    for i in 0..=10 {
        for j in 0..=10 {
            inputs.push(vec![i as f64 / 10.0 - 0.2, j as f64 / 5.0 - 1.0]);
        }
    }
    inputs
}

#[test]
fn round_trip_reproduces_predictions_exactly() {
    let (network, config) = trained_xor("XOR_TRAINING");
    let mut store = MemoryStore::new();
    network.save_training(&mut store).unwrap();
    assert!(store.contains("XOR_TRAINING"));

    let mut fresh = Network::new(config.with_seed(999)).unwrap();
    assert!(fresh.load_training(&store).unwrap());
    for input in grid_inputs() {
        assert_eq!(network.predict(&input).unwrap(), fresh.predict(&input).unwrap());
    }
}

#[test]
fn round_trip_through_json_files() {
    let dir = tempfile::tempdir().unwrap();
    let (network, config) = trained_xor("xor_file");
    let mut store = JsonFileStore::new(dir.path()).unwrap();
    network.save_training(&mut store).unwrap();
    assert!(dir.path().join("xor_file.json").exists());

    let reopened = JsonFileStore::new(dir.path()).unwrap();
    let mut fresh = Network::new(config.with_seed(1000)).unwrap();
    assert!(fresh.load_training(&reopened).unwrap());
    assert_eq!(fresh.snapshot().weights, network.snapshot().weights);
    assert_eq!(fresh.snapshot().biases, network.snapshot().biases);
}

#[test]
fn snapshot_carries_metadata() {
    let (network, _) = trained_xor("meta");
    let mut store = MemoryStore::new();
    network.save_training(&mut store).unwrap();
    let blob = store.load("meta").unwrap().unwrap();
    let snap = TrainingSnapshot::from_blob(&blob).unwrap();
    let meta = snap.metadata.unwrap();
    assert_eq!(meta.training_name.as_deref(), Some("meta"));
    assert_eq!(meta.sizes, Some(vec![2, 3, 1]));
    assert_eq!(meta.epochs, Some(500));
    assert_eq!(meta.activation.as_deref(), Some("sigmoid"));
    assert_eq!(snap.weights.len(), 2);
    assert_eq!(snap.biases[0].len(), 3);
}

#[test]
fn missing_training_reports_false_and_changes_nothing() {
    let store = MemoryStore::new();
    let mut network = Network::new(
        NetworkConfig::new(vec![2, 3, 1], 0.15, 1).with_training_name("never_saved").with_seed(2),
    )
    .unwrap();
    let before = network.snapshot();
    assert!(!network.load_training(&store).unwrap());
    assert_eq!(network.snapshot(), before);

    let dir = tempfile::tempdir().unwrap();
    let files = JsonFileStore::new(dir.path()).unwrap();
    assert!(!network.load_training(&files).unwrap());
    assert_eq!(network.snapshot(), before);
}

#[test]
fn mismatched_topology_is_rejected_without_partial_writes() {
    let (network, _) = trained_xor("shared_name");
    let mut store = MemoryStore::new();
    network.save_training(&mut store).unwrap();

    for sizes in [vec![2, 4, 1], vec![2, 3, 2], vec![3, 3, 1], vec![2, 3, 3, 1], vec![2, 1]] {
        let mut other = Network::new(
            NetworkConfig::new(sizes.clone(), 0.15, 1).with_training_name("shared_name").with_seed(8),
        )
        .unwrap();
        let before = other.snapshot();
        match other.load_training(&store) {
            Err(NetworkError::ShapeMismatch { .. }) => {}
            res => panic!("sizes {sizes:?}: expected shape mismatch, got {res:?}"),
        }
        assert_eq!(other.snapshot(), before, "sizes {sizes:?}");
    }
}

#[test]
fn ragged_snapshot_is_rejected() {
    let (mut network, _) = trained_xor("ragged");
    let before = network.snapshot();
    let mut snap = before.clone();
    snap.weights[1][0].push(0.0);
    assert!(matches!(network.apply_snapshot(&snap), Err(NetworkError::ShapeMismatch { .. })));
    let mut snap = before.clone();
    snap.biases[0].pop();
    assert!(matches!(network.apply_snapshot(&snap), Err(NetworkError::ShapeMismatch { .. })));
    assert_eq!(network.snapshot(), before);
}

#[test]
fn corrupt_blob_is_an_error_not_a_miss() {
    let mut store = MemoryStore::new();
    store.save("broken", b"not json").unwrap();
    let mut network = Network::new(
        NetworkConfig::new(vec![2, 1], 0.1, 1).with_training_name("broken").with_seed(1),
    )
    .unwrap();
    assert!(matches!(network.load_training(&store), Err(NetworkError::Json(_))));
}

#[test]
fn history_is_stored_next_to_the_training() {
    let config = NetworkConfig::new(vec![2, 3, 1], 0.15, 2)
        .with_training_name("xor_hist")
        .with_seed(3)
        .with_history(true);
    let mut network = Network::new(config).unwrap();
    network.train(&xor_table()).unwrap();

    let mut store = MemoryStore::new();
    assert!(load_history(&store, "xor_hist").unwrap().is_none());
    save_history(&mut store, network.training_name(), network.history()).unwrap();
    assert!(store.contains(&history_key("xor_hist")));
    assert_eq!(history_key("xor_hist"), "xor_hist_history");

    let loaded = load_history(&store, "xor_hist").unwrap().unwrap();
    assert_eq!(loaded.len(), network.history().len());
    assert_eq!(loaded[0].neuron, network.history()[0].neuron);
}

#[test]
fn history_with_infinite_threshold_reloads() {
    let config = NetworkConfig::new(vec![2, 3, 1], 0.15, 1)
        .with_training_name("frozen_hist")
        .with_error_threshold(f64::INFINITY)
        .with_seed(6)
        .with_history(true);
    let mut network = Network::new(config).unwrap();
    network.train(&xor_table()).unwrap();
    assert!(!network.history().is_empty());
    assert!(network.history().iter().all(|r| r.threshold == f64::INFINITY && !r.adjusted));

    let dir = tempfile::tempdir().unwrap();
    let mut store = JsonFileStore::new(dir.path()).unwrap();
    save_history(&mut store, network.training_name(), network.history()).unwrap();
    let loaded = load_history(&store, "frozen_hist").unwrap().unwrap();
    assert_eq!(loaded, network.history());
}
