//! Command-line wiring around the library: train a network from a JSON
//! config and dataset, or run inference from a saved training.
//!
//! ```text
//! backprop-nn train   <config.json> <dataset.json> <store-dir>
//! backprop-nn predict <config.json> <store-dir> <x1,x2,...>
//! ```
//!
//! The config must name the training (`training_name`) so that `predict`
//! finds what `train` saved. Set RUST_LOG=info (or debug) to see training
//! progress.
use std::path::Path;
use std::process::ExitCode;

use backprop_nn::{
    JsonFileStore, Network, NetworkConfig, NetworkError, ParameterStore, Result, TrainingExample,
};
use log::error;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let outcome = match args.get(1).map(String::as_str) {
        Some("train") if args.len() == 5 => train(&args[2], &args[3], &args[4]),
        Some("predict") if args.len() == 5 => predict(&args[2], &args[3], &args[4]),
        _ => {
            eprintln!("usage:");
            eprintln!("  backprop-nn train   <config.json> <dataset.json> <store-dir>");
            eprintln!("  backprop-nn predict <config.json> <store-dir> <x1,x2,...>");
            return ExitCode::from(2);
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads a config that names its training. The generated default name is
/// unique per process and would never be found by a later `predict`.
fn load_session_config(path: impl AsRef<Path>) -> Result<NetworkConfig> {
    let config = NetworkConfig::load_json(path)?;
    if config.training_name.is_none() {
        return Err(NetworkError::InvalidConfig {
            field: "training_name",
            reason: "must be set so predict can find the saved training".to_string(),
        });
    }
    Ok(config)
}

/// Loads the saved parameters or fails; predicting from fresh weights is
/// never what the caller wants here.
fn restore<S: ParameterStore + ?Sized>(network: &mut Network, store: &S) -> Result<()> {
    if network.load_training(store)? {
        Ok(())
    } else {
        Err(NetworkError::TrainingNotFound(network.training_name().to_string()))
    }
}

fn train(config_path: &str, dataset_path: &str, store_dir: &str) -> Result<()> {
    let mut network = Network::new(load_session_config(config_path)?)?;
    let examples = TrainingExample::load_json(dataset_path)?;
    let mut store = JsonFileStore::new(store_dir)?;

    let summary = network.train(&examples)?;
    network.save_training(&mut store)?;
    if network.record_history() {
        backprop_nn::persistence::save_history(&mut store, network.training_name(), network.history())?;
    }

    println!("saved training {:?} in {}", network.training_name(), store.dir().display());
    if let Some(stats) = summary.last_epoch {
        println!("epochs: {}  mean abs error: {:.6}", stats.epoch, stats.mean_abs_error);
    }
    for example in &examples {
        println!("{:?} -> {:?}", example.inputs, network.predict(&example.inputs)?);
    }
    Ok(())
}

fn predict(config_path: &str, store_dir: &str, raw_input: &str) -> Result<()> {
    let mut network = Network::new(load_session_config(config_path)?)?;
    let store = JsonFileStore::new(store_dir)?;
    restore(&mut network, &store)?;

    let input = raw_input
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| NetworkError::InvalidConfig {
            field: "input",
            reason: e.to_string(),
        })?;
    println!("{:?}", network.predict(&input)?);
    Ok(())
}
