use backprop_nn::{data::xor_table, MemoryStore, Network, NetworkConfig};

fn main() -> backprop_nn::Result<()> {
    env_logger::init();

    let config = NetworkConfig::new(vec![2, 3, 1], 0.15, 10_000)
        .with_training_name("XOR_TRAINING")
        .with_error_threshold(0.001)
        .with_seed(42);
    let mut network = Network::new(config.clone())?;
    let data = xor_table();

    let summary = network.train(&data)?;
    if let Some(stats) = summary.last_epoch {
        println!("Epoch {}: mean abs error = {:.6}", stats.epoch, stats.mean_abs_error);
    }

    let mut store = MemoryStore::new();
    network.save_training(&mut store)?;

    // A fresh network with the same topology picks the weights back up.
    let mut restored = Network::new(config.with_seed(0))?;
    restored.load_training(&store)?;

    for example in &data {
        println!(
            "Input: {:?} -> Output: {:.4} (target {})",
            example.inputs,
            restored.predict(&example.inputs)?[0],
            example.targets[0]
        );
    }
    Ok(())
}
