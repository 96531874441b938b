use backprop_nn::{data::and_table, ActivationFunction, Network, NetworkConfig, WeightInit};

fn main() -> backprop_nn::Result<()> {
    env_logger::init();

    let config = NetworkConfig::new(vec![2, 1], 0.5, 10)
        .with_activation(ActivationFunction::BinaryStep)
        .with_weight_init(WeightInit::Constant { weight: 1.0, bias: 1.0 })
        .with_training_name("and_training_optimized")
        .with_error_threshold(0.0)
        .with_history(true);
    let mut network = Network::new(config)?;
    let data = and_table();

    network.train(&data)?;
    let adjusted = network.history().iter().filter(|r| r.adjusted).count();
    println!("{} of {} neuron updates passed the threshold", adjusted, network.history().len());

    for example in &data {
        println!("Input: {:?} -> Output: {:?}", example.inputs, network.predict(&example.inputs)?);
    }
    Ok(())
}
