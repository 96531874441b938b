pub mod example;

pub use example::{and_table, xor_table, TrainingExample};
