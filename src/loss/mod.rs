pub mod residual;

pub use residual::ResidualStats;
