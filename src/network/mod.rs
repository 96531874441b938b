pub mod config;
pub mod metadata;
pub mod network;

pub use config::NetworkConfig;
pub use metadata::SnapshotMetadata;
pub use network::Network;
