pub mod store;
pub mod snapshot;
pub mod history;

pub use store::{JsonFileStore, MemoryStore, ParameterStore};
pub use snapshot::TrainingSnapshot;
pub use history::{history_key, load_history, save_history};
