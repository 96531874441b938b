use crate::error::Result;
use crate::persistence::store::ParameterStore;
use crate::train::history::HistoryRecord;

/// History for a session lives under `<training_name>_history`.
pub fn history_key(training_name: &str) -> String {
    format!("{training_name}_history")
}

pub fn save_history<S: ParameterStore + ?Sized>(
    store: &mut S,
    training_name: &str,
    records: &[HistoryRecord],
) -> Result<()> {
    let blob = serde_json::to_vec(records)?;
    store.save(&history_key(training_name), &blob)
}

/// `Ok(None)` when no history was saved for the session.
pub fn load_history<S: ParameterStore + ?Sized>(
    store: &S,
    training_name: &str,
) -> Result<Option<Vec<HistoryRecord>>> {
    match store.load(&history_key(training_name))? {
        Some(blob) => Ok(Some(serde_json::from_slice(&blob)?)),
        None => Ok(None),
    }
}
