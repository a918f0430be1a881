//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;

/// Retrieve the next recorded output for a given port and method.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, String> {
    let mut guard = replayer.lock().map_err(|e| format!("Replayer lock poisoned: {e}"))?;
    guard.next_interaction(port, method).map(|i| i.output.clone())
}

/// Split a replayed output into its recorded `Ok` or `Err` payload.
///
/// The outer `Err` reports a cassette that cannot be interpreted at all.
pub(crate) fn replay_result<T, E>(output: serde_json::Value) -> Result<Result<T, E>, String>
where
    T: DeserializeOwned,
    E: DeserializeOwned,
{
    if let Some(err_val) = output.get("Err") {
        return serde_json::from_value(err_val.clone())
            .map(Err)
            .map_err(|e| format!("Unreadable recorded error: {e}"));
    }
    if let Some(ok_val) = output.get("Ok") {
        return serde_json::from_value(ok_val.clone())
            .map(Ok)
            .map_err(|e| format!("Unreadable recorded value: {e}"));
    }
    Err("Recorded output has neither Ok nor Err".to_string())
}
