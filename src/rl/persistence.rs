//! Value-table persistence
//!
//! The table is stored as a single JSON object mapping the string form of a
//! [`StateKey`] (`"dy:velocity:pipe_x"`) to the two action values, written in
//! key order so checkpoints diff cleanly.

use anyhow::{ensure, Context, Result};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use super::observation::StateKey;
use super::q_table::{ActionValues, QTable};

/// Save a value table to a file
///
/// Creates parent directories if they don't exist. Non-finite values have
/// no JSON representation, so a table holding one is rejected before
/// anything is written.
pub fn save_table(table: &QTable, path: &Path) -> Result<()> {
    for (key, values) in table.iter() {
        ensure!(
            values.iter().all(|v| v.is_finite()),
            "Value table entry {} holds a non-finite value: {:?}",
            key,
            values
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(&table.to_sorted())
        .context("Failed to serialize value table")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write value table to {:?}", path))?;

    Ok(())
}

/// Load a value table from a file
///
/// # Returns
///
/// - `Ok(Some(table))` if the file exists and parses
/// - `Ok(None)` if there is no file at `path`
/// - `Err(_)` if the file exists but cannot be read or is not a valid table
pub fn load_table(path: &Path) -> Result<Option<QTable>> {
    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to read value table from {:?}", path))
        }
    };

    let entries: BTreeMap<StateKey, ActionValues> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse value table from {:?}", path))?;

    Ok(Some(entries.into_iter().collect()))
}
