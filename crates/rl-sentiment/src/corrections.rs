//! Domain correction lexicon for game reviews.
//!
//! Generic sentiment lexicons read genre vocabulary ("horror", "kill",
//! "combat") as negative and miss gaming complaints ("chore", "repetitive").
//! The builtin set re-weights those words; a JSON object of
//! `{"word": weight}` can replace it.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use rl_core::{Result, RlError};

const GAMING_CORRECTIONS: &[(&str, f64)] = &[
    // genre vocabulary, neutralised
    ("horror", 0.5),
    ("hell", 0.0),
    ("dead", 0.0),
    ("grim", 0.0),
    ("sin", 0.0),
    ("terror", 0.5),
    ("thief", 0.0),
    ("combat", 0.0),
    ("war", 0.0),
    ("enemies", 0.0),
    ("kill", 0.0),
    ("killing", 0.0),
    ("battle", 0.0),
    ("fire", 0.0),
    ("shoot", 0.0),
    ("fight", 0.0),
    ("attack", 0.0),
    ("difficult", 0.2),
    ("punishing", 0.1),
    ("play", 0.0),
    ("playing", 0.0),
    ("played", 0.0),
    ("adventure", 0.0),
    // under-weighted praise
    ("pretty", 1.0),
    ("interesting", 1.0),
    // complaints
    ("chore", -2.5),
    ("finicky", -2.0),
    ("broken", -3.0),
    ("boring", -3.0),
    ("flaw", -2.0),
    ("flaws", -2.0),
    ("repetitive", -2.5),
    ("generic", -2.0),
];

/// The builtin gaming correction set, sorted by word.
pub fn gaming_corrections() -> BTreeMap<String, f64> {
    GAMING_CORRECTIONS
        .iter()
        .map(|(w, v)| (w.to_string(), *v))
        .collect()
}

/// Load a correction set from a JSON object file.
pub fn load_corrections(path: &Path) -> Result<BTreeMap<String, f64>> {
    let name = format!("corrections ({})", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| RlError::resource(&name, e))?;
    let map: BTreeMap<String, f64> =
        serde_json::from_str(&content).map_err(|e| RlError::resource(&name, e))?;
    let map: BTreeMap<String, f64> = map
        .into_iter()
        .map(|(k, v)| (k.trim().to_lowercase(), v))
        .filter(|(k, _)| !k.is_empty())
        .collect();
    info!(path = %path.display(), entries = map.len(), "correction lexicon loaded");
    Ok(map)
}
