//! Active-target snapshot files
//!
//! A snapshot is a JSON array. A record carrying `url_pattern` is a stored
//! [`ActiveTarget`] (canonical pattern and hashed keys) and is decoded as
//! is. Any other record is a raw reservation (`url`, `selector`, `role`)
//! that is canonicalized on load. The two shapes never mix.

use std::path::Path;

use anyhow::{bail, Context, Result};
use guard_conflict::ActiveTarget;
use serde::Deserialize;
use serde_json::Value;

/// Fields that only make sense on a raw reservation
const RAW_FIELDS: [&str; 3] = ["url", "selector", "role"];

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReservation {
    experiment_id: String,
    url: String,
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    label: String,
}

impl From<RawReservation> for ActiveTarget {
    fn from(raw: RawReservation) -> Self {
        ActiveTarget::reserve(
            raw.experiment_id,
            &raw.url,
            raw.selector.as_deref(),
            raw.role.as_deref(),
            raw.label,
        )
    }
}

fn decode_record(index: usize, record: Value) -> Result<ActiveTarget> {
    if record.get("url_pattern").is_none() {
        let raw: RawReservation = serde_json::from_value(record)
            .with_context(|| format!("record {index}: invalid raw reservation"))?;
        return Ok(raw.into());
    }

    if let Some(field) = RAW_FIELDS.iter().find(|field| record.get(**field).is_some()) {
        bail!("record {index}: `{field}` cannot be combined with `url_pattern`");
    }
    serde_json::from_value(record).with_context(|| format!("record {index}: invalid stored target"))
}

/// Parse a snapshot from JSON text
///
/// # Errors
/// Returns error if the text is not an array, or naming the first record
/// that fails to decode
pub fn parse_snapshot(input: &str) -> Result<Vec<ActiveTarget>> {
    let records: Vec<Value> =
        serde_json::from_str(input).context("snapshot must be a JSON array of targets")?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| decode_record(index, record))
        .collect()
}

/// Load a snapshot file
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_snapshot(path: &Path) -> Result<Vec<ActiveTarget>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let active =
        parse_snapshot(&text).with_context(|| format!("invalid snapshot {}", path.display()))?;
    tracing::debug!(path = %path.display(), targets = active.len(), "loaded snapshot");
    Ok(active)
}
