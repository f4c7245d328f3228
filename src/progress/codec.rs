use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::ProgressMap;

const SCHEMA_VERSION: u64 = 1;

#[derive(Serialize)]
struct VersionedBlobRef<'a> {
    version: u64,
    books: &'a ProgressMap,
}

#[derive(Deserialize)]
struct VersionedBlob {
    books: ProgressMap,
}

/// Serializes the whole map as a versioned JSON document.
pub fn encode(map: &ProgressMap) -> Result<String> {
    serde_json::to_string(&VersionedBlobRef {
        version: SCHEMA_VERSION,
        books: map,
    })
    .context("failed to encode reading progress")
}

/// Lenient decode: anything unreadable becomes an empty map.
pub fn decode(raw: &str) -> ProgressMap {
    match try_decode(raw) {
        Ok(map) => map,
        Err(err) => {
            warn!("discarding unreadable reading progress: {err:#}");
            ProgressMap::new()
        }
    }
}

/// Strict decode of either the versioned document or the unversioned
/// `{ bookId: record }` object written by the browser tracker. Only an object
/// with a numeric `version` and a `books` member is read as versioned.
pub fn try_decode(raw: &str) -> Result<ProgressMap> {
    if raw.trim().is_empty() {
        return Ok(ProgressMap::new());
    }

    let value: Value = serde_json::from_str(raw).context("reading progress is not valid JSON")?;
    let Some(object) = value.as_object() else {
        bail!("reading progress must be a JSON object");
    };

    let versioned =
        object.get("version").is_some_and(Value::is_number) && object.contains_key("books");
    if !versioned {
        return serde_json::from_value(value).context("malformed legacy reading progress object");
    }

    if object.get("version").and_then(Value::as_u64) != Some(SCHEMA_VERSION) {
        bail!("unsupported reading progress version {}", object["version"]);
    }
    let blob: VersionedBlob =
        serde_json::from_value(value).context("malformed reading progress document")?;
    Ok(blob.books)
}
