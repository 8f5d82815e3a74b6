//! Parsing of `gerrit query --format=JSON` output.
//!
//! The server emits one JSON object per line, followed by a stats row
//! (`{"type":"stats",...}`) that is not a change.

use anyhow::Result;
use log::warn;
use serde::Deserialize;
use serde::Deserializer;

// -----------------------------------------------------------------------------
// Types

/// One change from a query result.
#[derive(Clone, Debug, Deserialize)]
pub struct Change {
    pub project: String,
    pub branch: String,
    #[serde(deserialize_with = "number_field")]
    pub number: u64,
    pub subject: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default, rename = "currentPatchSet")]
    pub current_patch_set: Option<PatchSet>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PatchSet {
    #[serde(deserialize_with = "number_field")]
    pub number: u64,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default, rename = "ref")]
    pub ref_name: Option<String>,
}

impl Owner {
    /// The most readable identity the server gave us.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.username.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("(unknown)")
    }
}

// Older servers serialize numeric fields as strings.
fn number_field<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Str(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

// -----------------------------------------------------------------------------
// Parsing

/// Parse query output into changes, dropping the stats row. Lines that fail
/// to parse are skipped with a warning rather than failing the command.
pub fn parse_query_output(raw: &str) -> Result<Vec<Change>> {
    let mut changes = Vec::new();

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: serde_json::Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                warn!("Skipping unparseable query line: {}", err);
                continue;
            }
        };

        if value.get("type").and_then(|t| t.as_str()) == Some("stats") {
            continue;
        }

        match serde_json::from_value::<Change>(value) {
            Ok(change) => changes.push(change),
            Err(err) => warn!("Skipping unparseable change record: {}", err),
        }
    }

    Ok(changes)
}

// -----------------------------------------------------------------------------
// Tests
