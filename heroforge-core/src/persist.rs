//! JSON export and import of the whole store, plus single-character files.
//!
//! Export writes [`HeroForgeData`] as-is. Import only checks the outer shape
//! (an object with a `characters` field) before handing the document to
//! serde, so files from older versions with fewer content lists still load.

use crate::character::{CharacterId, CharacterSheet};
use crate::derive::recompute;
use crate::store::{HeroForgeData, DATA_VERSION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid save format: {0}")]
    InvalidFormat(&'static str),

    #[error("Version mismatch: expected at most {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Serialize the store as pretty JSON.
pub fn export_json(data: &HeroForgeData) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(data)?)
}

fn check_version(value: &serde_json::Value) -> Result<(), PersistError> {
    if let Some(found) = value.get("version").and_then(|v| v.as_u64()) {
        let found = found.min(u32::MAX as u64) as u32;
        if found > DATA_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: DATA_VERSION,
                found,
            });
        }
    }
    Ok(())
}

/// Parse an exported store.
///
/// Derived character fields are recomputed, so hand-edited files come back
/// consistent.
pub fn import_json(json: &str) -> Result<HeroForgeData, PersistError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let object = value
        .as_object()
        .ok_or(PersistError::InvalidFormat("expected a JSON object"))?;
    if !object.contains_key("characters") {
        return Err(PersistError::InvalidFormat("missing \"characters\""));
    }
    check_version(&value)?;

    let mut data: HeroForgeData = serde_json::from_value(value)?;
    data.version = DATA_VERSION;
    data.characters = data.characters.iter().map(recompute).collect();
    tracing::info!(
        characters = data.characters.len(),
        custom_items = data.custom_items.len(),
        "imported data"
    );
    Ok(data)
}

/// Write the store to a file.
pub async fn save(data: &HeroForgeData, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let content = export_json(data)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, content).await?;
    tracing::info!(path = %path.display(), characters = data.characters.len(), "saved data");
    Ok(())
}

/// Read the store from a file.
pub async fn load(path: impl AsRef<Path>) -> Result<HeroForgeData, PersistError> {
    let content = fs::read_to_string(path).await?;
    import_json(&content)
}

/// Read the store, starting empty when the file doesn't exist yet.
pub async fn load_or_default(path: impl AsRef<Path>) -> Result<HeroForgeData, PersistError> {
    let path = path.as_ref();
    match fs::try_exists(path).await? {
        true => load(path).await,
        false => {
            tracing::debug!(path = %path.display(), "no data file, starting empty");
            Ok(HeroForgeData::default())
        }
    }
}

// ============================================================================
// Single-character export
// ============================================================================

/// One character in its own file, for sharing between stores.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterExport {
    pub version: u32,
    pub character: CharacterSheet,
}

pub fn export_character(sheet: &CharacterSheet) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(&CharacterExport {
        version: DATA_VERSION,
        character: sheet.clone(),
    })?)
}

/// Parse a character file. The character gets a fresh id so importing the
/// same file twice yields two characters.
pub fn import_character(json: &str) -> Result<CharacterSheet, PersistError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.get("character").is_some_and(|c| c.is_object()) {
        return Err(PersistError::InvalidFormat("missing \"character\""));
    }
    check_version(&value)?;
    let export: CharacterExport = serde_json::from_value(value)?;
    let mut sheet = export.character;
    sheet.id = CharacterId::new();
    Ok(recompute(&sheet))
}

/// File name for a character export, with unsafe characters replaced.
pub fn character_export_path(dir: impl AsRef<Path>, name: &str) -> PathBuf {
    let sanitized = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.json"))
}
