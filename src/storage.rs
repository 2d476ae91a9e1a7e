//! Host-side persistence of the serialized keyring
//!
//! The keyring itself never touches disk. The CLI host stores the output of
//! `serialize` as a JSON object and feeds it back through `deserialize`.
//! No encryption at rest is applied here.

use crate::keyring::SerializedKeyring;
use crate::Result;
use std::path::Path;

/// Load a serialized keyring, treating a missing file as empty
pub fn load(path: &Path) -> Result<SerializedKeyring> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No keyring file, starting empty");
        return Ok(SerializedKeyring::new());
    }

    let content = std::fs::read_to_string(path)?;
    let serialized: SerializedKeyring = serde_json::from_str(&content)?;

    tracing::debug!(
        path = %path.display(),
        proxies = serialized.len(),
        "Loaded keyring file"
    );
    Ok(serialized)
}

/// Write via a sibling temp file and rename, so readers never see a torn file
pub fn save(path: &Path, serialized: &SerializedKeyring) -> Result<()> {
    let json = serde_json::to_string_pretty(serialized)?;

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    std::fs::write(tmp_path, json)?;
    std::fs::rename(tmp_path, path)?;

    tracing::debug!(path = %path.display(), proxies = serialized.len(), "Saved keyring file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let loaded = load(&dir.path().join("keyring.json")).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_then_load_keeps_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyring.json");

        let mut serialized = SerializedKeyring::new();
        serialized.insert(
            "0x2222222222222222222222222222222222222222".to_string(),
            vec!["22".repeat(32)],
        );
        serialized.insert(
            "0x1111111111111111111111111111111111111111".to_string(),
            vec!["11".repeat(32), "33".repeat(32)],
        );

        save(&path, &serialized).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, serialized);
        assert_eq!(
            loaded.keys().next().unwrap(),
            "0x2222222222222222222222222222222222222222"
        );
        assert!(!dir.path().join("keyring.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("keyring.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load(&path).unwrap_err(), Error::Json(_)));
    }
}
