//! Loading compiled contract bytecode from build artifacts.
//!
//! Two formats are accepted: a raw hex file (typically `.bin`) and a
//! Hardhat/Foundry-style artifact JSON carrying a `bytecode` field, either
//! as a hex string or as an object with an `object` member.

use std::path::Path;

use alloy_core::primitives::Bytes;
use serde_json::Value;

use crate::errors::DeployError;

/// Load the creation bytecode for a contract from an artifact file.
pub fn load_bytecode(path: &Path) -> Result<Bytes, DeployError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| DeployError::Artifact(format!("failed to read {}: {}", path.display(), e)))?;

    let bytecode_hex = if path.extension().is_some_and(|ext| ext == "json") {
        extract_bytecode_field(&content, path)?
    } else {
        content.trim().to_string()
    };

    let bytecode = decode_hex(&bytecode_hex, path)?;
    if bytecode.is_empty() {
        return Err(DeployError::Artifact(format!(
            "artifact {} contains empty bytecode",
            path.display()
        )));
    }

    Ok(Bytes::from(bytecode))
}

/// Extract the `bytecode` field from an artifact JSON document.
fn extract_bytecode_field(content: &str, path: &Path) -> Result<String, DeployError> {
    let artifact: Value = serde_json::from_str(content)
        .map_err(|e| DeployError::Artifact(format!("failed to parse {}: {}", path.display(), e)))?;

    // Hardhat: "bytecode": "0x..."; Foundry: "bytecode": { "object": "0x..." }
    let bytecode = match &artifact["bytecode"] {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => artifact["bytecode"]["object"].as_str().map(String::from),
        _ => None,
    };

    bytecode.ok_or_else(|| {
        DeployError::Artifact(format!(
            "no bytecode field found in artifact {}",
            path.display()
        ))
    })
}

fn decode_hex(value: &str, path: &Path) -> Result<Vec<u8>, DeployError> {
    hex::decode(value.trim().trim_start_matches("0x")).map_err(|e| {
        DeployError::Artifact(format!(
            "invalid bytecode hex in artifact {}: {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    fn write_artifact(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_raw_hex_bin() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = write_artifact(&dir, "SwapFactory.bin", "0x6080604052\n");

        let bytecode = load_bytecode(&path).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
    }

    #[test]
    fn test_load_raw_hex_without_prefix() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = write_artifact(&dir, "SwapFactory.bin", "6080");

        let bytecode = load_bytecode(&path).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_load_hardhat_artifact_json() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = write_artifact(
            &dir,
            "SwapFactory.json",
            r#"{"contractName": "SwapFactory", "bytecode": "0x600a"}"#,
        );

        let bytecode = load_bytecode(&path).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x0a]);
    }

    #[test]
    fn test_load_foundry_artifact_json() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = write_artifact(
            &dir,
            "SwapFactory.json",
            r#"{"bytecode": {"object": "0x600b"}}"#,
        );

        let bytecode = load_bytecode(&path).unwrap();
        assert_eq!(bytecode.as_ref(), &[0x60, 0x0b]);
    }

    #[test]
    fn test_missing_bytecode_field() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = write_artifact(&dir, "SwapFactory.json", r#"{"abi": []}"#);

        assert!(matches!(
            load_bytecode(&path),
            Err(DeployError::Artifact(_))
        ));
    }

    #[test]
    fn test_empty_bytecode_rejected() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = write_artifact(&dir, "SwapFactory.bin", "0x");

        assert!(matches!(
            load_bytecode(&path),
            Err(DeployError::Artifact(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new("swapkit-artifact").unwrap();
        let path = dir.path().join("DoesNotExist.bin");

        assert!(matches!(
            load_bytecode(&path),
            Err(DeployError::Artifact(_))
        ));
    }
}
