//! Shared utilities for command handlers

use crate::config::is_yaml;
use crate::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Read a JSON or YAML document, picking the parser by extension
pub fn read_document(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    parse_document(&content, path)
}

/// Read a JSON document from stdin
pub fn read_stdin_document() -> Result<Value> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    parse_document(&content, Path::new("<stdin>"))
}

fn parse_document(content: &str, path: &Path) -> Result<Value> {
    if is_yaml(path) {
        serde_yaml::from_str(content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "YAML".to_string(),
            reason: e.to_string(),
        })
    } else {
        serde_json::from_str(content).map_err(|e| Error::InvalidFormat {
            path: path.to_path_buf(),
            expected: "JSON".to_string(),
            reason: e.to_string(),
        })
    }
}

/// Write a document as YAML or pretty JSON, picking the format by extension
pub fn write_document(path: &Path, value: &Value) -> Result<()> {
    let content = if is_yaml(path) {
        serde_yaml::to_string(value)?
    } else {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        json
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_and_yaml() {
        let dir = TempDir::new().unwrap();
        let json_path = dir.path().join("input.json");
        let yaml_path = dir.path().join("input.yml");
        fs::write(&json_path, r#"{"b": 1, "a": [true, null]}"#).unwrap();
        fs::write(&yaml_path, "b: 1\na:\n  - true\n  - null\n").unwrap();

        let from_json = read_document(&json_path).unwrap();
        let from_yaml = read_document(&yaml_path).unwrap();
        assert_eq!(from_json, json!({"b": 1, "a": [true, null]}));
        assert_eq!(from_json, from_yaml);
    }

    #[test]
    fn test_read_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(read_document(&missing), Err(Error::FileNotFound { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{not json").unwrap();
        match read_document(&broken) {
            Err(Error::InvalidFormat { expected, .. }) => assert_eq!(expected, "JSON"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_write_document_by_extension() {
        let dir = TempDir::new().unwrap();
        let value = json!({"name": "Alice", "tags": ["x"]});

        let yaml_path = dir.path().join("out/result.yaml");
        write_document(&yaml_path, &value).unwrap();
        assert_eq!(
            fs::read_to_string(&yaml_path).unwrap(),
            "name: Alice\ntags:\n- x\n"
        );

        let json_path = dir.path().join("result.json");
        write_document(&json_path, &value).unwrap();
        assert_eq!(read_document(&json_path).unwrap(), value);
    }
}
