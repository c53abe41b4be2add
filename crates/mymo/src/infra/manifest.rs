//! Package manifest rewriting for node templates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

pub const PACKAGE_MANIFEST: &str = "package.json";

/// Set the top-level `name` of `<root>/package.json` to `name`.
///
/// Key order is preserved and the file is re-serialized with two-space indentation.
pub fn rename_package(root: &Path, name: &str) -> Result<PathBuf> {
    let path = root.join(PACKAGE_MANIFEST);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut manifest: Value = serde_json::from_str(&raw)
        .with_context(|| format!("invalid JSON in {}", path.display()))?;

    let object = manifest
        .as_object_mut()
        .ok_or_else(|| anyhow!("{} is not a JSON object", path.display()))?;
    object.insert("name".into(), Value::String(name.to_owned()));

    let data = serde_json::to_string_pretty(&manifest)
        .context("failed to serialize package manifest")?;
    fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_name_and_keeps_key_order() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(
            temp.path().join(PACKAGE_MANIFEST),
            r#"{"version":"1.0.0","name":"example-app","scripts":{"start":"node ."}}"#,
        )?;

        rename_package(temp.path(), "blog")?;

        let written = fs::read_to_string(temp.path().join(PACKAGE_MANIFEST))?;
        assert_eq!(
            written,
            "{\n  \"version\": \"1.0.0\",\n  \"name\": \"blog\",\n  \"scripts\": {\n    \"start\": \"node .\"\n  }\n}"
        );
        Ok(())
    }

    #[test]
    fn adds_name_when_missing() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join(PACKAGE_MANIFEST), r#"{"private":true}"#)?;
        rename_package(temp.path(), "blog")?;
        let value: Value =
            serde_json::from_str(&fs::read_to_string(temp.path().join(PACKAGE_MANIFEST))?)?;
        assert_eq!(value["name"], "blog");
        Ok(())
    }

    #[test]
    fn missing_manifest_is_an_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        assert!(rename_package(temp.path(), "blog").is_err());
        Ok(())
    }

    #[test]
    fn non_object_manifest_is_an_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join(PACKAGE_MANIFEST), "[1, 2]")?;
        assert!(rename_package(temp.path(), "blog").is_err());
        Ok(())
    }
}
