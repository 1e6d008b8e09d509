//! Resolution manifest loading and validation.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level manifest: a batch of libraries and the symbols to resolve in each.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Manifest {
    /// Manifest name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Libraries to open, in order.
    #[serde(rename = "library", default)]
    pub libraries: Vec<LibraryEntry>,
}

/// One library in a manifest.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LibraryEntry {
    /// Path or loader name; omitted for the process image.
    #[serde(default)]
    pub path: Option<String>,

    /// Append the platform suffix (`.so`, `.dylib`, `.dll`) when missing.
    #[serde(default)]
    pub append_suffix: bool,

    /// Exported symbol names to resolve.
    pub symbols: Vec<String>,
}

impl LibraryEntry {
    /// Entry for the running process image.
    #[cfg(test)]
    pub fn process_image(symbols: Vec<String>) -> Self {
        Self {
            path: None,
            append_suffix: false,
            symbols,
        }
    }

    /// Label used in logs and reports.
    pub fn label(&self) -> &str {
        self.path.as_deref().unwrap_or("<process>")
    }
}

/// Load a manifest from a file.
///
/// Files ending in `.json` are read as JSON, anything else as TOML.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest: {:?}", path))?;

    let is_json = path.extension().map_or(false, |e| e == "json");
    let manifest = parse_manifest(&content, is_json)?;

    tracing::debug!(
        path = %path.display(),
        libraries = manifest.libraries.len(),
        "Loaded manifest"
    );

    Ok(manifest)
}

/// Parse and validate manifest text.
pub fn parse_manifest(content: &str, is_json: bool) -> Result<Manifest> {
    let manifest: Manifest = if is_json {
        serde_json::from_str(content).with_context(|| "Failed to parse manifest as JSON")?
    } else {
        toml::from_str(content).with_context(|| "Failed to parse manifest as TOML")?
    };

    validate_manifest(&manifest)?;

    Ok(manifest)
}

/// Validate a manifest.
pub fn validate_manifest(manifest: &Manifest) -> Result<()> {
    if manifest.libraries.is_empty() {
        anyhow::bail!("Manifest lists no libraries");
    }

    for (index, entry) in manifest.libraries.iter().enumerate() {
        if entry.symbols.is_empty() {
            anyhow::bail!(
                "Library #{} ({}) lists no symbols",
                index + 1,
                entry.label()
            );
        }
        if entry.symbols.iter().any(|s| s.is_empty()) {
            anyhow::bail!(
                "Library #{} ({}) has an empty symbol name",
                index + 1,
                entry.label()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_MANIFEST: &str = r#"
name = "smoke"

[[library]]
symbols = ["malloc", "free"]

[[library]]
path = "libm"
append_suffix = true
symbols = ["cos"]
"#;

    #[test]
    fn test_parse_toml_manifest() {
        let manifest = parse_manifest(TOML_MANIFEST, false).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("smoke"));
        assert_eq!(manifest.libraries.len(), 2);

        let first = &manifest.libraries[0];
        assert!(first.path.is_none());
        assert!(!first.append_suffix);
        assert_eq!(first.label(), "<process>");
        assert_eq!(first.symbols, vec!["malloc", "free"]);

        let second = &manifest.libraries[1];
        assert_eq!(second.path.as_deref(), Some("libm"));
        assert!(second.append_suffix);
    }

    #[test]
    fn test_parse_json_manifest() {
        let json = r#"{"library": [{"path": "/usr/lib/libz.so", "symbols": ["inflate"]}]}"#;
        let manifest = parse_manifest(json, true).unwrap();
        assert!(manifest.name.is_none());
        assert_eq!(manifest.libraries[0].label(), "/usr/lib/libz.so");
    }

    #[test]
    fn test_rejects_empty_manifest() {
        let err = parse_manifest("name = \"empty\"", false).unwrap_err();
        assert!(err.to_string().contains("no libraries"));
    }

    #[test]
    fn test_rejects_entry_without_symbols() {
        let toml = "[[library]]\npath = \"libm.so.6\"\nsymbols = []\n";
        let err = parse_manifest(toml, false).unwrap_err();
        assert!(err.to_string().contains("libm.so.6"));
    }

    #[test]
    fn test_rejects_empty_symbol_name() {
        let toml = "[[library]]\nsymbols = [\"malloc\", \"\"]\n";
        assert!(parse_manifest(toml, false).is_err());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(parse_manifest("[[library]\n", false).is_err());
    }
}
