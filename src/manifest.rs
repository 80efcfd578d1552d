use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{json, Serializer};

use crate::error_codes::{CodedError, MANIFEST_WRITE_FAILED};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub name: String,
    pub base64: String,
}

impl ManifestEntry {
    pub fn from_png(name: impl Into<String>, png: &[u8]) -> Self {
        Self {
            name: name.into(),
            base64: general_purpose::STANDARD.encode(png),
        }
    }

    pub fn decode_png(&self) -> Result<Vec<u8>> {
        general_purpose::STANDARD
            .decode(&self.base64)
            .with_context(|| format!("entry '{}' has invalid base64 payload", self.name))
    }
}

/// Serialises entries as a JSON array with 4-space indentation.
pub fn to_json(entries: &[ManifestEntry]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    entries
        .serialize(&mut serializer)
        .context("failed to serialize manifest")?;
    Ok(out)
}

pub fn write_manifest(path: &Path, entries: &[ManifestEntry]) -> Result<()> {
    let json = to_json(entries)?;
    fs::write(path, json).map_err(|error| {
        anyhow!(CodedError::io(
            MANIFEST_WRITE_FAILED,
            format!("failed to write manifest '{}': {error}", path.display()),
        )
        .with_details(json!({ "path": path.display().to_string() })))
    })
}

pub fn read_manifest(path: &Path) -> Result<Vec<ManifestEntry>> {
    let contents = fs::read(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    serde_json::from_slice(&contents)
        .with_context(|| format!("failed to parse manifest {}", path.display()))
}

/// Directory that receives individual PNG tiles.
#[derive(Debug, Clone)]
pub struct PngExport {
    dir: PathBuf,
}

impl PngExport {
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn tile_path(&self, display_name: &str) -> PathBuf {
        self.dir.join(format!("{display_name}.png"))
    }

    pub fn save(&self, display_name: &str, png: &[u8]) -> Result<PathBuf> {
        let path = self.tile_path(display_name);
        fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}
