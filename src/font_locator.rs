use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use serde_json::json;
use sha2::{Digest, Sha256};
use ttf_parser::name_id;
use walkdir::WalkDir;

use crate::error_codes::{
    CodedError, FONT_HASH_MISMATCH, FONT_NOT_FOUND, FONT_UNREADABLE, INVALID_FONT_HASH,
};

/// Family the tiles are drawn with.
pub const DEFAULT_FONT_FAMILY: &str = "Cantarell Bold";

const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// Resolves a font family name to a loadable font file.
pub trait FontLocator {
    fn locate(&self, family: &str) -> Result<PathBuf>;
}

/// One installed font file and the names its `name` table answers to.
///
/// Collections are described by their first face, which is the face
/// `FontdueFace::load` reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRecord {
    pub path: PathBuf,
    pub full_name: Option<String>,
    /// Full name, PostScript name, `family subfamily` (plain and
    /// typographic) and the bare family, normalised and deduplicated.
    pub names: Vec<String>,
}

impl FontRecord {
    /// Reads the name table of the first face in `data`; `None` when the
    /// bytes are not a font.
    pub fn from_bytes(path: PathBuf, data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let lookup = |id: u16| {
            face.names()
                .into_iter()
                .filter(|name| name.name_id == id)
                .find_map(|name| name.to_string())
        };

        let full_name = lookup(name_id::FULL_NAME);
        let family = lookup(name_id::FAMILY);
        let subfamily = lookup(name_id::SUBFAMILY);
        let typographic_family = lookup(name_id::TYPOGRAPHIC_FAMILY);
        let typographic_subfamily = lookup(name_id::TYPOGRAPHIC_SUBFAMILY);

        let mut names = Vec::new();
        names.extend(full_name.clone());
        names.extend(lookup(name_id::POST_SCRIPT_NAME));
        for (family, style) in [
            (&family, &subfamily),
            (&typographic_family, &typographic_subfamily),
        ] {
            if let (Some(family), Some(style)) = (family, style) {
                names.push(format!("{family} {style}"));
            }
        }
        names.extend(typographic_family);
        names.extend(family);

        let mut names = names
            .iter()
            .map(|name| normalize_font_name(name))
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names.dedup();

        Some(Self {
            path,
            full_name,
            names,
        })
    }

    fn answers_to(&self, wanted: &str) -> bool {
        self.names.iter().any(|name| name == wanted)
    }

    fn partially_answers_to(&self, wanted: &str) -> bool {
        self.names.iter().any(|name| name.contains(wanted))
    }
}

/// Searches the platform's font directories and matches faces by the names
/// recorded inside the font, never by file name.
#[derive(Debug, Clone)]
pub struct SystemFontLocator {
    roots: Vec<PathBuf>,
}

impl SystemFontLocator {
    pub fn new() -> Self {
        Self {
            roots: platform_font_dirs(),
        }
    }

    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Every readable font under the search roots, sorted by path. Files
    /// that do not parse as fonts are left out.
    pub fn list_fonts(&self) -> Vec<FontRecord> {
        let mut records = Vec::new();
        for path in self.font_files() {
            let data = match fs::read(&path) {
                Ok(data) => data,
                Err(error) => {
                    log::debug!("skipping {}: {error}", path.display());
                    continue;
                }
            };
            match FontRecord::from_bytes(path.clone(), &data) {
                Some(record) => records.push(record),
                None => log::debug!("skipping {}: not a font", path.display()),
            }
        }
        records
    }

    fn font_files(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for root in &self.roots {
            log::debug!("scanning font directory {}", root.display());
            for entry in WalkDir::new(root)
                .follow_links(true)
                .into_iter()
                .filter_map(std::result::Result::ok)
            {
                if entry.file_type().is_file() && has_font_extension(entry.path()) {
                    found.push(entry.into_path());
                }
            }
        }
        found.sort();
        found.dedup();
        found
    }
}

impl FontLocator for SystemFontLocator {
    /// An exact match on any recorded name wins; otherwise the first font
    /// (by path) with a name containing the request.
    fn locate(&self, family: &str) -> Result<PathBuf> {
        let wanted = normalize_font_name(family);
        let records = self.list_fonts();
        let found = records
            .iter()
            .find(|record| record.answers_to(&wanted))
            .or_else(|| {
                records
                    .iter()
                    .find(|record| record.partially_answers_to(&wanted))
            });

        if let Some(record) = found {
            log::debug!(
                "'{family}' resolved to '{}' at {}",
                record.full_name.as_deref().unwrap_or("?"),
                record.path.display()
            );
            return Ok(record.path.clone());
        }

        let searched = self
            .roots
            .iter()
            .map(|root| root.display().to_string())
            .collect::<Vec<_>>();
        Err(anyhow!(CodedError::resource(
            FONT_NOT_FOUND,
            format!("could not find font '{family}'; make sure it is installed"),
        )
        .with_details(json!({
            "family": family,
            "searched": searched,
            "scanned": records.len()
        }))))
    }
}

/// Always answers with one explicit file, whatever family is asked for.
#[derive(Debug, Clone)]
pub struct FixedFontLocator {
    path: PathBuf,
}

impl FixedFontLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FontLocator for FixedFontLocator {
    fn locate(&self, family: &str) -> Result<PathBuf> {
        if self.path.is_file() {
            return Ok(self.path.clone());
        }
        Err(anyhow!(CodedError::resource(
            FONT_NOT_FOUND,
            format!(
                "font file '{}' (for '{family}') does not exist or is not a file",
                self.path.display()
            ),
        )
        .with_details(json!({ "path": self.path.display().to_string() }))))
    }
}

/// Lower-cases and drops separators so `Cantarell Bold` matches the
/// PostScript name `Cantarell-Bold`.
pub fn normalize_font_name(name: &str) -> String {
    name.chars()
        .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Validates a `--font_sha256` pin: 64 hex characters, case-insensitive.
pub fn parse_sha256_pin(value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.len() != 64 || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(anyhow!(CodedError::usage(
            INVALID_FONT_HASH,
            format!("invalid font sha256 '{value}': expected 64 hex characters"),
        )));
    }
    Ok(trimmed.to_ascii_lowercase())
}

pub fn read_font_bytes(path: &Path, expected_sha256: Option<&str>) -> Result<Vec<u8>> {
    let bytes = fs::read(path).map_err(|error| {
        anyhow!(CodedError::resource(
            FONT_UNREADABLE,
            format!("failed to read font file '{}': {error}", path.display()),
        ))
    })?;

    if let Some(expected) = expected_sha256 {
        let actual = sha256_hex(&bytes);
        if actual != expected {
            return Err(anyhow!(CodedError::resource(
                FONT_HASH_MISMATCH,
                format!(
                    "{} expected sha256={} actual sha256={}",
                    path.display(),
                    expected,
                    actual
                ),
            )));
        }
    }

    Ok(bytes)
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            FONT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

fn platform_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    let home = env::var_os("HOME").map(PathBuf::from);

    if cfg!(windows) {
        if let Some(windir) = env::var_os("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        }
        if let Some(local) = env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft/Windows/Fonts"));
        }
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = &home {
            dirs.push(home.join("Library/Fonts"));
        }
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = &home {
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }

    dirs
}
