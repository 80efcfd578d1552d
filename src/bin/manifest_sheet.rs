//! Packs every tile of a manifest into one contact-sheet PNG for eyeballing.
//!
//! Run: cargo run --bin manifest_sheet -- output.json sheet.png [columns]

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use image::{imageops, RgbaImage};

use labelgrid::manifest::read_manifest;

const DEFAULT_COLUMNS: u32 = 26;

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let (Some(manifest_path), Some(sheet_path)) = (args.next(), args.next()) else {
        bail!("usage: manifest_sheet <manifest.json> <sheet.png> [columns]");
    };
    let manifest_path = PathBuf::from(manifest_path);
    let sheet_path = PathBuf::from(sheet_path);
    let columns = match args.next() {
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|value| *value > 0)
            .ok_or_else(|| anyhow!("columns must be a positive integer, got '{raw}'"))?,
        None => DEFAULT_COLUMNS,
    };

    let entries = read_manifest(&manifest_path)?;
    if entries.is_empty() {
        bail!("manifest {} has no entries", manifest_path.display());
    }

    let mut tiles = Vec::with_capacity(entries.len());
    for entry in &entries {
        let png = entry.decode_png()?;
        let tile = image::load_from_memory(&png)
            .with_context(|| format!("entry '{}' is not a valid png", entry.name))?
            .to_rgba8();
        tiles.push(tile);
    }

    let cell = tiles
        .iter()
        .map(|tile| tile.width().max(tile.height()))
        .max()
        .unwrap_or(1);
    let count = tiles.len() as u32;
    let columns = columns.min(count);
    let rows = count.div_ceil(columns);

    let mut sheet = RgbaImage::new(columns * cell, rows * cell);
    for (idx, tile) in tiles.iter().enumerate() {
        let col = idx as u32 % columns;
        let row = idx as u32 / columns;
        imageops::overlay(
            &mut sheet,
            tile,
            i64::from(col * cell),
            i64::from(row * cell),
        );
    }

    sheet
        .save(&sheet_path)
        .with_context(|| format!("failed to write {}", sheet_path.display()))?;

    println!(
        "wrote {} ({} tiles, {}x{} grid)",
        sheet_path.display(),
        count,
        columns,
        rows
    );
    Ok(())
}
