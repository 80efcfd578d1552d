use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::combination::{combinations, Combination};
use crate::config::RunConfig;
use crate::face::{FontdueFace, LabelFace};
use crate::fitter::{fit_label, SkipReason};
use crate::font_locator::{FixedFontLocator, FontLocator, SystemFontLocator};
use crate::manifest::{write_manifest, ManifestEntry, PngExport};
use crate::render::render_label;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLabel {
    pub label: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub entries: Vec<ManifestEntry>,
    pub skipped: Vec<SkippedLabel>,
    pub saved_pngs: Vec<PathBuf>,
}

/// Picks the locator implied by the config: an explicit font file wins over
/// the system search.
pub fn locator_for(config: &RunConfig) -> Box<dyn FontLocator> {
    match &config.font.path_override {
        Some(path) => Box::new(FixedFontLocator::new(path)),
        None => Box::new(SystemFontLocator::new()),
    }
}

/// Full run: prepare the export directory, load the font, render every
/// combination and write the manifest.
pub fn run(config: &RunConfig, locator: &dyn FontLocator) -> Result<RunSummary> {
    let export = config
        .export_dir
        .as_deref()
        .map(PngExport::create)
        .transpose()?;

    let font_path = locator.locate(&config.font.family)?;
    let face = FontdueFace::load(&font_path, config.font.sha256.as_deref())?;
    log::info!(
        "using font '{}' from {}",
        face.name().unwrap_or(&config.font.family),
        font_path.display()
    );

    let summary = generate(config, &face, export.as_ref())?;

    log::info!(
        "{} entries ready, {} skipped",
        summary.entries.len(),
        summary.skipped.len()
    );
    write_manifest(&config.output_json, &summary.entries)?;
    log::info!("manifest saved to {}", config.output_json.display());
    Ok(summary)
}

/// Renders every combination in letter-major order. Labels that cannot be
/// fitted are recorded in `skipped` and do not stop the batch.
pub fn generate(
    config: &RunConfig,
    face: &dyn LabelFace,
    export: Option<&PngExport>,
) -> Result<RunSummary> {
    let combos = combinations(&config.letters, &config.numbers);
    log::info!("{} combinations", combos.len());

    let mut summary = RunSummary::default();
    for combo in &combos {
        process_one(config, face, export, combo, &mut summary)?;
    }
    Ok(summary)
}

fn process_one(
    config: &RunConfig,
    face: &dyn LabelFace,
    export: Option<&PngExport>,
    combo: &Combination,
    summary: &mut RunSummary,
) -> Result<()> {
    let label = combo.display_name();
    log::info!("processing {label}");

    let fit = match fit_label(face, &label, &config.render) {
        Ok(fit) => fit,
        Err(reason) => {
            log::warn!("skipping '{label}': {reason}");
            summary.skipped.push(SkippedLabel { label, reason });
            return Ok(());
        }
    };

    let image = render_label(face, &label, &fit, &config.render)
        .with_context(|| format!("failed to render '{label}'"))?;
    let png = image.to_png()?;

    summary.entries.push(ManifestEntry::from_png(
        combo.manifest_name(config.naming_mode),
        &png,
    ));

    if let Some(export) = export {
        let path = export.save(&label, &png)?;
        log::info!("saved {}", path.display());
        summary.saved_pngs.push(path);
    }

    log::info!("added '{label}' at font size {}", fit.font_size);
    Ok(())
}
