mod common;

use std::path::PathBuf;

use labelgrid::color::Rgb;
use labelgrid::combination::NamingMode;
use labelgrid::config::{FontSelection, RunConfig};
use labelgrid::face::{BlockFace, FontdueFace, LabelFace};
use labelgrid::fitter::{fit_label, RenderSpec};
use labelgrid::manifest::{read_manifest, to_json, write_manifest};
use labelgrid::pipeline::generate;
use labelgrid::ranges::{letter_range, number_range};

fn config(start: &str, end: &str, numbers: (i64, i64), thickness: u32) -> RunConfig {
    RunConfig {
        letters: letter_range(start, end).expect("letters should parse"),
        numbers: number_range(numbers.0, numbers.1),
        render: RenderSpec {
            outline_thickness: thickness,
            text_color: Rgb::from_hex("#102030").expect("colour"),
            outline_color: Rgb::from_hex("#F0E0D0").expect("colour"),
            ..RenderSpec::default()
        },
        naming_mode: NamingMode::Escaped,
        export_dir: None,
        output_json: PathBuf::from("output.json"),
        font: FontSelection {
            family: "Cantarell Bold".to_owned(),
            path_override: None,
            sha256: None,
        },
    }
}

#[test]
fn a_b_by_one_two_produces_four_ordered_entries() {
    let dir = tempfile::tempdir().expect("tempdir should create");
    let config = config("A", "B", (1, 2), 1);
    let summary = generate(&config, &BlockFace::default(), None).expect("generate");

    let path = dir.path().join("output.json");
    write_manifest(&path, &summary.entries).expect("manifest should write");
    let entries = read_manifest(&path).expect("manifest should read");

    let names = entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["A_1", "A_2", "B_1", "B_2"]);
    assert!(entries.iter().all(|entry| !entry.base64.is_empty()));
}

#[test]
fn identical_runs_produce_identical_manifests() {
    let config = config("-B", "C", (-2, 2), 2);
    let face = BlockFace::default();

    let first = generate(&config, &face, None).expect("first run");
    let second = generate(&config, &face, None).expect("second run");
    assert_eq!(first.entries.len(), 5 * 4);
    assert_eq!(
        to_json(&first.entries).expect("json"),
        to_json(&second.entries).expect("json"),
        "manifest bytes should be deterministic"
    );
}

#[test]
fn colours_change_the_payload() {
    let face = BlockFace::default();
    let base = config("A", "A", (1, 1), 1);
    let mut recoloured = base.clone();
    recoloured.render.text_color = Rgb::new(1, 2, 3);

    let a = generate(&base, &face, None).expect("run");
    let b = generate(&recoloured, &face, None).expect("run");
    assert_eq!(a.entries[0].name, b.entries[0].name);
    assert_ne!(a.entries[0].base64, b.entries[0].base64);
}

#[test]
fn real_font_fit_stays_within_bounds() {
    let face = FontdueFace::load(&common::fixture_font(), None).expect("font should load");
    let spec = RenderSpec::default();

    for label in ["A1", "-C-3", "ZZ26", "AA-100"] {
        let fit = fit_label(&face, label, &spec).expect("short labels should fit");
        assert!((1..=spec.initial_font_size).contains(&fit.font_size));
        assert!(fit.extent.width + 2 * spec.outline_thickness <= spec.canvas_size);
        assert!(fit.extent.line.height() + 2 * spec.outline_thickness <= spec.canvas_size);

        if fit.font_size < spec.initial_font_size {
            let larger = fit.font_size + 1;
            let metrics = face.line_metrics(larger).expect("metrics");
            let width = labelgrid::fitter::measure(&face, label, larger)
                .expect("measurable")
                .width;
            assert!(
                width + 2 > spec.canvas_size || metrics.height() + 2 > spec.canvas_size,
                "{label}: size {larger} should not have fit"
            );
        }
    }
}
