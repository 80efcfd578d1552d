mod common;

use std::fs;

use serde_json::Value;
use tempfile::tempdir;

use common::{fixture_font, fixture_font_arg, run_labelgrid};
use labelgrid::font_locator::sha256_hex;
use labelgrid::manifest::read_manifest;

fn stderr_envelope(output: &std::process::Output) -> Value {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .rev()
        .find(|line| line.starts_with('{'))
        .unwrap_or_else(|| panic!("no json envelope in stderr: {stderr}"));
    serde_json::from_str(line).expect("envelope should be json")
}

#[test]
fn invalid_color_exits_with_usage_code() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_labelgrid(dir.path(), &["--text_color", "#12GG56"]);

    assert_eq!(output.status.code(), Some(2));
    let envelope = stderr_envelope(&output);
    assert_eq!(envelope["ok"], Value::Bool(false));
    assert_eq!(envelope["error"]["code"], "INVALID_COLOR");
    assert_eq!(envelope["error"]["details"]["provided"], "#12GG56");
    assert!(!dir.path().join("output.json").exists());
}

#[test]
fn invalid_letter_exits_with_usage_code() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_labelgrid(dir.path(), &["--start_letter", "A1"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_envelope(&output)["error"]["code"], "INVALID_LETTER");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("A1"), "diagnostic should name the input: {stderr}");
}

#[test]
fn missing_font_file_exits_with_resource_code() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_labelgrid(
        dir.path(),
        &["--font_path", "no-such-font.ttf", "--export_png"],
    );

    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_envelope(&output)["error"]["code"], "FONT_NOT_FOUND");
    assert!(!dir.path().join("output.json").exists());
}

#[test]
fn malformed_font_hash_is_rejected_up_front() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_labelgrid(dir.path(), &["--font_sha256", "1234"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stderr_envelope(&output)["error"]["code"], "INVALID_FONT_HASH");
}

#[test]
fn list_fonts_succeeds_even_without_fonts() {
    let dir = tempdir().expect("tempdir should create");
    let output = run_labelgrid(dir.path(), &["--list_fonts"]);
    assert!(output.status.success(), "--list_fonts should exit 0");
}

#[test]
fn two_by_two_run_writes_four_entries_and_pngs() {
    let dir = tempdir().expect("tempdir should create");
    let font_arg = fixture_font_arg();

    let output = run_labelgrid(
        dir.path(),
        &[
            "--start_letter",
            "A",
            "--end_letter",
            "B",
            "--start_number",
            "1",
            "--end_number",
            "2",
            "--export_png",
            "--font_path",
            &font_arg,
        ],
    );
    assert!(
        output.status.success(),
        "run should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let entries = read_manifest(&dir.path().join("output.json")).expect("manifest should load");
    let names = entries
        .iter()
        .map(|entry| entry.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["A_1", "A_2", "B_1", "B_2"]);
    for entry in &entries {
        let png = entry.decode_png().expect("payload should decode");
        assert!(png.starts_with(b"\x89PNG"), "{} is not a png", entry.name);
    }

    for label in ["A1", "A2", "B1", "B2"] {
        let path = dir.path().join("images").join(format!("{label}.png"));
        assert!(path.is_file(), "missing {}", path.display());
    }

    let raw = fs::read_to_string(dir.path().join("output.json")).expect("manifest text");
    assert!(raw.starts_with("[\n    {"), "manifest should use 4-space indent");
}

#[test]
fn raw_naming_mode_keeps_signed_labels() {
    let dir = tempdir().expect("tempdir should create");
    let font_arg = fixture_font_arg();

    let output = run_labelgrid(
        dir.path(),
        &[
            "--start_letter=-C",
            "--end_letter=-C",
            "--start_number",
            "-3",
            "--end_number",
            "-3",
            "--naming_mode",
            "raw",
            "--output_json",
            "tiles.json",
            "--font_path",
            &font_arg,
        ],
    );
    assert!(output.status.success());

    let entries = read_manifest(&dir.path().join("tiles.json")).expect("manifest should load");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "-C-3");
}

#[test]
fn pinned_font_hash_is_enforced() {
    let dir = tempdir().expect("tempdir should create");
    let font_arg = fixture_font_arg();
    let actual = sha256_hex(&fs::read(fixture_font()).expect("fixture font"));
    let wrong = "0".repeat(64);

    let output = run_labelgrid(
        dir.path(),
        &["--font_path", &font_arg, "--font_sha256", &wrong],
    );
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_envelope(&output)["error"]["code"], "FONT_HASH_MISMATCH");
    assert!(!dir.path().join("output.json").exists());

    let output = run_labelgrid(
        dir.path(),
        &[
            "--end_letter",
            "A",
            "--end_number",
            "1",
            "--font_path",
            &font_arg,
            "--font_sha256",
            &actual.to_ascii_uppercase(),
        ],
    );
    assert!(
        output.status.success(),
        "matching pin should render: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}
