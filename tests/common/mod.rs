#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

pub fn run_labelgrid(cwd: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_labelgrid"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("labelgrid command should run")
}

/// DejaVu Sans Bold, checked in so real-font tests never depend on the host.
pub fn fixture_font() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/DejaVuSans-Bold.ttf")
}

pub fn fixture_font_arg() -> String {
    fixture_font().to_string_lossy().to_string()
}
