use clap::ValueEnum;
use serde::Serialize;

const NEGATIVE_PREFIX: &str = "neg_";

/// One letter/number cell, e.g. `B` x `-3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination {
    pub letter: String,
    pub number: i64,
}

impl Combination {
    pub fn new(letter: impl Into<String>, number: i64) -> Self {
        Self {
            letter: letter.into(),
            number,
        }
    }

    /// Text drawn on the tile and used as the PNG file stem: `-C-3`.
    pub fn display_name(&self) -> String {
        format!("{}{}", self.letter, self.number)
    }

    /// JSON/filesystem-safe key: `neg_C_neg_3`.
    pub fn manifest_key(&self) -> String {
        format!(
            "{}_{}",
            escape_sign(&self.letter),
            escape_sign(&self.number.to_string())
        )
    }

    pub fn manifest_name(&self, mode: NamingMode) -> String {
        match mode {
            NamingMode::Escaped => self.manifest_key(),
            NamingMode::Raw => self.display_name(),
        }
    }
}

fn escape_sign(component: &str) -> String {
    match component.strip_prefix('-') {
        Some(rest) => format!("{NEGATIVE_PREFIX}{rest}"),
        None => component.to_owned(),
    }
}

/// How the manifest `name` field is derived from a combination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    /// `neg_`-escaped key joined with `_`.
    #[default]
    Escaped,
    /// Display text verbatim.
    Raw,
}

/// Letters vary slowest: `A1, A2, B1, B2`.
pub fn combinations(letters: &[String], numbers: &[i64]) -> Vec<Combination> {
    letters
        .iter()
        .flat_map(|letter| {
            numbers
                .iter()
                .map(move |number| Combination::new(letter.clone(), *number))
        })
        .collect()
}
