use anyhow::{Context, Result};

use crate::base26;

/// Parses a user-supplied letter endpoint: surrounding whitespace is
/// ignored and lower-case letters are accepted.
pub fn parse_letter(raw: &str) -> Result<i64> {
    let normalized = raw.trim().to_ascii_uppercase();
    base26::decode(&normalized)
}

/// Inclusive letter labels from `start` to `end`, descending when `start`
/// sorts after `end`. Index zero is never emitted.
pub fn letter_range(start: &str, end: &str) -> Result<Vec<String>> {
    let start_index =
        parse_letter(start).with_context(|| format!("invalid start letter '{start}'"))?;
    let end_index = parse_letter(end).with_context(|| format!("invalid end letter '{end}'"))?;

    Ok(inclusive_skipping_zero(start_index, end_index)
        .filter_map(base26::encode)
        .collect())
}

/// Inclusive integers from `start` to `end` in either direction, without `0`.
pub fn number_range(start: i64, end: i64) -> Vec<i64> {
    inclusive_skipping_zero(start, end).collect()
}

fn inclusive_skipping_zero(start: i64, end: i64) -> Box<dyn Iterator<Item = i64>> {
    if start <= end {
        Box::new((start..=end).filter(|value| *value != 0))
    } else {
        Box::new((end..=start).rev().filter(|value| *value != 0))
    }
}
