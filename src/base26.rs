//! Spreadsheet-style column letters: `A`=1 .. `Z`=26, `AA`=27, and so on.
//!
//! There is no zero digit, so the mapping is a bijection between the
//! positive integers and non-empty strings over `A-Z`. A leading `-`
//! carries the sign; zero has no textual form.

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::error_codes::{CodedError, INVALID_LETTER};

const RADIX: i64 = 26;

/// Encodes a non-zero index as its letter label.
///
/// The domain is `1 <= |index| <= i64::MAX`, the range `decode` can return.
/// `0` and `i64::MIN` have no label and give `None`.
pub fn encode(index: i64) -> Option<String> {
    if index == 0 || index == i64::MIN {
        return None;
    }

    let mut magnitude = index.unsigned_abs();
    let mut digits = Vec::new();
    while magnitude > 0 {
        let remainder = (magnitude - 1) % RADIX as u64;
        digits.push(b'A' + remainder as u8);
        magnitude = (magnitude - 1) / RADIX as u64;
    }
    digits.reverse();

    let mut label = String::with_capacity(digits.len() + 1);
    if index < 0 {
        label.push('-');
    }
    label.extend(digits.into_iter().map(char::from));
    Some(label)
}

/// Decodes a letter label back into its signed index.
///
/// Only upper-case ASCII letters are accepted after the optional sign;
/// callers that take user input should normalise case first.
pub fn decode(label: &str) -> Result<i64> {
    let (sign, digits) = match label.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, label),
    };

    if digits.is_empty() {
        return Err(invalid_letter(label, "no letters"));
    }

    let mut total: i64 = 0;
    for ch in digits.chars() {
        if !ch.is_ascii_uppercase() {
            return Err(invalid_letter(
                label,
                &format!("'{}' is not a letter A-Z", ch.escape_default()),
            ));
        }
        let digit = i64::from(ch as u8 - b'A' + 1);
        total = total
            .checked_mul(RADIX)
            .and_then(|value| value.checked_add(digit))
            .ok_or_else(|| invalid_letter(label, "value out of range"))?;
    }

    Ok(sign * total)
}

fn invalid_letter(label: &str, reason: &str) -> anyhow::Error {
    anyhow!(CodedError::usage(
        INVALID_LETTER,
        format!("invalid letter label '{label}': {reason}"),
    )
    .with_details(json!({ "provided": label })))
}
