use std::fmt;

use anyhow::{anyhow, Result};
use serde_json::json;

use crate::error_codes::{CodedError, INVALID_COLOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB`; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Result<Self> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(anyhow!(CodedError::usage(
                INVALID_COLOR,
                format!("invalid hex color '{value}': expected #RRGGBB"),
            )
            .with_details(json!({
                "provided": value,
                "expected": "#RRGGBB"
            }))));
        }

        let channel = |offset: usize| u8::from_str_radix(&digits[offset..offset + 2], 16);
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
