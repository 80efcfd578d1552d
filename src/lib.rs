pub mod base26;
pub mod color;
pub mod combination;
pub mod config;
pub mod error_codes;
pub mod face;
pub mod fitter;
pub mod font_locator;
pub mod manifest;
pub mod pipeline;
pub mod ranges;
pub mod render;
