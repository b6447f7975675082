#![forbid(unsafe_code)]

//! Report model, configuration and theme preference for murmur (headless).
//!
//! The report itself is produced upstream; this crate only reads it, along with the site
//! configuration that drives the word cloud renderer and the persisted light/dark preference.

pub mod config;
pub mod error;
pub mod report;
pub mod theme;

pub use config::{CloudConfig, OpacityBounds, SiteConfig};
pub use error::{Error, Result};
pub use report::{KeywordExtent, KeywordRecord, Report};
pub use theme::{JsonFileThemeStore, MemoryThemeStore, Theme, ThemePreference, ThemeStore};

#[cfg(test)]
mod tests;
