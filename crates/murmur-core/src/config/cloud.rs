use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// Opacity range of the fade-in applied after a spiral layout completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpacityBounds {
    pub from: f64,
    pub to: f64,
    pub transition_ms: u32,
}

impl Default for OpacityBounds {
    fn default() -> Self {
        Self {
            from: 0.0,
            to: 1.0,
            transition_ms: 500,
        }
    }
}

/// Immutable word cloud settings shared by every component of one renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudConfig {
    pub palette: Vec<String>,
    pub min_font_size: f64,
    pub max_font_size: f64,
    pub font_family: String,
    /// Share of words drawn rotated by the spiral placer.
    pub rotate_ratio: f64,
    pub rotation_steps: u32,
    /// Rotation range in radians.
    pub min_rotation: f64,
    pub max_rotation: f64,
    /// Drawing surface size in pixels.
    pub width: u32,
    pub height: u32,
    /// Uniform scale applied to the surface while the pointer is over a glyph.
    pub emphasis_scale: f64,
    pub opacity: OpacityBounds,
    pub placeholder: String,
    pub shrink_to_fit: bool,
    pub draw_out_of_bound: bool,
    pub background_color: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            palette: [
                "#6366f1", "#8b5cf6", "#ec4899", "#f43f5e", "#f97316", "#eab308", "#22c55e",
                "#14b8a6", "#06b6d4", "#3b82f6",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            min_font_size: 20.0,
            max_font_size: 80.0,
            font_family: "\"PingFang SC\", \"Microsoft YaHei\", sans-serif".to_string(),
            rotate_ratio: 0.3,
            rotation_steps: 2,
            min_rotation: -FRAC_PI_2,
            max_rotation: FRAC_PI_2,
            width: 800,
            height: 400,
            emphasis_scale: 1.05,
            opacity: OpacityBounds::default(),
            placeholder: "No hot words yet".to_string(),
            shrink_to_fit: true,
            draw_out_of_bound: false,
            background_color: "transparent".to_string(),
        }
    }
}

impl CloudConfig {
    pub fn validate(&self) -> Result<()> {
        if self.palette.is_empty() {
            return Err(Error::invalid_config(
                "palette",
                "at least one color is required",
            ));
        }
        if let Some(blank) = self.palette.iter().position(|c| c.trim().is_empty()) {
            return Err(Error::invalid_config(
                "palette",
                format!("color #{blank} is empty"),
            ));
        }
        if !(self.min_font_size.is_finite() && self.min_font_size > 0.0) {
            return Err(Error::invalid_config(
                "minFontSize",
                format!("must be a positive number, got {}", self.min_font_size),
            ));
        }
        if !(self.max_font_size.is_finite() && self.max_font_size >= self.min_font_size) {
            return Err(Error::invalid_config(
                "maxFontSize",
                format!(
                    "must be a number >= minFontSize ({}), got {}",
                    self.min_font_size, self.max_font_size
                ),
            ));
        }
        if !(0.0..=1.0).contains(&self.rotate_ratio) {
            return Err(Error::invalid_config(
                "rotateRatio",
                format!("must lie in [0, 1], got {}", self.rotate_ratio),
            ));
        }
        if !(self.min_rotation.is_finite()
            && self.max_rotation.is_finite()
            && self.min_rotation <= self.max_rotation)
        {
            return Err(Error::invalid_config(
                "minRotation",
                "rotation range must be finite with minRotation <= maxRotation",
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_config(
                "width",
                format!(
                    "surface must be non-empty, got {}x{}",
                    self.width, self.height
                ),
            ));
        }
        if !(self.emphasis_scale.is_finite() && self.emphasis_scale > 0.0) {
            return Err(Error::invalid_config(
                "emphasisScale",
                format!("must be a positive number, got {}", self.emphasis_scale),
            ));
        }
        let OpacityBounds { from, to, .. } = self.opacity;
        if !((0.0..=1.0).contains(&from) && (0.0..=1.0).contains(&to)) {
            return Err(Error::invalid_config(
                "opacity",
                format!("bounds must lie in [0, 1], got {from}..{to}"),
            ));
        }
        Ok(())
    }
}
