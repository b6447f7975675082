//! The spiral placement capability and the options record it is driven by.

use super::LayoutFailure;
use crate::palette::PaletteColor;
use crate::surface::{PlacedWord, Surface};
use murmur_core::KeywordRecord;
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

pub type WeightFactorFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;
pub type ColorFn = Arc<dyn Fn(&mut dyn RngCore) -> PaletteColor + Send + Sync>;
pub type WordCallback = Arc<dyn Fn(&PlacedWord) + Send + Sync>;

/// Plain configuration record handed to a [`SpiralPlacement`].
#[derive(Clone)]
pub struct SpiralOptions {
    pub list: Vec<KeywordRecord>,
    /// Occupancy cell size in pixels.
    pub grid_size: u32,
    /// Font size for a keyword weight.
    pub weight_factor: WeightFactorFn,
    pub font_family: String,
    pub color: ColorFn,
    pub rotate_ratio: f64,
    pub rotation_steps: u32,
    pub min_rotation: f64,
    pub max_rotation: f64,
    pub background_color: String,
    /// When false, words that cannot be placed fully inside the surface are not drawn.
    pub draw_out_of_bound: bool,
    /// Retry unplaceable words at 3/4 of their size, down to `min_size`.
    pub shrink_to_fit: bool,
    pub min_size: f64,
    pub hover: Option<WordCallback>,
    pub click: Option<WordCallback>,
}

impl fmt::Debug for SpiralOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpiralOptions")
            .field("list", &self.list.len())
            .field("grid_size", &self.grid_size)
            .field("font_family", &self.font_family)
            .field("rotate_ratio", &self.rotate_ratio)
            .field("rotation_steps", &self.rotation_steps)
            .field("background_color", &self.background_color)
            .field("draw_out_of_bound", &self.draw_out_of_bound)
            .field("shrink_to_fit", &self.shrink_to_fit)
            .field("hover", &self.hover.is_some())
            .field("click", &self.click.is_some())
            .finish_non_exhaustive()
    }
}

/// Occupancy grid resolution for a surface width: 16px cells at 1024px, never below 4px.
pub fn grid_size_for_width(width: u32) -> u32 {
    ((16.0 * f64::from(width) / 1024.0).round() as u32).max(4)
}

/// Collision-aware text placement onto a drawing surface.
///
/// Implementations paint every word they place through [`Surface::paint_word`] and leave words
/// they cannot place undrawn. An `Err` means the surface must be thrown away.
pub trait SpiralPlacement: Send + Sync {
    fn name(&self) -> &str;

    fn place(
        &self,
        surface: &mut Surface,
        options: &SpiralOptions,
        rng: &mut dyn RngCore,
    ) -> Result<(), LayoutFailure>;
}

/// Looks for a spiral placement capability in this build.
pub fn probe() -> Option<Arc<dyn SpiralPlacement>> {
    #[cfg(feature = "spiral")]
    {
        Some(Arc::new(super::archimedean::ArchimedeanPlacer::default()))
    }
    #[cfg(not(feature = "spiral"))]
    {
        None
    }
}
