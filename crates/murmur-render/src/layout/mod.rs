//! Word placement strategies.
//!
//! The engine is chosen once from a capability probe: the spiral placer when one is available,
//! the deterministic grid otherwise. The spiral attempt either yields a complete surface or a
//! [`LayoutFailure`]; the grid cannot fail.

#[cfg(feature = "spiral")]
pub mod archimedean;
pub mod grid;
pub mod spiral;

pub use spiral::{SpiralOptions, SpiralPlacement, grid_size_for_width, probe};

use crate::palette::Palette;
use crate::surface::Surface;
use crate::text::TextMeasurer;
use crate::weight::WeightNormalizer;
use murmur_core::KeywordRecord;
use rand::RngCore;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutFailure {
    #[error("no spiral placement capability available")]
    CapabilityMissing,
    #[error("invalid surface size {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },
    #[error("non-finite font size {size} for word `{word}`")]
    NonFiniteSize { word: String, size: f64 },
    #[error("placer `{placer}` failed: {message}")]
    Placement { placer: String, message: String },
    #[error("placer `{placer}` panicked: {message}")]
    Panicked { placer: String, message: String },
    #[error("no word could be placed")]
    NothingPlaced,
}

#[derive(Clone)]
pub enum LayoutEngine {
    Primary(Arc<dyn SpiralPlacement>),
    Fallback,
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary(placer) => f.debug_tuple("Primary").field(&placer.name()).finish(),
            Self::Fallback => f.write_str("Fallback"),
        }
    }
}

impl LayoutEngine {
    pub fn from_probe(capability: Option<Arc<dyn SpiralPlacement>>) -> Self {
        match capability {
            Some(placer) => Self::Primary(placer),
            None => Self::Fallback,
        }
    }

    /// Engine for whatever [`probe`] finds in this build.
    pub fn detect() -> Self {
        Self::from_probe(probe())
    }

    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary(_))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Primary(placer) => placer.name(),
            Self::Fallback => "grid",
        }
    }

    /// Runs the spiral placer on a fresh canvas.
    ///
    /// Placer errors, panics and a layout that places no word at all are all reported as
    /// failures; the half-painted canvas is dropped.
    pub fn attempt_primary(
        &self,
        width: u32,
        height: u32,
        measurer: Arc<dyn TextMeasurer + Send + Sync>,
        options: &SpiralOptions,
        rng: &mut dyn RngCore,
    ) -> Result<Surface, LayoutFailure> {
        let Self::Primary(placer) = self else {
            return Err(LayoutFailure::CapabilityMissing);
        };
        let mut surface = Surface::canvas(width, height, options.font_family.clone(), measurer)?;

        match catch_unwind(AssertUnwindSafe(|| placer.place(&mut surface, options, rng))) {
            Ok(Ok(())) if surface.words().is_empty() => Err(LayoutFailure::NothingPlaced),
            Ok(Ok(())) => {
                tracing::debug!(
                    placer = placer.name(),
                    placed = surface.words().len(),
                    requested = options.list.len(),
                    "spiral layout complete"
                );
                Ok(surface)
            }
            Ok(Err(err)) => Err(err),
            Err(payload) => Err(LayoutFailure::Panicked {
                placer: placer.name().to_string(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Lays `words` out on the percentage grid.
    pub fn fallback(
        width: u32,
        height: u32,
        font_family: &str,
        words: &[KeywordRecord],
        normalizer: &WeightNormalizer,
        palette: &Palette,
    ) -> Surface {
        let placed = grid::layout_grid(words, normalizer, palette);
        Surface::positioned(width, height, font_family, placed)
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
