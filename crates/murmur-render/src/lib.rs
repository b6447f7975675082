#![forbid(unsafe_code)]

//! Headless word cloud rendering.
//!
//! [`WordCloud`] turns an ordered keyword list into a mounted surface inside a [`Page`]
//! container. The spiral placer paints words onto a pixel buffer that also drives pointer
//! hit-testing; the grid fallback positions words by percentage offsets and needs nothing but
//! the keyword list.

pub mod cloud;
pub mod interaction;
pub mod layout;
pub mod page;
pub mod palette;
pub mod surface;
pub mod svg;
pub mod text;
pub mod weight;

pub use cloud::{CloudState, RenderOutcome, WordCloud, placed_words};
pub use interaction::{
    Affordance, AlphaSnapshot, InteractionLayer, PointerEvent, PointerFeedback, PointerResponse,
    WordInteraction,
};
pub use layout::{LayoutEngine, LayoutFailure, SpiralOptions, SpiralPlacement};
pub use page::{ContainerContent, MountedCloud, Page, WORD_CLOUD_CONTAINER};
pub use palette::{Palette, PaletteColor};
pub use surface::{PlacedWord, Position, Surface, SurfaceKind, SurfaceStyle};
pub use text::{DeterministicTextMeasurer, TextMeasurer, TextMetrics, TextStyle};
pub use weight::WeightNormalizer;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] murmur_core::Error),
    #[error("layout failed: {0}")]
    Layout(#[from] LayoutFailure),
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
