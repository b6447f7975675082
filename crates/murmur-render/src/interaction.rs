//! Pointer handling for spiral-placed clouds.
//!
//! The alpha channel is copied once after placement; every pointer event afterwards costs one
//! lookup into that copy. Pixels with non-zero alpha belong to a glyph.

use crate::layout::spiral::WordCallback;
use crate::surface::{Cursor, PlacedWord, Surface, SurfaceStyle};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Affordance {
    #[default]
    Default,
    Clickable,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerFeedback {
    pub affordance: Affordance,
    pub scale: f64,
}

impl PointerFeedback {
    pub const RESET: Self = Self {
        affordance: Affordance::Default,
        scale: 1.0,
    };
}

/// A click that landed on glyph pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct WordInteraction {
    pub x: f64,
    pub y: f64,
    /// The word under the pointer, when the secondary lookup finds one.
    pub word: Option<PlacedWord>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move { x: f64, y: f64 },
    Leave,
    Click { x: f64, y: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerResponse {
    Feedback(PointerFeedback),
    Click(Option<WordInteraction>),
}

/// Row-major copy of a surface's alpha channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaSnapshot {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl AlphaSnapshot {
    /// `None` for surfaces without a pixel buffer.
    pub fn capture(surface: &Surface) -> Option<Self> {
        Some(Self {
            width: surface.width(),
            height: surface.height(),
            alpha: surface.alpha_channel()?,
        })
    }

    pub fn alpha_at(&self, x: f64, y: f64) -> u8 {
        if !(x.is_finite() && y.is_finite() && x >= 0.0 && y >= 0.0) {
            return 0;
        }
        let (px, py) = (x.floor() as u64, y.floor() as u64);
        if px >= u64::from(self.width) || py >= u64::from(self.height) {
            return 0;
        }
        let index = py * u64::from(self.width) + px;
        self.alpha.get(index as usize).copied().unwrap_or(0)
    }

    pub fn inked_pixels(&self) -> usize {
        self.alpha.iter().filter(|a| **a > 0).count()
    }
}

/// The single pointer listener attached to a mounted spiral surface.
pub struct InteractionLayer {
    snapshot: AlphaSnapshot,
    words: Vec<PlacedWord>,
    emphasis_scale: f64,
    hover: Option<WordCallback>,
    click: Option<WordCallback>,
}

impl fmt::Debug for InteractionLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractionLayer")
            .field("words", &self.words.len())
            .field("emphasis_scale", &self.emphasis_scale)
            .field("hover", &self.hover.is_some())
            .field("click", &self.click.is_some())
            .finish_non_exhaustive()
    }
}

impl InteractionLayer {
    pub fn attach(
        surface: &Surface,
        emphasis_scale: f64,
        hover: Option<WordCallback>,
        click: Option<WordCallback>,
    ) -> Option<Self> {
        let snapshot = AlphaSnapshot::capture(surface)?;
        tracing::debug!(
            inked = snapshot.inked_pixels(),
            words = surface.words().len(),
            "interaction layer attached"
        );
        Some(Self {
            snapshot,
            words: surface.words().to_vec(),
            emphasis_scale,
            hover,
            click,
        })
    }

    pub fn snapshot(&self) -> &AlphaSnapshot {
        &self.snapshot
    }

    fn word_at(&self, x: f64, y: f64) -> Option<&PlacedWord> {
        self.words.iter().rev().find(|w| w.contains(x, y))
    }

    pub fn on_pointer_move(&self, surface: &mut Surface, x: f64, y: f64) -> PointerFeedback {
        if self.snapshot.alpha_at(x, y) == 0 {
            return self.on_pointer_leave(surface);
        }
        if let (Some(hover), Some(word)) = (&self.hover, self.word_at(x, y)) {
            hover(word);
        }
        let feedback = PointerFeedback {
            affordance: Affordance::Clickable,
            scale: self.emphasis_scale,
        };
        apply(surface, feedback);
        feedback
    }

    pub fn on_pointer_leave(&self, surface: &mut Surface) -> PointerFeedback {
        apply(surface, PointerFeedback::RESET);
        PointerFeedback::RESET
    }

    /// Reports a click over glyph pixels; clicks on empty pixels are ignored.
    pub fn on_click(&self, x: f64, y: f64) -> Option<WordInteraction> {
        if self.snapshot.alpha_at(x, y) == 0 {
            return None;
        }
        let word = self.word_at(x, y).cloned();
        match &word {
            Some(w) => tracing::info!(word = %w.word, "word clicked"),
            None => tracing::info!(x, y, "word clicked"),
        }
        if let (Some(click), Some(w)) = (&self.click, &word) {
            click(w);
        }
        Some(WordInteraction { x, y, word })
    }

    pub fn dispatch(&self, surface: &mut Surface, event: PointerEvent) -> PointerResponse {
        match event {
            PointerEvent::Move { x, y } => {
                PointerResponse::Feedback(self.on_pointer_move(surface, x, y))
            }
            PointerEvent::Leave => PointerResponse::Feedback(self.on_pointer_leave(surface)),
            PointerEvent::Click { x, y } => PointerResponse::Click(self.on_click(x, y)),
        }
    }
}

fn apply(surface: &mut Surface, feedback: PointerFeedback) {
    let cursor = match feedback.affordance {
        Affordance::Default => Cursor::Default,
        Affordance::Clickable => Cursor::Pointer,
    };
    surface.set_style(SurfaceStyle {
        cursor,
        scale: feedback.scale,
        ..surface.style()
    });
}
