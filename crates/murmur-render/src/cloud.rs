//! The word cloud orchestrator.
//!
//! One [`WordCloud`] renders keyword lists into page containers. Each render validates the
//! input, tries the spiral placer when one was detected at construction, falls back to the grid
//! on any failure and mounts the result, replacing whatever the container held before.

use crate::interaction::InteractionLayer;
use crate::layout::spiral::{SpiralOptions, SpiralPlacement, WordCallback, grid_size_for_width};
use crate::layout::{LayoutEngine, LayoutFailure};
use crate::page::{ContainerContent, MountedCloud, Page};
use crate::palette::Palette;
use crate::surface::{PlacedWord, SurfaceStyle};
use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use crate::weight::WeightNormalizer;
use crate::{Error, Result};
use murmur_core::{CloudConfig, KeywordRecord};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudState {
    Idle,
    Validating,
    PrimaryLayout,
    FallbackLayout,
    Interactive,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The container does not exist; the page was not touched.
    MissingContainer,
    /// No keywords; the container shows the placeholder text.
    Placeholder,
    Primary { placed: usize },
    /// Grid layout. `reason` is the spiral failure that led here, `None` when no spiral placer
    /// was available.
    Fallback {
        placed: usize,
        reason: Option<LayoutFailure>,
    },
}

pub struct WordCloud {
    config: CloudConfig,
    palette: Palette,
    engine: LayoutEngine,
    measurer: Arc<dyn TextMeasurer + Send + Sync>,
    rng: StdRng,
    state: CloudState,
    transitions: Vec<CloudState>,
    hover: Option<WordCallback>,
    click: Option<WordCallback>,
}

impl fmt::Debug for WordCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordCloud")
            .field("engine", &self.engine)
            .field("state", &self.state)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

impl WordCloud {
    /// Builds an orchestrator around a validated configuration and a capability probe result.
    pub fn new(config: CloudConfig, capability: Option<Arc<dyn SpiralPlacement>>) -> Result<Self> {
        config.validate()?;
        let palette = Palette::new(config.palette.iter().cloned()).ok_or_else(|| {
            Error::Config(murmur_core::Error::InvalidConfig {
                key: "palette".to_string(),
                message: "must contain at least one color".to_string(),
            })
        })?;
        let engine = LayoutEngine::from_probe(capability);
        tracing::debug!(engine = engine.name(), "word cloud ready");
        Ok(Self {
            config,
            palette,
            engine,
            measurer: Arc::new(DeterministicTextMeasurer::default()),
            rng: StdRng::from_entropy(),
            state: CloudState::Idle,
            transitions: Vec::new(),
            hover: None,
            click: None,
        })
    }

    /// Makes random color and rotation choices reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
        self.measurer = measurer;
        self
    }

    pub fn on_hover(mut self, callback: WordCallback) -> Self {
        self.hover = Some(callback);
        self
    }

    pub fn on_click(mut self, callback: WordCallback) -> Self {
        self.click = Some(callback);
        self
    }

    pub fn config(&self) -> &CloudConfig {
        &self.config
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn state(&self) -> CloudState {
        self.state
    }

    /// States visited by the most recent render, starting with `Validating`.
    pub fn transitions(&self) -> &[CloudState] {
        &self.transitions
    }

    fn enter(&mut self, state: CloudState) {
        tracing::debug!(from = ?self.state, to = ?state, "word cloud transition");
        self.state = state;
        self.transitions.push(state);
    }

    pub fn render(
        &mut self,
        page: &mut Page,
        container_id: &str,
        words: &[KeywordRecord],
    ) -> RenderOutcome {
        self.transitions.clear();
        if !page.has_container(container_id) {
            tracing::error!(container = container_id, "word cloud container not found");
            self.state = CloudState::Idle;
            return RenderOutcome::MissingContainer;
        }

        self.enter(CloudState::Validating);
        let Some(normalizer) = WeightNormalizer::new(words, &self.config) else {
            page.replace(
                container_id,
                ContainerContent::Placeholder(self.config.placeholder.clone()),
            );
            tracing::info!(container = container_id, "no keywords, showing placeholder");
            self.enter(CloudState::Idle);
            return RenderOutcome::Placeholder;
        };

        let mut reason = None;
        if self.engine.is_primary() {
            self.enter(CloudState::PrimaryLayout);
            let options = self.spiral_options(words, &normalizer);
            let rng: &mut dyn RngCore = &mut self.rng;
            match self.engine.attempt_primary(
                self.config.width,
                self.config.height,
                Arc::clone(&self.measurer),
                &options,
                rng,
            ) {
                Ok(mut surface) => {
                    let opacity = self.config.opacity;
                    surface.set_style(SurfaceStyle {
                        opacity: opacity.to,
                        fade_from: Some(opacity.from),
                        transition_ms: opacity.transition_ms,
                        ..SurfaceStyle::default()
                    });
                    let listener = InteractionLayer::attach(
                        &surface,
                        self.config.emphasis_scale,
                        options.hover.clone(),
                        options.click.clone(),
                    );
                    let placed = surface.words().len();
                    page.replace(
                        container_id,
                        ContainerContent::Cloud(MountedCloud { surface, listener }),
                    );
                    tracing::info!(
                        container = container_id,
                        placer = self.engine.name(),
                        placed,
                        requested = words.len(),
                        "word cloud rendered"
                    );
                    self.enter(CloudState::Interactive);
                    return RenderOutcome::Primary { placed };
                }
                Err(err) => {
                    tracing::warn!(
                        container = container_id,
                        error = %err,
                        "spiral layout failed, falling back to grid"
                    );
                    reason = Some(err);
                }
            }
        }

        self.enter(CloudState::FallbackLayout);
        let surface = LayoutEngine::fallback(
            self.config.width,
            self.config.height,
            &self.config.font_family,
            words,
            &normalizer,
            &self.palette,
        );
        let placed = surface.words().len();
        page.replace(
            container_id,
            ContainerContent::Cloud(MountedCloud {
                surface,
                listener: None,
            }),
        );
        tracing::info!(container = container_id, placed, "word cloud rendered on grid");
        self.enter(CloudState::Idle);
        RenderOutcome::Fallback { placed, reason }
    }

    fn spiral_options(
        &self,
        words: &[KeywordRecord],
        normalizer: &WeightNormalizer,
    ) -> SpiralOptions {
        let sizes = *normalizer;
        let palette = self.palette.clone();
        SpiralOptions {
            list: words.to_vec(),
            grid_size: grid_size_for_width(self.config.width),
            weight_factor: Arc::new(move |weight: f64| sizes.font_size(weight)),
            font_family: self.config.font_family.clone(),
            color: Arc::new(move |rng: &mut dyn RngCore| palette.random(rng)),
            rotate_ratio: self.config.rotate_ratio,
            rotation_steps: self.config.rotation_steps,
            min_rotation: self.config.min_rotation,
            max_rotation: self.config.max_rotation,
            background_color: self.config.background_color.clone(),
            draw_out_of_bound: self.config.draw_out_of_bound,
            shrink_to_fit: self.config.shrink_to_fit,
            min_size: self.config.min_font_size / 4.0,
            hover: self.hover.clone(),
            click: self.click.clone(),
        }
    }
}

/// Resolves the words a surface shows, for callers that only need the placement data.
pub fn placed_words(page: &Page, container_id: &str) -> Vec<PlacedWord> {
    page.surface(container_id)
        .map(|s| s.words().to_vec())
        .unwrap_or_default()
}
