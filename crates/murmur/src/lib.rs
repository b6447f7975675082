#![forbid(unsafe_code)]

//! `murmur` renders pre-computed chat-group analytics reports into static pages, with the
//! report's keyword list drawn as an interactive word cloud.
//!
//! # Features
//!
//! - `render`: word cloud layout and page rendering (`murmur::render`)
//! - `spiral`: the built-in spiral placer; without it every cloud uses the grid layout
//! - `raster`: PNG/JPG output via pure-Rust rasterization

pub use murmur_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use murmur_render::layout::{SpiralOptions, SpiralPlacement, probe};
    pub use murmur_render::svg::{placeholder_svg, surface_html, surface_svg};
    pub use murmur_render::{
        CloudState, DeterministicTextMeasurer, LayoutFailure, Page, PlacedWord, PointerEvent,
        PointerResponse, RenderOutcome, Surface, SurfaceKind, TextMeasurer, WORD_CLOUD_CONTAINER,
        WordCloud,
    };

    use murmur_core::{CloudConfig, Report, SiteConfig, ThemePreference};
    use std::sync::Arc;

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Report(#[from] murmur_core::Error),
        #[error(transparent)]
        Render(#[from] murmur_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// A page with the report's word cloud rendered into it.
    #[derive(Debug)]
    pub struct RenderedPage {
        pub page: Page,
        pub outcome: RenderOutcome,
    }

    impl RenderedPage {
        pub fn surface(&self) -> Option<&Surface> {
            self.page.surface(WORD_CLOUD_CONTAINER)
        }

        pub fn to_html(&self, theme: ThemePreference) -> String {
            self.page.to_html(theme)
        }
    }

    /// Bundles configuration, text measurer, placement capability and seed for rendering whole
    /// reports.
    ///
    /// Stays runtime-agnostic: rendering is CPU-bound and performs no I/O.
    #[derive(Clone)]
    pub struct ReportRenderer {
        pub config: CloudConfig,
        pub measurer: Arc<dyn TextMeasurer + Send + Sync>,
        pub capability: Option<Arc<dyn SpiralPlacement>>,
        pub seed: Option<u64>,
    }

    impl Default for ReportRenderer {
        fn default() -> Self {
            Self {
                config: CloudConfig::default(),
                measurer: Arc::new(DeterministicTextMeasurer::default()),
                capability: probe(),
                seed: None,
            }
        }
    }

    impl std::fmt::Debug for ReportRenderer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("ReportRenderer")
                .field("config", &self.config)
                .field("capability", &self.capability.as_ref().map(|c| c.name()))
                .field("seed", &self.seed)
                .finish_non_exhaustive()
        }
    }

    impl ReportRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Replaces the cloud configuration with the validated word cloud section of `site`.
        pub fn with_site_config(mut self, site: &SiteConfig) -> Result<Self> {
            self.config = site.cloud()?;
            Ok(self)
        }

        pub fn with_config(mut self, config: CloudConfig) -> Self {
            self.config = config;
            self
        }

        pub fn with_seed(mut self, seed: u64) -> Self {
            self.seed = Some(seed);
            self
        }

        pub fn with_capability(mut self, capability: Option<Arc<dyn SpiralPlacement>>) -> Self {
            self.capability = capability;
            self
        }

        /// Forces the grid layout.
        pub fn without_spiral(self) -> Self {
            self.with_capability(None)
        }

        pub fn with_measurer(mut self, measurer: Arc<dyn TextMeasurer + Send + Sync>) -> Self {
            self.measurer = measurer;
            self
        }

        pub fn word_cloud(&self) -> Result<WordCloud> {
            let cloud = WordCloud::new(self.config.clone(), self.capability.clone())?
                .with_measurer(Arc::clone(&self.measurer));
            Ok(match self.seed {
                Some(seed) => cloud.with_seed(seed),
                None => cloud,
            })
        }

        pub fn render_report(&self, report: &Report) -> Result<RenderedPage> {
            let mut page = Page::from_report(report);
            let mut cloud = self.word_cloud()?;
            let outcome = cloud.render(&mut page, WORD_CLOUD_CONTAINER, &report.keywords);
            tracing::debug!(?outcome, "report rendered");
            Ok(RenderedPage { page, outcome })
        }

        /// Parses a report payload and renders it. A payload that is not a JSON object is the
        /// only error a caller sees for report content.
        pub fn render_json(&self, payload: &str) -> Result<RenderedPage> {
            let report = Report::from_json_str(payload)?;
            self.render_report(&report)
        }

        pub fn render_html(&self, report: &Report, theme: ThemePreference) -> Result<String> {
            Ok(self.render_report(report)?.to_html(theme))
        }

        /// Standalone SVG of the word cloud; the placeholder text when there are no keywords.
        pub fn render_svg(&self, report: &Report) -> Result<String> {
            let rendered = self.render_report(report)?;
            Ok(match rendered.surface() {
                Some(surface) => surface_svg(surface),
                None => placeholder_svg(
                    self.config.width,
                    self.config.height,
                    &self.config.font_family,
                    &self.config.placeholder,
                ),
            })
        }

        #[cfg(feature = "raster")]
        pub fn render_png(
            &self,
            report: &Report,
            options: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_png_sync(self, report, options)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(
            &self,
            report: &Report,
            options: &raster::RasterOptions,
        ) -> raster::Result<Vec<u8>> {
            raster::render_jpeg_sync(self, report, options)
        }
    }
}
