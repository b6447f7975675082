//! The drawing surface owned by one render call.

use crate::layout::LayoutFailure;
use crate::text::{TextMeasurer, TextMetrics, TextStyle};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tiny_skia::{Color, Paint, Pixmap, Rect, Transform};

/// Share of a glyph's advance that is inked, horizontally and vertically.
const GLYPH_INK_X: f64 = 0.84;
const GLYPH_INK_Y: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "unit", rename_all = "lowercase")]
pub enum Position {
    /// Word center in surface pixels.
    Pixels { x: f64, y: f64 },
    /// Top-left offset as a percentage of the surface size.
    Percent { x: f64, y: f64 },
}

/// Layout result for one keyword. Lives only as long as the surface it was placed on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedWord {
    pub word: String,
    pub weight: f64,
    pub font_size: f64,
    pub color_index: usize,
    pub color: String,
    pub position: Position,
    /// Radians, clockwise.
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedWord {
    /// Axis-aligned size of the rotated word box.
    pub fn bounding_size(&self) -> (f64, f64) {
        rotated_extent(self.width, self.height, self.rotation)
    }

    /// Whether the surface pixel `(x, y)` lies inside the rotated word box.
    ///
    /// Always false for percent-positioned words.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let Position::Pixels { x: cx, y: cy } = self.position else {
            return false;
        };
        let (sin, cos) = (-self.rotation).sin_cos();
        let (dx, dy) = (x - cx, y - cy);
        let lx = dx * cos - dy * sin;
        let ly = dx * sin + dy * cos;
        lx.abs() <= self.width / 2.0 && ly.abs() <= self.height / 2.0
    }
}

pub(crate) fn rotated_extent(width: f64, height: f64, rotation: f64) -> (f64, f64) {
    let (sin, cos) = rotation.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    (width * cos + height * sin, width * sin + height * cos)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// Pixel buffer painted by the spiral placer.
    Canvas,
    /// Words positioned by percentage offsets (grid fallback); no pixel buffer.
    Positioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Presentation state applied to the whole surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub cursor: Cursor,
    pub scale: f64,
    pub opacity: f64,
    /// Opacity the surface fades in from, if it fades in at all.
    pub fade_from: Option<f64>,
    pub transition_ms: u32,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            cursor: Cursor::Default,
            scale: 1.0,
            opacity: 1.0,
            fade_from: None,
            transition_ms: 0,
        }
    }
}

pub struct Surface {
    kind: SurfaceKind,
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
    words: Vec<PlacedWord>,
    style: SurfaceStyle,
    font_family: String,
    measurer: Option<Arc<dyn TextMeasurer + Send + Sync>>,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("kind", &self.kind)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("words", &self.words.len())
            .field("style", &self.style)
            .finish_non_exhaustive()
    }
}

impl Surface {
    /// A fresh, fully transparent pixel surface.
    pub fn canvas(
        width: u32,
        height: u32,
        font_family: impl Into<String>,
        measurer: Arc<dyn TextMeasurer + Send + Sync>,
    ) -> Result<Self, LayoutFailure> {
        let pixmap =
            Pixmap::new(width, height).ok_or(LayoutFailure::InvalidSurface { width, height })?;
        Ok(Self {
            kind: SurfaceKind::Canvas,
            width,
            height,
            pixmap: Some(pixmap),
            words: Vec::new(),
            style: SurfaceStyle::default(),
            font_family: font_family.into(),
            measurer: Some(measurer),
        })
    }

    pub fn positioned(
        width: u32,
        height: u32,
        font_family: impl Into<String>,
        words: Vec<PlacedWord>,
    ) -> Self {
        Self {
            kind: SurfaceKind::Positioned,
            width,
            height,
            pixmap: None,
            words,
            style: SurfaceStyle::default(),
            font_family: font_family.into(),
            measurer: None,
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    pub fn pixmap(&self) -> Option<&Pixmap> {
        self.pixmap.as_ref()
    }

    pub fn style(&self) -> SurfaceStyle {
        self.style
    }

    pub fn set_style(&mut self, style: SurfaceStyle) {
        self.style = style;
    }

    pub fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        match &self.measurer {
            Some(m) => m.measure(text, &self.text_style(font_size)),
            None => TextMetrics {
                width: 0.0,
                height: 0.0,
            },
        }
    }

    fn text_style(&self, font_size: f64) -> TextStyle {
        TextStyle {
            font_family: Some(self.font_family.clone()),
            font_size,
        }
    }

    /// Fills the pixel buffer with `css`; transparent or unparseable colors leave it untouched.
    pub fn fill_background(&mut self, css: &str) {
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        match parse_color(css) {
            Some(color) if color.alpha() > 0.0 => pixmap.fill(color),
            Some(_) => {}
            None => tracing::warn!(color = css, "unrecognized background color, ignoring"),
        }
    }

    /// Rasterizes `word` at its pixel position and records it.
    ///
    /// Glyphs are painted as inked cells inside each character's advance, so the alpha channel
    /// has gaps between letters and around the word box like real text does.
    pub fn paint_word(&mut self, word: PlacedWord) {
        let Position::Pixels { x: cx, y: cy } = word.position else {
            self.words.push(word);
            return;
        };
        let advances = match &self.measurer {
            Some(m) => m.advances(&word.word, &self.text_style(word.font_size)),
            None => Vec::new(),
        };
        if let Some(pixmap) = self.pixmap.as_mut() {
            let mut paint = Paint::default();
            paint.set_color(parse_color(&word.color).unwrap_or(Color::BLACK));
            paint.anti_alias = true;

            let transform = Transform::from_rotate(word.rotation.to_degrees() as f32)
                .post_translate(cx as f32, cy as f32);
            let ink_h = word.height * GLYPH_INK_Y;
            let top = -ink_h / 2.0;
            let mut pen = -word.width / 2.0;
            for (ch, advance) in word.word.chars().zip(advances) {
                if !ch.is_whitespace() {
                    let ink_w = advance * GLYPH_INK_X;
                    let left = pen + (advance - ink_w) / 2.0;
                    if let Some(rect) =
                        Rect::from_xywh(left as f32, top as f32, ink_w as f32, ink_h as f32)
                    {
                        pixmap.fill_rect(rect, &paint, transform, None);
                    }
                }
                pen += advance;
            }
        }
        self.words.push(word);
    }

    /// Copy of the alpha channel, row-major.
    pub fn alpha_channel(&self) -> Option<Vec<u8>> {
        let pixmap = self.pixmap.as_ref()?;
        Some(pixmap.data().chunks_exact(4).map(|px| px[3]).collect())
    }

    /// Pretty-printed JSON dump of the layout: surface kind, size and placed words.
    pub fn layout_json(&self) -> crate::Result<String> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Dump<'a> {
            kind: SurfaceKind,
            width: u32,
            height: u32,
            font_family: &'a str,
            words: &'a [PlacedWord],
        }

        Ok(serde_json::to_string_pretty(&Dump {
            kind: self.kind,
            width: self.width,
            height: self.height,
            font_family: &self.font_family,
            words: &self.words,
        })?)
    }
}

/// Parses the CSS color forms the palette and config use: `transparent`, `white`, `black` and
/// `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`.
pub fn parse_color(text: &str) -> Option<Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    match bytes.len() {
        3 => Some(Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            255,
        )),
        4 => Some(Color::from_rgba8(
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            hex1(bytes[3])?,
        )),
        6 => Some(Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        )),
        8 => Some(Color::from_rgba8(
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        )),
        _ => None,
    }
}
