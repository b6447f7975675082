use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Horizontal advance of every char in `text`, in order.
    ///
    /// The default splits the measured width evenly, which is enough for measurers that only know
    /// whole-string extents.
    fn advances(&self, text: &str, style: &TextStyle) -> Vec<f64> {
        let count = text.chars().count();
        if count == 0 {
            return Vec::new();
        }
        let width = self.measure(text, style).width;
        vec![width / count as f64; count]
    }
}

/// Font-free measurer: every display column is a fixed fraction of the font size.
///
/// Wide (CJK) characters occupy two columns, so a Chinese keyword measures roughly one em per
/// glyph while Latin text comes out near the usual 0.55em average.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub column_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    fn column_width_factor(&self) -> f64 {
        if self.column_width_factor == 0.0 {
            0.55
        } else {
            self.column_width_factor
        }
    }

    fn line_height_factor(&self) -> f64 {
        if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        }
    }

    fn char_advance(&self, ch: char, font_size: f64) -> f64 {
        let columns = ch.width().unwrap_or(0).max(1) as f64;
        columns * font_size * self.column_width_factor()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let font_size = style.font_size.max(1.0);
        let width = text
            .chars()
            .map(|ch| self.char_advance(ch, font_size))
            .sum::<f64>();
        TextMetrics {
            width,
            height: font_size * self.line_height_factor(),
        }
    }

    fn advances(&self, text: &str, style: &TextStyle) -> Vec<f64> {
        let font_size = style.font_size.max(1.0);
        text.chars()
            .map(|ch| self.char_advance(ch, font_size))
            .collect()
    }
}
