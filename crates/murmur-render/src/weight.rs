//! Weight normalization: keyword weight to `[0, 1]` to font size.

use murmur_core::{CloudConfig, KeywordExtent, KeywordRecord};

/// Maps producer weights onto the configured font size range.
///
/// The extent comes from the ends of the producer-ordered sequence (see [`KeywordExtent`]).
/// When every weight is equal the normalized value is `1`, so a flat keyword set renders at the
/// maximum size instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightNormalizer {
    extent: KeywordExtent,
    min_font_size: f64,
    max_font_size: f64,
}

impl WeightNormalizer {
    /// `None` for an empty sequence.
    pub fn new(words: &[KeywordRecord], config: &CloudConfig) -> Option<Self> {
        let extent = KeywordExtent::from_ordered(words)?;
        Some(Self::from_extent(
            extent,
            config.min_font_size,
            config.max_font_size,
        ))
    }

    pub fn from_extent(extent: KeywordExtent, min_font_size: f64, max_font_size: f64) -> Self {
        Self {
            extent,
            min_font_size,
            max_font_size,
        }
    }

    pub fn extent(&self) -> KeywordExtent {
        self.extent
    }

    pub fn normalize(&self, weight: f64) -> f64 {
        if self.extent.is_degenerate() {
            return 1.0;
        }
        let t = (weight - self.extent.min) / (self.extent.max - self.extent.min);
        // Weights outside the ends (producer ordering violated) stay in range.
        if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 }
    }

    pub fn font_size(&self, weight: f64) -> f64 {
        self.min_font_size + self.normalize(weight) * (self.max_font_size - self.min_font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(pairs: &[(&str, f64)]) -> Vec<KeywordRecord> {
        pairs
            .iter()
            .map(|(w, v)| KeywordRecord::new(*w, *v))
            .collect()
    }

    #[test]
    fn normalizes_between_last_and_first_weight() {
        let input = words(&[("A", 10.0), ("B", 10.0), ("C", 1.0)]);
        let n = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
        assert_eq!(n.extent(), KeywordExtent { max: 10.0, min: 1.0 });
        assert!((n.normalize(10.0) - 1.0).abs() < 1e-12);
        assert_eq!(n.normalize(1.0), 0.0);
        assert_eq!(n.font_size(10.0), 80.0);
        assert_eq!(n.font_size(1.0), 20.0);
        assert_eq!(n.font_size(5.5), 50.0);
    }

    #[test]
    fn equal_weights_render_at_maximum() {
        let input = words(&[("a", 5.0), ("b", 5.0), ("c", 5.0)]);
        let n = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
        for w in &input {
            assert_eq!(n.normalize(w.weight), 1.0);
            assert_eq!(n.font_size(w.weight), 80.0);
        }
    }

    #[test]
    fn single_word_has_no_division_error() {
        let input = words(&[("solo", 3.0)]);
        let n = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
        assert_eq!(n.normalize(3.0), 1.0);
        assert!(n.font_size(3.0).is_finite());
    }

    #[test]
    fn empty_sequence_has_no_normalizer() {
        assert!(WeightNormalizer::new(&[], &CloudConfig::default()).is_none());
    }

    #[test]
    fn results_stay_in_range_for_any_weight() {
        let input = words(&[("hi", 100.0), ("mid", 40.0), ("lo", 2.0)]);
        let config = CloudConfig {
            min_font_size: 12.0,
            max_font_size: 48.0,
            ..CloudConfig::default()
        };
        let n = WeightNormalizer::new(&input, &config).unwrap();
        for w in [-5.0, 0.0, 2.0, 17.0, 40.0, 99.9, 100.0, 250.0, f64::NAN] {
            let t = n.normalize(w);
            assert!((0.0..=1.0).contains(&t), "normalize({w}) = {t}");
            let size = n.font_size(w);
            assert!((12.0..=48.0).contains(&size), "font_size({w}) = {size}");
        }
    }
}
