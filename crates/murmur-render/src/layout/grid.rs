//! Deterministic grid fallback.
//!
//! Word `i` of `n` goes to cell `(i div g, i mod g)` of a `g x g` grid with `g = ceil(sqrt(n))`.
//! Cells map to percentage offsets with a 10% margin on every side, so no two words share a cell
//! and the layout needs nothing beyond the keyword list itself.

use crate::palette::Palette;
use crate::surface::{PlacedWord, Position};
use crate::weight::WeightNormalizer;
use murmur_core::KeywordRecord;

const MARGIN_PCT: f64 = 10.0;
const SPAN_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// Side length of the square grid for `count` words.
pub fn grid_side(count: usize) -> usize {
    let mut side = (count as f64).sqrt().ceil() as usize;
    // Guard against float rounding on perfect squares.
    while side * side < count {
        side += 1;
    }
    while side > 1 && (side - 1) * (side - 1) >= count {
        side -= 1;
    }
    side.max(1)
}

pub fn cell_for(index: usize, side: usize) -> GridCell {
    GridCell {
        row: index / side,
        col: index % side,
    }
}

/// Top-left offset of `cell` in percent of the surface.
pub fn cell_offset_pct(cell: GridCell, side: usize) -> (f64, f64) {
    let side = side.max(1) as f64;
    (
        cell.col as f64 / side * SPAN_PCT + MARGIN_PCT,
        cell.row as f64 / side * SPAN_PCT + MARGIN_PCT,
    )
}

/// Places every word; infallible for any input, empty input gives no words.
pub fn layout_grid(
    words: &[KeywordRecord],
    normalizer: &WeightNormalizer,
    palette: &Palette,
) -> Vec<PlacedWord> {
    let side = grid_side(words.len());
    words
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let (x, y) = cell_offset_pct(cell_for(i, side), side);
            let color = palette.cyclic(i);
            PlacedWord {
                word: record.word.clone(),
                weight: record.weight,
                font_size: normalizer.font_size(record.weight),
                color_index: color.index,
                color: color.color,
                position: Position::Percent { x, y },
                rotation: 0.0,
                width: 0.0,
                height: 0.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use murmur_core::CloudConfig;
    use std::collections::HashSet;

    fn keywords(n: usize) -> Vec<KeywordRecord> {
        (0..n)
            .map(|i| KeywordRecord::new(format!("w{i}"), (n - i) as f64))
            .collect()
    }

    fn palette() -> Palette {
        Palette::new(CloudConfig::default().palette).unwrap()
    }

    #[test]
    fn grid_side_is_ceil_sqrt() {
        for (n, side) in [(1, 1), (2, 2), (4, 2), (5, 3), (9, 3), (16, 4), (17, 5)] {
            assert_eq!(grid_side(n), side, "n = {n}");
        }
        assert_eq!(grid_side(0), 1);
    }

    #[test]
    fn words_occupy_distinct_cells() {
        for n in [1usize, 2, 5, 16, 17] {
            let side = grid_side(n);
            let cells: HashSet<(usize, usize)> = (0..n)
                .map(|i| {
                    let c = cell_for(i, side);
                    assert!(c.row < side && c.col < side);
                    (c.row, c.col)
                })
                .collect();
            assert_eq!(cells.len(), n, "n = {n}");
            assert!(n <= side * side);

            let input = keywords(n);
            let normalizer = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
            let placed = layout_grid(&input, &normalizer, &palette());
            let offsets: HashSet<(u64, u64)> = placed
                .iter()
                .map(|w| match w.position {
                    Position::Percent { x, y } => (x.to_bits(), y.to_bits()),
                    Position::Pixels { .. } => panic!("grid words use percent offsets"),
                })
                .collect();
            assert_eq!(offsets.len(), n, "n = {n}");
        }
    }

    #[test]
    fn offsets_stay_inside_the_margins() {
        let input = keywords(17);
        let normalizer = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
        for w in layout_grid(&input, &normalizer, &palette()) {
            let Position::Percent { x, y } = w.position else {
                unreachable!()
            };
            assert!((10.0..90.0).contains(&x), "x = {x}");
            assert!((10.0..90.0).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn single_word_lands_at_the_margin_corner() {
        let input = keywords(1);
        let normalizer = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
        let placed = layout_grid(&input, &normalizer, &palette());
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].position, Position::Percent { x: 10.0, y: 10.0 });
        assert!(placed[0].font_size.is_finite());
        assert_eq!(placed[0].font_size, 80.0);
    }

    #[test]
    fn colors_cycle_by_position() {
        let input = keywords(12);
        let normalizer = WeightNormalizer::new(&input, &CloudConfig::default()).unwrap();
        let palette = palette();
        let placed = layout_grid(&input, &normalizer, &palette);
        for (i, w) in placed.iter().enumerate() {
            assert_eq!(w.color_index, i % palette.len());
            assert_eq!(w.color, palette.colors()[i % palette.len()]);
        }
    }

    #[test]
    fn two_words_fill_the_first_row() {
        assert_eq!(cell_offset_pct(cell_for(0, 2), 2), (10.0, 10.0));
        assert_eq!(cell_offset_pct(cell_for(1, 2), 2), (50.0, 10.0));
    }
}
