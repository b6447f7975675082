//! Built-in spiral placer.
//!
//! Words are placed in input order. Each word walks an elliptical Archimedean spiral outward from
//! the surface center over a coarse occupancy grid and takes the first position where its rotated
//! footprint is free. Words that find no position are retried smaller (shrink-to-fit) or skipped.
//!
//! Occupancy only grows during a layout and the candidate offsets of a footprint depend on its
//! size alone, so a footprint that found no position once is never searched again.

use super::LayoutFailure;
use super::spiral::{SpiralOptions, SpiralPlacement};
use crate::surface::{PlacedWord, Position, Surface, rotated_extent};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use std::collections::HashSet;
use std::f64::consts::TAU;

const SHRINK_FACTOR: f64 = 0.75;

#[derive(Debug, Clone)]
pub struct ArchimedeanPlacer {
    /// Vertical squash of the spiral; below 1 favors wide layouts.
    pub ellipticity: f64,
    /// Visit the points of each spiral ring in random order.
    pub shuffle: bool,
    pub max_shrink_steps: u32,
}

impl Default for ArchimedeanPlacer {
    fn default() -> Self {
        Self {
            ellipticity: 0.65,
            shuffle: true,
            max_shrink_steps: 8,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OccupancyGrid {
    cols: i64,
    rows: i64,
    cells: Vec<bool>,
    free: usize,
}

impl OccupancyGrid {
    pub(crate) fn new(cols: i64, rows: i64) -> Self {
        let len = (cols * rows).max(0) as usize;
        Self {
            cols,
            rows,
            cells: vec![false; len],
            free: len,
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.cols || y >= self.rows {
            return None;
        }
        Some((y * self.cols + x) as usize)
    }

    pub(crate) fn free_cells(&self) -> usize {
        self.free
    }

    pub(crate) fn is_occupied(&self, x: i64, y: i64) -> bool {
        self.index(x, y).is_some_and(|i| self.cells[i])
    }

    pub(crate) fn can_fit(&self, gx: i64, gy: i64, w: i64, h: i64, out_of_bound: bool) -> bool {
        if !out_of_bound && (gx < 0 || gy < 0 || gx + w > self.cols || gy + h > self.rows) {
            return false;
        }
        for y in gy..gy + h {
            for x in gx..gx + w {
                if self.is_occupied(x, y) {
                    return false;
                }
            }
        }
        true
    }

    pub(crate) fn fill(&mut self, gx: i64, gy: i64, w: i64, h: i64) {
        for y in gy..gy + h {
            for x in gx..gx + w {
                if let Some(i) = self.index(x, y) {
                    if !self.cells[i] {
                        self.cells[i] = true;
                        self.free -= 1;
                    }
                }
            }
        }
    }
}

impl ArchimedeanPlacer {
    fn pick_rotation(&self, options: &SpiralOptions, rng: &mut dyn RngCore) -> f64 {
        let ratio = options.rotate_ratio.clamp(0.0, 1.0);
        if ratio == 0.0 || !rng.gen_bool(ratio) {
            return 0.0;
        }
        let range = options.max_rotation - options.min_rotation;
        match options.rotation_steps {
            0 => options.min_rotation + rng.r#gen::<f64>() * range,
            1 => options.min_rotation,
            steps => {
                let step = rng.gen_range(0..steps);
                options.min_rotation + f64::from(step) * range / f64::from(steps - 1)
            }
        }
    }

    /// Spiral sample points, one ring per radius step, innermost first.
    fn spiral_rings(&self, center: (f64, f64), max_radius: u32) -> Vec<Vec<(f64, f64)>> {
        let mut rings = vec![vec![center]];
        for r in 1..=max_radius {
            let steps = r * 8;
            let radius = f64::from(r);
            rings.push(
                (0..steps)
                    .map(|t| {
                        let theta = f64::from(t) / f64::from(steps) * TAU;
                        (
                            center.0 + radius * theta.cos(),
                            center.1 + radius * theta.sin() * self.ellipticity,
                        )
                    })
                    .collect(),
            );
        }
        rings
    }

    fn find_position(
        &self,
        grid: &OccupancyGrid,
        rings: &mut [Vec<(f64, f64)>],
        (w, h): (i64, i64),
        out_of_bound: bool,
        rng: &mut dyn RngCore,
    ) -> Option<(i64, i64)> {
        for ring in rings.iter_mut() {
            if self.shuffle && ring.len() > 1 {
                ring.shuffle(rng);
            }
            for &(px, py) in ring.iter() {
                let gx = (px - w as f64 / 2.0).floor() as i64;
                let gy = (py - h as f64 / 2.0).floor() as i64;
                if grid.can_fit(gx, gy, w, h, out_of_bound) {
                    return Some((gx, gy));
                }
            }
        }
        None
    }
}

impl SpiralPlacement for ArchimedeanPlacer {
    fn name(&self) -> &str {
        "archimedean"
    }

    fn place(
        &self,
        surface: &mut Surface,
        options: &SpiralOptions,
        rng: &mut dyn RngCore,
    ) -> Result<(), LayoutFailure> {
        let cell = options.grid_size.max(1);
        let cols = i64::from(surface.width() / cell);
        let rows = i64::from(surface.height() / cell);
        if cols == 0 || rows == 0 {
            return Err(LayoutFailure::InvalidSurface {
                width: surface.width(),
                height: surface.height(),
            });
        }
        surface.fill_background(&options.background_color);

        let mut grid = OccupancyGrid::new(cols, rows);
        let center = (cols as f64 / 2.0, rows as f64 / 2.0);
        let max_radius = ((cols * cols + rows * rows) as f64).sqrt().ceil() as u32;
        let mut rings = self.spiral_rings(center, max_radius);
        let mut exhausted: HashSet<(i64, i64)> = HashSet::new();
        let cell = f64::from(cell);

        for record in &options.list {
            let mut size = (options.weight_factor)(record.weight);
            if !(size.is_finite() && size > 0.0) {
                return Err(LayoutFailure::NonFiniteSize {
                    word: record.word.clone(),
                    size,
                });
            }
            let rotation = self.pick_rotation(options, rng);
            let color = (options.color)(rng);

            let mut placed = None;
            for _ in 0..=self.max_shrink_steps {
                let metrics = surface.measure(&record.word, size);
                let (bw, bh) = rotated_extent(metrics.width, metrics.height, rotation);
                let w = (bw / cell).ceil().max(1.0) as i64;
                let h = (bh / cell).ceil().max(1.0) as i64;
                let hopeless = exhausted.contains(&(w, h))
                    || (!options.draw_out_of_bound && grid.free_cells() < (w * h) as usize);
                let found = if hopeless {
                    None
                } else {
                    self.find_position(
                        &grid,
                        &mut rings,
                        (w, h),
                        options.draw_out_of_bound,
                        rng,
                    )
                };
                if found.is_none() && !hopeless {
                    exhausted.insert((w, h));
                }
                if let Some((gx, gy)) = found {
                    grid.fill(gx, gy, w, h);
                    placed = Some(PlacedWord {
                        word: record.word.clone(),
                        weight: record.weight,
                        font_size: size,
                        color_index: color.index,
                        color: color.color.clone(),
                        position: Position::Pixels {
                            x: (gx as f64 + w as f64 / 2.0) * cell,
                            y: (gy as f64 + h as f64 / 2.0) * cell,
                        },
                        rotation,
                        width: metrics.width,
                        height: metrics.height,
                    });
                    break;
                }
                if !options.shrink_to_fit {
                    break;
                }
                size *= SHRINK_FACTOR;
                if size < options.min_size {
                    break;
                }
            }

            match placed {
                Some(word) => surface.paint_word(word),
                None => tracing::debug!(word = %record.word, "no free position, word not drawn"),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{Palette, PaletteColor};
    use crate::text::DeterministicTextMeasurer;
    use murmur_core::KeywordRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::Arc;

    fn options(words: Vec<KeywordRecord>, rotate_ratio: f64) -> SpiralOptions {
        let palette = Palette::new(["#112233", "#445566"].map(String::from)).unwrap();
        SpiralOptions {
            list: words,
            grid_size: 8,
            weight_factor: Arc::new(|w: f64| 10.0 + w * 2.0),
            font_family: "sans-serif".to_string(),
            color: Arc::new(move |rng: &mut dyn RngCore| palette.random(rng)),
            rotate_ratio,
            rotation_steps: 2,
            min_rotation: -std::f64::consts::FRAC_PI_2,
            max_rotation: std::f64::consts::FRAC_PI_2,
            background_color: "transparent".to_string(),
            draw_out_of_bound: false,
            shrink_to_fit: true,
            min_size: 4.0,
            hover: None,
            click: None,
        }
    }

    fn surface(w: u32, h: u32) -> Surface {
        Surface::canvas(w, h, "sans-serif", Arc::new(DeterministicTextMeasurer::default()))
            .unwrap()
    }

    fn words(n: usize) -> Vec<KeywordRecord> {
        (0..n)
            .map(|i| KeywordRecord::new(format!("word{i}"), (n - i) as f64))
            .collect()
    }

    fn pixel_rect(w: &PlacedWord) -> (f64, f64, f64, f64) {
        let Position::Pixels { x, y } = w.position else {
            panic!("spiral words use pixel positions");
        };
        let (bw, bh) = w.bounding_size();
        (x - bw / 2.0, y - bh / 2.0, x + bw / 2.0, y + bh / 2.0)
    }

    #[test]
    fn first_word_lands_near_the_center() {
        let mut s = surface(400, 200);
        let mut rng = StdRng::seed_from_u64(1);
        ArchimedeanPlacer::default()
            .place(&mut s, &options(words(1), 0.0), &mut rng)
            .unwrap();
        let placed = &s.words()[0];
        let Position::Pixels { x, y } = placed.position else {
            unreachable!()
        };
        assert!((x - 200.0).abs() <= 16.0, "x = {x}");
        assert!((y - 100.0).abs() <= 16.0, "y = {y}");
        assert_eq!(placed.rotation, 0.0);
    }

    #[test]
    fn words_stay_inside_the_surface_and_do_not_overlap() {
        let mut s = surface(480, 320);
        let mut rng = StdRng::seed_from_u64(42);
        ArchimedeanPlacer::default()
            .place(&mut s, &options(words(24), 0.3), &mut rng)
            .unwrap();
        assert!(!s.words().is_empty());

        let rects: Vec<_> = s.words().iter().map(pixel_rect).collect();
        for (i, &(x0, y0, x1, y1)) in rects.iter().enumerate() {
            assert!(x0 >= -1e-6 && y0 >= -1e-6, "word {i} leaves the surface");
            assert!(x1 <= 480.0 + 1e-6 && y1 <= 320.0 + 1e-6, "word {i} leaves the surface");
            for &(a0, b0, a1, b1) in &rects[i + 1..] {
                let overlap_x = x0.max(a0) < x1.min(a1) - 1e-6;
                let overlap_y = y0.max(b0) < y1.min(b1) - 1e-6;
                assert!(!(overlap_x && overlap_y), "word {i} overlaps another word");
            }
        }
    }

    #[test]
    fn rotations_come_from_the_fixed_steps() {
        let mut s = surface(800, 600);
        let mut rng = StdRng::seed_from_u64(9);
        ArchimedeanPlacer::default()
            .place(&mut s, &options(words(30), 1.0), &mut rng)
            .unwrap();
        for w in s.words() {
            assert!(
                (w.rotation.abs() - std::f64::consts::FRAC_PI_2).abs() < 1e-9,
                "rotation {}",
                w.rotation
            );
        }
    }

    #[test]
    fn oversized_words_are_shrunk_to_fit() {
        let mut s = surface(120, 60);
        let mut rng = StdRng::seed_from_u64(3);
        let mut opts = options(vec![KeywordRecord::new("enormous", 1.0)], 0.0);
        opts.weight_factor = Arc::new(|_: f64| 90.0);
        ArchimedeanPlacer::default()
            .place(&mut s, &opts, &mut rng)
            .unwrap();
        assert_eq!(s.words().len(), 1);
        assert!(s.words()[0].font_size < 90.0);
    }

    #[test]
    fn oversized_words_are_suppressed_without_shrink() {
        let mut s = surface(120, 60);
        let mut rng = StdRng::seed_from_u64(3);
        let mut opts = options(vec![KeywordRecord::new("enormous", 1.0)], 0.0);
        opts.weight_factor = Arc::new(|_: f64| 90.0);
        opts.shrink_to_fit = false;
        ArchimedeanPlacer::default()
            .place(&mut s, &opts, &mut rng)
            .unwrap();
        assert!(s.words().is_empty());
        assert!(s.alpha_channel().unwrap().iter().all(|a| *a == 0));
    }

    #[test]
    fn non_finite_sizes_fail_the_layout() {
        let mut s = surface(200, 100);
        let mut rng = StdRng::seed_from_u64(0);
        let mut opts = options(words(2), 0.0);
        opts.weight_factor = Arc::new(|_: f64| f64::NAN);
        let err = ArchimedeanPlacer::default()
            .place(&mut s, &opts, &mut rng)
            .unwrap_err();
        assert!(matches!(err, LayoutFailure::NonFiniteSize { .. }));
    }

    #[test]
    fn surface_smaller_than_one_cell_fails() {
        let mut s = surface(4, 4);
        let mut rng = StdRng::seed_from_u64(0);
        let err = ArchimedeanPlacer::default()
            .place(&mut s, &options(words(1), 0.0), &mut rng)
            .unwrap_err();
        assert!(matches!(err, LayoutFailure::InvalidSurface { .. }));
    }

    #[test]
    fn colors_come_from_the_color_fn() {
        let mut s = surface(400, 300);
        let mut rng = StdRng::seed_from_u64(5);
        let mut opts = options(words(6), 0.0);
        opts.color = Arc::new(|_: &mut dyn RngCore| PaletteColor {
            index: 1,
            color: "#abcdef".to_string(),
        });
        ArchimedeanPlacer::default()
            .place(&mut s, &opts, &mut rng)
            .unwrap();
        assert!(s.words().iter().all(|w| w.color == "#abcdef" && w.color_index == 1));
    }

    #[test]
    fn occupancy_grid_respects_bounds() {
        let mut grid = OccupancyGrid::new(4, 3);
        assert!(grid.can_fit(0, 0, 4, 3, false));
        assert!(!grid.can_fit(1, 0, 4, 3, false));
        assert!(grid.can_fit(1, 0, 4, 3, true));
        grid.fill(1, 1, 2, 1);
        assert!(grid.is_occupied(2, 1));
        assert!(!grid.can_fit(0, 0, 2, 2, false));
        assert!(grid.can_fit(0, 2, 4, 1, false));
    }

    #[test]
    fn occupancy_grid_counts_free_cells() {
        let mut grid = OccupancyGrid::new(4, 3);
        assert_eq!(grid.free_cells(), 12);
        grid.fill(0, 0, 2, 2);
        assert_eq!(grid.free_cells(), 8);
        // Overlapping and out-of-grid cells are not counted twice.
        grid.fill(1, 1, 5, 5);
        assert_eq!(grid.free_cells(), 3);
    }

    #[test]
    fn crowded_input_places_what_fits_without_overlap() {
        let mut s = surface(800, 400);
        let mut rng = StdRng::seed_from_u64(400);
        let mut opts = options(words(400), 0.3);
        opts.grid_size = 13;
        opts.min_size = 5.0;
        opts.weight_factor = Arc::new(|w: f64| 20.0 + w / 400.0 * 60.0);
        ArchimedeanPlacer::default()
            .place(&mut s, &opts, &mut rng)
            .unwrap();

        let placed = s.words();
        assert!(!placed.is_empty());
        // Smaller footprints keep landing after larger ones have run out of room.
        assert!(placed.iter().any(|w| w.font_size < 20.0));

        let rects: Vec<_> = placed.iter().map(pixel_rect).collect();
        for (i, &(x0, y0, x1, y1)) in rects.iter().enumerate() {
            assert!(x0 >= -1e-6 && y0 >= -1e-6 && x1 <= 800.0 + 1e-6 && y1 <= 400.0 + 1e-6);
            for &(a0, b0, a1, b1) in &rects[i + 1..] {
                let overlap_x = x0.max(a0) < x1.min(a1) - 1e-6;
                let overlap_y = y0.max(b0) < y1.min(b1) - 1e-6;
                assert!(!(overlap_x && overlap_y), "word {i} overlaps another word");
            }
        }
    }
}
