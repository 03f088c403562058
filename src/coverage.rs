use glam::Vec2;
use serde::Serialize;

use crate::config;
use crate::obstacle::{self, Obstacle};

/// How coverage percentages are normalized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    /// Visited cells over the whole grid, obstacle cells included in the
    /// denominator. Matches the historical figures; never reaches 100% in
    /// environments with obstacles.
    WholeArea,
    /// Visited cells over free (non-obstacle) cells only.
    FreeArea,
}

/// Dispersion statistics over the free-cell visit-frequency distribution,
/// quantifying how uniformly the area was covered.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct UniformityStats {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    /// Coefficient of variation: std_dev / mean.
    pub coefficient_of_variation: f64,
}

/// Per-cell visit frequency table at one cell per pixel. Cells interior to an
/// obstacle are masked out and never counted.
pub struct CoverageGrid {
    width: usize,
    height: usize,
    frequency: Vec<u32>,
    free: Vec<bool>,
    free_cells: usize,
    visited: usize,
}

impl CoverageGrid {
    pub fn new(width: usize, height: usize, obstacles: &[Obstacle]) -> Self {
        let mut free = vec![true; width * height];
        let mut free_cells = width * height;
        if !obstacles.is_empty() {
            for y in 0..height {
                for x in 0..width {
                    let point = Vec2::new(x as f32, y as f32);
                    if obstacle::any_contains(obstacles, point) {
                        free[y * width + x] = false;
                        free_cells -= 1;
                    }
                }
            }
        }
        Self {
            width,
            height,
            frequency: vec![0; width * height],
            free,
            free_cells,
            visited: 0,
        }
    }

    /// Rasterize one agent footprint: a disk of `COVERAGE_RADIUS` cells
    /// centered on the position, skipping cells outside the grid or inside an
    /// obstacle.
    pub fn stamp(&mut self, position: Vec2) {
        let cx = position.x as i32;
        let cy = position.y as i32;
        let r = config::COVERAGE_RADIUS;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                let px = cx + dx;
                let py = cy + dy;
                if px < 0 || py < 0 || px >= self.width as i32 || py >= self.height as i32 {
                    continue;
                }
                let idx = py as usize * self.width + px as usize;
                if !self.free[idx] {
                    continue;
                }
                if self.frequency[idx] == 0 {
                    self.visited += 1;
                }
                self.frequency[idx] += 1;
            }
        }
    }

    /// Number of distinct cells visited at least once.
    pub fn visited_cells(&self) -> usize {
        self.visited
    }

    pub fn free_cells(&self) -> usize {
        self.free_cells
    }

    /// Cumulative percent coverage under the chosen normalization.
    pub fn coverage_percent(&self, normalization: Normalization) -> f32 {
        let denominator = match normalization {
            Normalization::WholeArea => self.width * self.height,
            Normalization::FreeArea => self.free_cells,
        };
        if denominator == 0 {
            return 0.0;
        }
        self.visited as f32 / denominator as f32 * 100.0
    }

    /// Mean, sample variance, standard deviation and coefficient of variation
    /// over the visit frequencies of all free cells (unvisited cells count as
    /// zero). `None` when the layout has no free cells.
    pub fn uniformity(&self) -> Option<UniformityStats> {
        if self.free_cells == 0 {
            return None;
        }
        let n = self.free_cells as f64;
        let mut sum = 0.0f64;
        for (idx, &freq) in self.frequency.iter().enumerate() {
            if self.free[idx] {
                sum += freq as f64;
            }
        }
        let mean = sum / n;

        let mut sq_dev = 0.0f64;
        for (idx, &freq) in self.frequency.iter().enumerate() {
            if self.free[idx] {
                let d = freq as f64 - mean;
                sq_dev += d * d;
            }
        }
        // Sample variance; a single free cell has undefined spread
        let variance = if self.free_cells > 1 {
            sq_dev / (n - 1.0)
        } else {
            0.0
        };
        let std_dev = variance.sqrt();
        Some(UniformityStats {
            mean,
            variance,
            std_dev,
            coefficient_of_variation: std_dev / (mean + config::EPS as f64),
        })
    }
}
