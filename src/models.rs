use imageproc::point::Point;
use serde::Serialize;

/// Outer boundary of one connected foreground region
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<u32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<u32>>) -> Self {
        Self { points }
    }

    /// Area enclosed by the boundary polygon (shoelace formula).
    ///
    /// Regions that are a single pixel or a single pixel wide enclose no area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let twice_area: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();

        twice_area.abs() as f64 / 2.0
    }

    /// A pixel known to belong to the region this contour bounds
    pub fn seed(&self) -> Option<(u32, u32)> {
        self.points.first().map(|p| (p.x, p.y))
    }

    pub fn bounding_box(&self) -> Option<(u32, u32, u32, u32)> {
        let first = self.points.first()?;
        let init = (first.x, first.y, first.x, first.y);
        Some(self.points.iter().fold(init, |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        }))
    }
}

/// Affected surface of one fastener, in percent of its visible pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Share covered by any corrosion class, overlapping pixels counted once
    pub total_affected: f64,
    pub red: f64,
    pub black: f64,
    pub white: f64,
    /// Pixels in the isolated object, the denominator of every percentage
    pub object_pixels: u64,
}
