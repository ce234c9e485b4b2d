//! Scatter plot coordinate mapping
//!
//! Maps normalized score pairs onto a fixed plotting canvas. The Y axis is
//! inverted so that higher scores plot higher on screen. No clamping is
//! applied anywhere: scores outside [0, 1] land outside the canvas.

use serde::{Deserialize, Serialize};

/// Plotting canvas: origin offset and extent, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotArea {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for PlotArea {
    fn default() -> Self {
        Self {
            origin_x: 50.0,
            origin_y: 20.0,
            width: 500.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PlotArea {
    /// Normalized (sx, sy) to pixel coordinates
    pub fn project(&self, sx: f64, sy: f64) -> PixelPoint {
        PixelPoint {
            x: self.origin_x + sx * self.width,
            y: self.origin_y + self.height - sy * self.height,
        }
    }

    /// Pixel coordinates back to normalized (sx, sy)
    ///
    /// A degenerate (zero-sized) axis maps to 0.0 on that axis.
    pub fn unproject(&self, point: PixelPoint) -> (f64, f64) {
        let sx = if self.width == 0.0 {
            0.0
        } else {
            (point.x - self.origin_x) / self.width
        };
        let sy = if self.height == 0.0 {
            0.0
        } else {
            (self.origin_y + self.height - point.y) / self.height
        };
        (sx, sy)
    }
}

/// Which side of a point the tooltip panel opens toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TooltipAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl TooltipAnchor {
    /// Pick the quadrant that keeps the panel on the canvas.
    ///
    /// Points in the right half open to the left, points in the top half
    /// open downward.
    pub fn for_score(sx: f64, sy: f64) -> Self {
        match (sx > 0.5, sy > 0.5) {
            (false, false) => Self::TopRight,
            (true, false) => Self::TopLeft,
            (false, true) => Self::BottomRight,
            (true, true) => Self::BottomLeft,
        }
    }
}

/// Index of the plotted point nearest to `pointer`
///
/// Returns `None` for an empty slice or when nothing lies within `radius`.
/// Ties go to the earliest point.
pub fn nearest_point(points: &[PixelPoint], pointer: PixelPoint, radius: Option<f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = ((p.x - pointer.x).powi(2) + (p.y - pointer.y).powi(2)).sqrt();
        if let Some(r) = radius {
            if d > r {
                continue;
            }
        }
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}
