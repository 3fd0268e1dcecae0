use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;

/// Slopes closer than this are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 1e-6;

/// Image-space line `y = slope * x + intercept`
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f32,
    pub intercept: f32,
}

impl Line {
    #[inline]
    pub fn new(slope: f32, intercept: f32) -> Self {
        Self { slope, intercept }
    }

    /// Line with the given slope passing through `p`
    #[inline]
    pub fn through(p: na::Point2<f32>, slope: f32) -> Self {
        Self {
            slope,
            intercept: p.y - slope * p.x,
        }
    }

    #[inline(always)]
    pub fn y_at(&self, x: f32) -> f32 {
        self.slope * x + self.intercept
    }

    /// Signed vertical distance of `p` from the line, negative above it
    #[inline(always)]
    pub fn residual(&self, p: na::Point2<f32>) -> f32 {
        p.y - self.y_at(p.x)
    }

    #[inline]
    pub fn is_parallel(&self, slope: f32) -> bool {
        (self.slope - slope).abs() < PARALLEL_EPSILON
    }
}

/// Intersection of the line through `through` with slope `through_slope`
/// and the fixed line.
///
/// Solves
///
/// ```text
/// | 1  -through_slope | | y |   | through.y - through_slope * through.x |
/// | 1  -fixed.slope   | | x | = | fixed.intercept                       |
/// ```
///
/// The solution vector is ordered (row, column); the returned point is
/// already swapped back into (x, y).
pub fn intersect(
    through: na::Point2<f32>,
    through_slope: f32,
    fixed: &Line,
) -> Result<na::Point2<f32>, Error> {
    let degenerate = || Error::DegenerateGeometry {
        through_slope,
        fixed_slope: fixed.slope,
    };

    if fixed.is_parallel(through_slope) {
        return Err(degenerate());
    }

    let a = na::Matrix2::new(1.0, -through_slope, 1.0, -fixed.slope);
    let b = na::Vector2::new(through.y - through_slope * through.x, fixed.intercept);

    let yx = a.lu().solve(&b).ok_or_else(degenerate)?;
    if !(yx[0].is_finite() && yx[1].is_finite()) {
        return Err(degenerate());
    }

    Ok(na::Point2::new(yx[1], yx[0]))
}

#[inline]
pub fn distance(p1: &na::Point2<f32>, p2: &na::Point2<f32>) -> f32 {
    na::distance(p1, p2)
}
