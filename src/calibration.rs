use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::error::Error;
use crate::geometry::{self, Line};

/// Pair of calibration markers painted (or measured) across the road.
///
/// The markers are not parallel to the direction of travel, so the trigger
/// position is resolved per object from where it currently sits in the image.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub upper: Line,
    pub lower: Line,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            upper: Line::new(0.44, 7.7),
            lower: Line::new(0.55, 59.0),
        }
    }
}

impl Calibration {
    pub fn new(upper: Line, lower: Line) -> Self {
        Self { upper, lower }
    }

    /// Where the travel line through `anchor` meets the upper and lower markers
    pub fn gate_points(
        &self,
        road_slope: f32,
        anchor: na::Point2<f32>,
    ) -> Result<(na::Point2<f32>, na::Point2<f32>), Error> {
        let upper = geometry::intersect(anchor, road_slope, &self.upper)?;
        let lower = geometry::intersect(anchor, road_slope, &self.lower)?;

        Ok((upper, lower))
    }

    /// Intercept of the object's personal trigger line (slope = `road_slope`),
    /// shifted from the lower marker by half the marker-to-marker span.
    pub fn resolve_gate_offset(&self, road_slope: f32, anchor: na::Point2<f32>) -> Result<f32, Error> {
        let (upper, lower) = self.gate_points(road_slope, anchor)?;

        Ok(gate_offset(road_slope, &upper, &lower))
    }
}

#[inline]
pub(crate) fn gate_offset(road_slope: f32, upper: &na::Point2<f32>, lower: &na::Point2<f32>) -> f32 {
    let b = lower.y - lower.x * road_slope;

    b - geometry::distance(upper, lower) * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn offset_matches_hand_computed_scene() {
        let calib = Calibration::default();
        let anchor = na::Point2::new(400.0, 500.0);

        // travel line intercept: 500 + 0.23 * 400 = 592
        let upper_x = (592.0f32 - 7.7) / (0.44 + 0.23);
        let lower_x = (592.0f32 - 59.0) / (0.55 + 0.23);
        let upper = na::Point2::new(upper_x, 0.44 * upper_x + 7.7);
        let lower = na::Point2::new(lower_x, 0.55 * lower_x + 59.0);
        let expected = 592.0 - na::distance(&upper, &lower) / 2.0;

        let offset = calib.resolve_gate_offset(-0.23, anchor).unwrap();

        assert_abs_diff_eq!(offset, expected, epsilon = 1e-2);
        assert_abs_diff_eq!(offset, 495.16, epsilon = 0.05);
    }

    #[test]
    fn gate_points_lie_on_markers() {
        let calib = Calibration::default();
        let (upper, lower) = calib.gate_points(-0.23, na::Point2::new(120.0, 310.0)).unwrap();

        assert_abs_diff_eq!(calib.upper.residual(upper), 0.0, epsilon = 1e-2);
        assert_abs_diff_eq!(calib.lower.residual(lower), 0.0, epsilon = 1e-2);
    }

    #[test]
    fn trigger_line_sits_above_the_anchor() {
        let calib = Calibration::default();
        let anchor = na::Point2::new(250.0, 640.0);
        let offset = calib.resolve_gate_offset(-0.23, anchor).unwrap();

        assert!(anchor.y > Line::new(-0.23, offset).y_at(anchor.x));
    }

    #[test]
    fn road_parallel_to_marker_is_degenerate() {
        let calib = Calibration::default();
        let res = calib.resolve_gate_offset(0.55, na::Point2::new(10.0, 10.0));

        assert!(matches!(res, Err(Error::DegenerateGeometry { .. })));
    }
}
