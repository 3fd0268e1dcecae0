use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::error::Error;

const DEFAULT_ROAD_SLOPE: f32 = -0.23;
const DEFAULT_DISTANCE_METERS: f32 = 4.8;
const DEFAULT_FRAME_RATE: f32 = 59.0;
const DEFAULT_MIN_FRAMES: u64 = 10;
const DEFAULT_DEBUG_TRACK: u32 = 3;

/// Scene constants for one camera; fixed for the lifetime of an estimator.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Image-plane direction of travel
    pub road_slope: f32,
    pub calibration: Calibration,
    /// Physical distance between the calibration markers
    pub distance_meters: f32,
    /// Frame rate of the source video
    pub frame_rate: f32,
    /// Measurements shorter than this are rejected as noise
    pub min_frames: u64,
    /// Track whose gate geometry is reported for drawing
    pub debug_track: Option<u32>,
    /// Upper bound on the number of tracked identities, unbounded if `None`
    pub max_tracks: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            road_slope: DEFAULT_ROAD_SLOPE,
            calibration: Calibration::default(),
            distance_meters: DEFAULT_DISTANCE_METERS,
            frame_rate: DEFAULT_FRAME_RATE,
            min_frames: DEFAULT_MIN_FRAMES,
            debug_track: Some(DEFAULT_DEBUG_TRACK),
            max_tracks: None,
        }
    }
}

impl EstimatorConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;

        Ok(config)
    }

    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let values = [
            ("road_slope", self.road_slope),
            ("calibration.upper.slope", self.calibration.upper.slope),
            ("calibration.upper.intercept", self.calibration.upper.intercept),
            ("calibration.lower.slope", self.calibration.lower.slope),
            ("calibration.lower.intercept", self.calibration.lower.intercept),
            ("distance_meters", self.distance_meters),
            ("frame_rate", self.frame_rate),
        ];

        if let Some((name, _)) = values.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::InvalidConfig(format!("{} must be finite", name)));
        }

        if self.distance_meters <= 0.0 {
            return Err(Error::InvalidConfig("distance_meters must be positive".into()));
        }

        if self.frame_rate <= 0.0 {
            return Err(Error::InvalidConfig("frame_rate must be positive".into()));
        }

        if self.calibration.upper.is_parallel(self.road_slope)
            || self.calibration.lower.is_parallel(self.road_slope)
        {
            return Err(Error::InvalidConfig(format!(
                "road_slope {} is parallel to a calibration line",
                self.road_slope
            )));
        }

        if self.max_tracks == Some(0) {
            return Err(Error::InvalidConfig("max_tracks must be at least 1".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Line;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = EstimatorConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.min_frames, 10);
        assert_eq!(config.debug_track, Some(3));
        assert_eq!(config.calibration.lower, Line::new(0.55, 59.0));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config = EstimatorConfig::from_json_str(r#"{ "frame_rate": 30.0, "debug_track": null }"#)
            .unwrap();

        assert_eq!(config.frame_rate, 30.0);
        assert_eq!(config.debug_track, None);
        assert_eq!(config.road_slope, -0.23);
        assert_eq!(config.distance_meters, 4.8);
    }

    #[test]
    fn rejects_non_positive_frame_rate() {
        let config = EstimatorConfig {
            frame_rate: 0.0,
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_non_finite_values() {
        let config = EstimatorConfig {
            distance_meters: f32::NAN,
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_road_parallel_to_marker() {
        let config = EstimatorConfig {
            road_slope: 0.44,
            ..Default::default()
        };

        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "road_slope": -0.3,
                "calibration": {{
                    "upper": {{ "slope": 0.4, "intercept": 10.0 }},
                    "lower": {{ "slope": 0.6, "intercept": 80.0 }}
                }},
                "distance_meters": 6.0,
                "max_tracks": 128
            }}"#
        )
        .unwrap();

        let config = EstimatorConfig::from_json_file(file.path()).unwrap();

        assert_eq!(config.road_slope, -0.3);
        assert_eq!(config.calibration.upper, Line::new(0.4, 10.0));
        assert_eq!(config.distance_meters, 6.0);
        assert_eq!(config.max_tracks, Some(128));
        assert_eq!(config.frame_rate, 59.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = EstimatorConfig::from_json_file("/nonexistent/gatespeed.json");

        assert!(matches!(res, Err(Error::Io(_))));
    }

    #[test]
    fn malformed_json_is_json_error() {
        let res = EstimatorConfig::from_json_str("{ road_slope: ");

        assert!(matches!(res, Err(Error::Json(_))));
    }
}
