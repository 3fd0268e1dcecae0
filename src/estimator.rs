use std::collections::HashMap;

use log::{debug, info, trace, warn};
use nalgebra as na;

use crate::calibration::{self, Calibration};
use crate::config::EstimatorConfig;
use crate::error::Error;
use crate::frame::{Frame, TrackId, TrackedObject};
use crate::track::{Measurement, TrackSpeedState};
use crate::SpeedTracking;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: na::Point2<f32>,
    pub to: na::Point2<f32>,
}

/// Gate geometry of the debug track at the moment it was armed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugGeometry {
    pub track_id: TrackId,
    /// Between the travel line's hits on the upper and lower markers
    pub calibration: Segment,
    /// Trigger line spanning the full image width
    pub trigger: Segment,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedReport {
    pub track_id: TrackId,
    pub anchor: na::Point2<f32>,
    /// km/h
    pub speed: f32,
}

impl SpeedReport {
    /// Whole km/h, as drawn next to the box
    #[inline]
    pub fn display_kmh(&self) -> i32 {
        self.speed as i32
    }
}

#[derive(Debug, Default)]
pub struct FrameReport {
    pub frame: u64,
    /// Live tracks seen this frame
    pub live_count: usize,
    pub speeds: Vec<SpeedReport>,
    pub debug: Option<DebugGeometry>,
    /// Tracks whose update was skipped this frame
    pub errors: Vec<(TrackId, Error)>,
}

impl FrameReport {
    pub fn speed(&self, track_id: TrackId) -> Option<f32> {
        self.speeds
            .iter()
            .find(|r| r.track_id == track_id)
            .map(|r| r.speed)
    }
}

pub struct SpeedEstimator {
    config: EstimatorConfig,
    states: HashMap<TrackId, TrackSpeedState>,
}

impl SpeedEstimator {
    pub fn new(config: EstimatorConfig) -> Result<Self, Error> {
        config.validate()?;

        Ok(Self {
            config,
            states: HashMap::with_capacity(64),
        })
    }

    #[inline]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    #[inline]
    pub fn state(&self, track_id: TrackId) -> Option<&TrackSpeedState> {
        self.states.get(&track_id)
    }

    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.states.len()
    }

    fn calibration(&self) -> &Calibration {
        &self.config.calibration
    }

    fn check_capacity(&self, track_id: TrackId) -> Result<(), Error> {
        match self.config.max_tracks {
            Some(capacity)
                if self.states.len() >= capacity && !self.states.contains_key(&track_id) =>
            {
                Err(Error::IdentityOutOfRange { track_id, capacity })
            }
            _ => Ok(()),
        }
    }

    /// Runs the arm / detect transitions for one live track.
    /// Returns debug geometry when the debug track was armed.
    fn update_track(
        &mut self,
        frame: &Frame,
        obj: &TrackedObject,
    ) -> Result<Option<DebugGeometry>, Error> {
        let id = obj.track_id;
        let anchor = obj.anchor();
        let road_slope = self.config.road_slope;

        trace!(
            "frame {}: track {} anchor ({:.1}, {:.1})",
            frame.number,
            id,
            anchor.x,
            anchor.y
        );

        let armed = self.states.get(&id).map_or(false, |s| s.armed);

        if !armed {
            self.check_capacity(id)?;

            let (upper, lower) = self.calibration().gate_points(road_slope, anchor)?;
            let gate_offset = calibration::gate_offset(road_slope, &upper, &lower);

            self.states
                .entry(id)
                .or_default()
                .arm(frame.number, gate_offset);

            debug!(
                "frame {}: armed track {} with gate offset {:.2}",
                frame.number, id, gate_offset
            );

            if self.config.debug_track != Some(id) {
                return Ok(None);
            }

            let width = frame.width();

            return Ok(Some(DebugGeometry {
                track_id: id,
                calibration: Segment {
                    from: upper,
                    to: lower,
                },
                trigger: Segment {
                    from: na::Point2::new(0.0, gate_offset),
                    to: na::Point2::new(width, road_slope * width + gate_offset),
                },
            }));
        }

        let config = &self.config;
        let state = match self.states.get_mut(&id) {
            Some(state) => state,
            None => return Ok(None),
        };

        if state.has_crossed(anchor, road_slope) {
            match state.finish(
                frame.number,
                config.min_frames,
                config.distance_meters,
                config.frame_rate,
            ) {
                Measurement::Valid { elapsed, speed } => info!(
                    "frame {}: track {} crossed after {} frames, {:.2} km/h",
                    frame.number, id, elapsed, speed
                ),
                Measurement::TooShort { elapsed } => warn!(
                    "frame {}: track {} crossed after {} frames, below {} frame minimum",
                    frame.number, id, elapsed, config.min_frames
                ),
            }
        }

        Ok(None)
    }
}

impl SpeedTracking for SpeedEstimator {
    fn advance(&mut self, frame: &Frame) -> FrameReport {
        let mut report = FrameReport {
            frame: frame.number,
            ..Default::default()
        };

        for obj in frame.live() {
            report.live_count += 1;

            match self.update_track(frame, obj) {
                Ok(Some(geometry)) => report.debug = Some(geometry),
                Ok(None) => (),
                Err(err) => {
                    warn!(
                        "frame {}: skipping track {}: {}",
                        frame.number, obj.track_id, err
                    );
                    report.errors.push((obj.track_id, err));
                    continue;
                }
            }

            if let Some(speed) = self.speed(obj.track_id) {
                report.speeds.push(SpeedReport {
                    track_id: obj.track_id,
                    anchor: obj.anchor(),
                    speed,
                });
            }
        }

        report
    }

    #[inline]
    fn speed(&self, track_id: TrackId) -> Option<f32> {
        self.states.get(&track_id)?.reported_speed()
    }
}
