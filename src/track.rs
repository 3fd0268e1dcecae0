use crate::geometry::Line;
use nalgebra as na;

/// No measurement has completed yet
pub const NO_SPEED: f32 = 0.0;
/// Last measurement was too short to trust
pub const INVALID_SPEED: f32 = -1.0;

const MPS_TO_KMH: f32 = 3.6;

/// Converts a frame interval over a known distance into km/h
#[inline]
pub fn speed_kmh(distance_meters: f32, elapsed_frames: u64, frame_rate: f32) -> f32 {
    let seconds = elapsed_frames as f32 / frame_rate;

    distance_meters / seconds * MPS_TO_KMH
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Valid { elapsed: u64, speed: f32 },
    TooShort { elapsed: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackSpeedState {
    pub armed: bool,
    pub start_frame: u64,
    /// Intercept of the trigger line, its slope is the road slope
    pub gate_offset: f32,
    pub speed: f32,
}

impl TrackSpeedState {
    pub fn arm(&mut self, frame: u64, gate_offset: f32) {
        self.armed = true;
        self.start_frame = frame;
        self.gate_offset = gate_offset;
    }

    #[inline]
    pub fn trigger_line(&self, road_slope: f32) -> Line {
        Line::new(road_slope, self.gate_offset)
    }

    /// Anchor has moved to the far side of the trigger line
    #[inline]
    pub fn has_crossed(&self, anchor: na::Point2<f32>, road_slope: f32) -> bool {
        anchor.y < self.trigger_line(road_slope).y_at(anchor.x)
    }

    /// Ends the timing interval and records the resulting speed
    pub fn finish(
        &mut self,
        frame: u64,
        min_frames: u64,
        distance_meters: f32,
        frame_rate: f32,
    ) -> Measurement {
        let elapsed = frame.saturating_sub(self.start_frame);
        self.armed = false;

        if elapsed < min_frames || elapsed == 0 {
            self.speed = INVALID_SPEED;
            Measurement::TooShort { elapsed }
        } else {
            self.speed = speed_kmh(distance_meters, elapsed, frame_rate);
            Measurement::Valid {
                elapsed,
                speed: self.speed,
            }
        }
    }

    /// Speed worth showing on the overlay
    #[inline]
    pub fn reported_speed(&self) -> Option<f32> {
        if self.speed > 0.0 {
            Some(self.speed)
        } else {
            None
        }
    }
}
