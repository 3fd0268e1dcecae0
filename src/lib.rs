pub mod bbox;
pub mod calibration;
pub mod config;
pub mod error;
pub mod estimator;
pub mod frame;
pub mod geometry;
pub mod track;

pub use calibration::Calibration;
pub use config::EstimatorConfig;
pub use estimator::{DebugGeometry, FrameReport, Segment, SpeedEstimator, SpeedReport};
pub use frame::{Frame, TrackId, TrackedObject};
pub use geometry::Line;
pub use track::TrackSpeedState;

/// Frame-by-frame speed estimation over externally tracked objects.
///
/// Implementations must be driven from one logical thread, frames in
/// increasing order.
pub trait SpeedTracking {
    fn advance(&mut self, frame: &Frame) -> FrameReport;
    fn speed(&self, track_id: TrackId) -> Option<f32>;
}
