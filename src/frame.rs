use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};

pub type TrackId = u32;

/// One tracker output row: a confirmed track and its box on this frame
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackedObject {
    pub track_id: TrackId,
    pub bbox: BBox<Ltrb>,
    /// `false` for tracks the tracker did not update this frame
    #[serde(default = "default_live")]
    pub is_live: bool,
}

fn default_live() -> bool {
    true
}

impl TrackedObject {
    pub fn new(track_id: TrackId, bbox: BBox<Ltrb>) -> Self {
        Self {
            track_id,
            bbox,
            is_live: true,
        }
    }

    #[inline]
    pub fn anchor(&self) -> na::Point2<f32> {
        self.bbox.anchor()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Frame {
    /// Monotonically increasing frame counter
    pub number: u64,
    /// (width, height) in px
    pub dims: (u32, u32),
    #[serde(default)]
    pub tracks: Vec<TrackedObject>,
}

impl Frame {
    pub fn new(number: u64, dims: (u32, u32), tracks: Vec<TrackedObject>) -> Self {
        Self {
            number,
            dims,
            tracks,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &TrackedObject> {
        self.tracks.iter()
    }

    #[inline]
    pub fn live(&self) -> impl Iterator<Item = &TrackedObject> {
        self.iter().filter(|t| t.is_live)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.dims.0 as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tracker_dump_line() {
        let frame: Frame = serde_json::from_str(
            r#"{"number": 7, "dims": [1280, 720], "tracks": [
                {"track_id": 3, "bbox": [400.0, 500.0, 520.0, 580.0]},
                {"track_id": 4, "bbox": [10.0, 20.0, 30.0, 40.0], "is_live": false}
            ]}"#,
        )
        .unwrap();

        assert_eq!(frame.number, 7);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.width(), 1280.0);
        assert!(frame.tracks[0].is_live);

        let live: Vec<_> = frame.live().map(|t| t.track_id).collect();
        assert_eq!(live, vec![3]);
        assert_eq!(frame.tracks[0].anchor(), na::Point2::new(400.0, 500.0));
    }
}
