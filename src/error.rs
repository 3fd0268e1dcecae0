use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Degenerate geometry: slope {through_slope} is parallel to fixed slope {fixed_slope}")]
    DegenerateGeometry { through_slope: f32, fixed_slope: f32 },

    #[error("Track {track_id} rejected: state table is full ({capacity} tracks)")]
    IdentityOutOfRange { track_id: u32, capacity: usize },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}
