use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Grid shape mismatch on {axis} axis: expected {expected}, got {actual}")]
    GridShape {
        axis:     &'static str,
        expected: usize,
        actual:   usize,
    },

    #[error("Postcard '{postcard_id}' has unusable coordinates: lat={lat:?}, lon={lon:?}")]
    CoordinateParse {
        postcard_id: String,
        lat:         Option<String>,
        lon:         Option<String>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
