use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollageError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// The polygon found no collision-free position on the current canvas.
    /// Recovered by the layout loop through canvas growth.
    #[error("Placement failed after {attempts} attempts on a {width}x{height} canvas")]
    PlacementFailed {
        attempts: u32,
        width: u32,
        height: u32,
    },

    #[error("Layout did not converge after {rounds} canvas growth rounds (last canvas {width}x{height})")]
    LayoutUnbounded { rounds: u32, width: u32, height: u32 },

    #[error("Invalid dimensions {width}x{height}: {message}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, CollageError>;
