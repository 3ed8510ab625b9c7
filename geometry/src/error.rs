use thiserror::Error;

/// Errors raised while constructing or querying voxel geometry.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GeometryError {
    #[error("orientation index {0} is out of range (expected 0..24)")]
    InvalidOrientation(u8),
    #[error("a shape must contain at least one filled voxel")]
    EmptyShape,
    #[error("voxel coordinate {0:?} lies outside the declared voxel space {1:?}")]
    OutOfBounds((i32, i32, i32), (u32, u32, u32)),
}
