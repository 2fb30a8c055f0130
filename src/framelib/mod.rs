//! Reference-frame changes: recentering and axial rotation

pub mod rotation;
pub mod translation;

pub use rotation::{rotate, rotate_with, AxialTilt, DEFAULT_EPSILON_DEG, DEFAULT_LAMBDA_DEG};
pub use translation::translate_to_frame;
