use thiserror::Error;

use crate::GridError;

/// Failures raised while turning transport payloads into engine state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// A required sub-message was absent from the payload.
    #[error("payload is missing required field `{0}`")]
    MissingField(&'static str),
    /// A raw image could not be decoded.
    #[error("malformed grid `{name}`: {source}")]
    Grid {
        /// Name of the grid that failed.
        name: &'static str,
        /// Underlying decoding failure.
        #[source]
        source: GridError,
    },
    /// A grid's dimensions disagree with the declared map size.
    #[error("grid `{name}` is {actual_width}x{actual_height}, expected {width}x{height}")]
    DimensionMismatch {
        /// Name of the grid that failed.
        name: &'static str,
        /// Declared map width.
        width: u32,
        /// Declared map height.
        height: u32,
        /// Width of the supplied grid.
        actual_width: u32,
        /// Height of the supplied grid.
        actual_height: u32,
    },
}

impl DecodeError {
    /// Wraps a grid failure with the name of the offending grid.
    #[must_use]
    pub fn grid(name: &'static str, source: GridError) -> Self {
        Self::Grid { name, source }
    }
}
