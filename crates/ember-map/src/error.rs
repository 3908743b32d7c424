//! Map construction and resize errors.

use ember_core::Dimension;
use std::error::Error;
use std::fmt;

/// Rejected map geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapError {
    /// The requested grid has zero cells on at least one axis.
    EmptyDimension {
        /// The rejected dimension.
        dimension: Dimension,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDimension { dimension } => {
                write!(f, "map dimension {dimension} has zero cells")
            }
        }
    }
}

impl Error for MapError {}
