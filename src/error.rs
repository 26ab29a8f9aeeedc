//! Error types for request validation and configuration.
//!
//! The solver itself never fails: an unsolvable or timed-out packing is an
//! ordinary empty result. Errors only come from the layers that build a
//! request.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PackError {
    #[error("Invalid grid dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Unknown piece '{0}'")]
    UnknownPiece(char),

    #[error("Total area of the requested pieces overflows")]
    AreaOverflow,

    #[error("No grid dimensions for a total piece area of {area}")]
    NoDimensions { area: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T> = std::result::Result<T, PackError>;
