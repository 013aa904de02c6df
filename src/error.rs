//! Error type for the shimmer engine.

use shimmer_common::ColorError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors returned by the scheduler and its host.
///
/// A frame that fails is abandoned as a whole and the frame loop stops; every
/// later frame returns [`ShimmerError::Stopped`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ShimmerError {
    /// A color could not be produced or parsed.
    #[error("color error: {0}")]
    Color(#[from] ColorError),
    /// The configuration failed validation.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The drawing surface rejected a fill.
    #[error("surface rejected fill: {0}")]
    Surface(String),
    /// The frame loop was stopped by an earlier error.
    #[error("frame loop is stopped")]
    Stopped,
}
