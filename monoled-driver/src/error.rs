//! Driver errors

use core::fmt;

use monoled_core::{ConfigError, FramebufferError};

/// Errors returned by display drivers
///
/// `E` is the transport error, passed through unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Display configuration rejected
    InvalidConfig(ConfigError),
    /// Framebuffer memory could not be reserved
    Allocation,
    /// A command or data write failed
    Transport(E),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(e: ConfigError) -> Self {
        Error::InvalidConfig(e)
    }
}

impl<E> From<FramebufferError> for Error<E> {
    fn from(e: FramebufferError) -> Self {
        match e {
            FramebufferError::Dimensions(e) => Error::InvalidConfig(e),
            FramebufferError::Allocation => Error::Allocation,
        }
    }
}

impl<E: fmt::Display> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig(e) => write!(f, "invalid display config: {}", e),
            Self::Allocation => write!(f, "framebuffer allocation failed"),
            Self::Transport(e) => write!(f, "display transport error: {}", e),
        }
    }
}
