//! Error type shared by the frame buffer, the panel driver and the transports

pub use display_interface::DisplayError;

/// Errors returned by this crate.
///
/// Nothing is logged or retried internally; every error goes straight back to
/// the caller.
#[derive(Debug, Clone)]
pub enum Error {
    /// Requested buffer capacity is not a multiple of 8 bits (or width × height
    /// overflowed), or the buffer is too small for the RAM transfer of a flush
    InvalidSize,
    /// Bit index is outside the buffer capacity
    InvalidIndex,
    /// Pixel coordinate is outside the panel dimensions
    OutOfBounds,
    /// The bus or one of the control pins failed.
    ///
    /// A failure in the middle of [`crate::Epaper::flush`] leaves the controller
    /// in an undefined protocol state; flush again from the start.
    Transport(DisplayError),
}

/// `DisplayError` has no `PartialEq`; transport errors compare by variant.
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transport(a), Self::Transport(b)) => {
                core::mem::discriminant(a) == core::mem::discriminant(b)
            }
            _ => core::mem::discriminant(self) == core::mem::discriminant(other),
        }
    }
}

impl Eq for Error {}

impl From<DisplayError> for Error {
    fn from(err: DisplayError) -> Self {
        Error::Transport(err)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidSize => write!(f, "size must be a multiple of 8 bits"),
            Self::InvalidIndex => write!(f, "index must be less than buffer size"),
            Self::OutOfBounds => write!(f, "position out of bounds"),
            Self::Transport(err) => write!(f, "display transport error: {:?}", err),
        }
    }
}

impl std::error::Error for Error {}
