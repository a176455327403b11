//! Error types for the acquisition pipeline
//!
//! Structural errors (buffer size) are fatal and lead to a reset.
//! Everything else is scoped to one cycle: the application logs it and
//! starts the next cycle without retrying.

use core::fmt;

/// Pipeline operation result
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised while acquiring, analyzing or emitting a spectrum
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// Acquisition took zero time or implausibly long
    SamplingTiming {
        /// Measured acquisition duration in microseconds
        elapsed_us: u64,
    },
    /// Buffer length is not a power of two
    InvalidBufferSize {
        /// Offending buffer length
        len: usize,
    },
    /// The analog source produced NaN or infinity
    NonFiniteSample {
        /// Slot of the first offending sample
        index: usize,
    },
    /// The result sink could not take the spectrum
    SinkUnavailable(SinkError),
}

impl Error {
    /// Whether the error cannot be cured by running another cycle
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidBufferSize { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SamplingTiming { elapsed_us } => {
                write!(f, "implausible acquisition time: {elapsed_us}us")
            }
            Self::InvalidBufferSize { len } => {
                write!(f, "buffer length {len} is not a power of two")
            }
            Self::NonFiniteSample { index } => write!(f, "non-finite sample at index {index}"),
            Self::SinkUnavailable(err) => write!(f, "result sink unavailable: {err}"),
        }
    }
}

impl From<SinkError> for Error {
    fn from(err: SinkError) -> Self {
        Self::SinkUnavailable(err)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::SamplingTiming { elapsed_us } => defmt::write!(f, "SamplingTiming({}us)", elapsed_us),
            Self::InvalidBufferSize { len } => defmt::write!(f, "InvalidBufferSize({})", len),
            Self::NonFiniteSample { index } => defmt::write!(f, "NonFiniteSample(@{})", index),
            Self::SinkUnavailable(err) => defmt::write!(f, "SinkUnavailable({})", err),
        }
    }
}

/// Reasons a result sink rejected a spectrum
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkError {
    /// Encoded document does not fit the sink's buffer
    Overflow,
    /// Transport cannot take the record right now; it was dropped
    Busy,
    /// No peer is connected to the transport
    Disconnected,
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => f.write_str("encoded document too large"),
            Self::Busy => f.write_str("transport busy, record dropped"),
            Self::Disconnected => f.write_str("transport disconnected"),
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SinkError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Overflow => defmt::write!(f, "Overflow"),
            Self::Busy => defmt::write!(f, "Busy"),
            Self::Disconnected => defmt::write!(f, "Disconnected"),
        }
    }
}
