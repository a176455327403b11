//! Window Functions
//!
//! Tapering windows applied to the sample block before the transform to
//! reduce spectral leakage from the non-periodic finite acquisition.

use core::f32::consts::PI;

use libm::cosf;

/// Window shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WindowKind {
    /// No tapering
    Rectangle,
    /// Hamming window (0.54 / 0.46)
    #[default]
    Hamming,
    /// Hann window
    Hann,
    /// Blackman window
    Blackman,
}

impl WindowKind {
    /// Coefficient for sample `index` of a block of `len` samples
    ///
    /// Blocks shorter than two samples are left untouched.
    #[must_use]
    pub fn coefficient(self, index: usize, len: usize) -> f32 {
        if len < 2 {
            return 1.0;
        }
        let ratio = index as f32 / (len - 1) as f32;
        match self {
            Self::Rectangle => 1.0,
            Self::Hamming => 0.54 - 0.46 * cosf(2.0 * PI * ratio),
            Self::Hann => 0.5 - 0.5 * cosf(2.0 * PI * ratio),
            Self::Blackman => {
                0.42 - 0.5 * cosf(2.0 * PI * ratio) + 0.08 * cosf(4.0 * PI * ratio)
            }
        }
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for WindowKind {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Rectangle => defmt::write!(f, "Rectangle"),
            Self::Hamming => defmt::write!(f, "Hamming"),
            Self::Hann => defmt::write!(f, "Hann"),
            Self::Blackman => defmt::write!(f, "Blackman"),
        }
    }
}

/// Direction of window application
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowDirection {
    /// Multiply by the coefficients
    Forward,
    /// Divide by the coefficients (undo a forward pass)
    Reverse,
}

/// Apply a window in place to a real/imaginary pair
///
/// Coefficients are symmetric, so each one is computed once and applied
/// to both ends of the block.
pub fn apply(real: &mut [f32], imag: &mut [f32], kind: WindowKind, direction: WindowDirection) {
    let len = real.len().min(imag.len());
    for i in 0..len.div_ceil(2) {
        let w = kind.coefficient(i, len);
        let mirror = len - 1 - i;
        for idx in [i, mirror] {
            match direction {
                WindowDirection::Forward => {
                    real[idx] *= w;
                    imag[idx] *= w;
                }
                WindowDirection::Reverse if w != 0.0 => {
                    real[idx] /= w;
                    imag[idx] /= w;
                }
                WindowDirection::Reverse => {}
            }
            if mirror == i {
                break;
            }
        }
    }
}
