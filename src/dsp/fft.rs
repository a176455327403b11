//! Radix-2 Fast Fourier Transform
//!
//! In-place complex transform backed by `microfft`'s fixed-size kernels
//! (precomputed twiddle tables, no runtime trigonometry). The length must
//! be a power of two between 1 and [`MAX_LEN`]; this is checked before any
//! floating-point work is done.

use num_complex::Complex32;

use crate::error::{Error, Result};

/// Largest transform length with a kernel available
pub const MAX_LEN: usize = 4096;

/// Transform direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FftDirection {
    /// Time domain to frequency domain (unscaled)
    Forward,
    /// Frequency domain to time domain (scaled by 1/N)
    Reverse,
}

/// Check that a buffer of `len` samples can be transformed
///
/// # Errors
/// `InvalidBufferSize` unless `len` is a power of two no larger than
/// [`MAX_LEN`].
pub const fn check_len(len: usize) -> Result<()> {
    if len.is_power_of_two() && len <= MAX_LEN {
        Ok(())
    } else {
        Err(Error::InvalidBufferSize { len })
    }
}

/// Compute the FFT of `data` in place
///
/// # Errors
/// `InvalidBufferSize` if the length is rejected by [`check_len`]. The
/// buffer is untouched in that case.
pub fn compute(data: &mut [Complex32], direction: FftDirection) -> Result<()> {
    check_len(data.len())?;

    match direction {
        FftDirection::Forward => forward(data),
        FftDirection::Reverse => {
            // ifft(x) = conj(fft(conj(x))) / N
            conjugate(data);
            forward(data)?;
            let scale = 1.0 / data.len() as f32;
            for bin in data.iter_mut() {
                *bin = bin.conj() * scale;
            }
            Ok(())
        }
    }
}

fn conjugate(data: &mut [Complex32]) {
    for bin in data.iter_mut() {
        *bin = bin.conj();
    }
}

/// Run the fixed-size kernel matching `data.len()`
fn forward(data: &mut [Complex32]) -> Result<()> {
    macro_rules! kernels {
        ($($len:literal => $kernel:ident),* $(,)?) => {
            match data.len() {
                // A single sample is its own transform
                1 => {}
                $(
                    $len => {
                        let block = <&mut [Complex32; $len]>::try_from(&mut *data)
                            .map_err(|_| Error::InvalidBufferSize { len: $len })?;
                        microfft::complex::$kernel(block);
                    }
                )*
                len => return Err(Error::InvalidBufferSize { len }),
            }
        };
    }

    kernels! {
        2 => cfft_2,
        4 => cfft_4,
        8 => cfft_8,
        16 => cfft_16,
        32 => cfft_32,
        64 => cfft_64,
        128 => cfft_128,
        256 => cfft_256,
        512 => cfft_512,
        1024 => cfft_1024,
        2048 => cfft_2048,
        4096 => cfft_4096,
    }
    Ok(())
}
