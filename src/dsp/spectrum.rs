//! Spectrum Analysis Module
//!
//! Turns one acquired sample block into a magnitude spectrum:
//! window → forward FFT → DC removal → magnitude, strictly in that order,
//! in place over the pipeline's buffer. Only the lower half of the bins is
//! exposed afterwards.

use libm::sqrtf;
use num_complex::Complex32;

use super::fft::{self, FftDirection};
use super::window::{self, WindowDirection, WindowKind};
use crate::error::Result;
use crate::types::{Peak, SampleBuffer, SamplingFrequency};

/// Spectral analyzer configuration
#[derive(Clone, Copy, Debug, Default)]
pub struct SpectralAnalyzer {
    window: WindowKind,
}

impl SpectralAnalyzer {
    /// Create an analyzer using the given window
    #[must_use]
    pub const fn new(window: WindowKind) -> Self {
        Self { window }
    }

    /// Window applied before the transform
    #[must_use]
    pub const fn window(&self) -> WindowKind {
        self.window
    }

    /// Transform the buffer into a magnitude spectrum in place
    ///
    /// # Errors
    /// `InvalidBufferSize` when `N` is not a power of two. The check runs
    /// before the buffer is modified.
    pub fn analyze<'a, const N: usize>(
        &self,
        buffer: &'a mut SampleBuffer<N>,
        sampling_frequency: SamplingFrequency,
    ) -> Result<Spectrum<'a>> {
        fft::check_len(N)?;

        let (real, imag, bins) = buffer.workspace_mut();
        window::apply(real, imag, self.window, WindowDirection::Forward);
        for ((bin, &re), &im) in bins.iter_mut().zip(real.iter()).zip(imag.iter()) {
            *bin = Complex32::new(re, im);
        }
        fft::compute(bins, FftDirection::Forward)?;
        for ((re, im), bin) in real.iter_mut().zip(imag.iter_mut()).zip(bins.iter()) {
            *re = bin.re;
            *im = bin.im;
        }
        remove_dc(real, imag);
        to_magnitude(real, imag);

        let real: &'a [f32; N] = real;
        Ok(Spectrum::new(&real[..N / 2], sampling_frequency, N))
    }
}

/// Zero the DC bin of a complex spectrum
pub fn remove_dc(real: &mut [f32], imag: &mut [f32]) {
    if let Some(re) = real.first_mut() {
        *re = 0.0;
    }
    if let Some(im) = imag.first_mut() {
        *im = 0.0;
    }
}

/// Replace every real value with the modulus of its complex bin
///
/// The imaginary part is left as it is, so running this twice does not
/// reproduce the magnitude.
pub fn to_magnitude(real: &mut [f32], imag: &[f32]) {
    for (re, &im) in real.iter_mut().zip(imag.iter()) {
        *re = sqrtf(*re * *re + im * im);
    }
}

/// Magnitude spectrum of one cycle (bins `0..N/2`)
#[derive(Clone, Copy, Debug)]
pub struct Spectrum<'a> {
    magnitudes: &'a [f32],
    sampling_frequency: SamplingFrequency,
    sample_count: usize,
}

impl<'a> Spectrum<'a> {
    /// Wrap a magnitude slice produced from `sample_count` samples
    #[must_use]
    pub const fn new(
        magnitudes: &'a [f32],
        sampling_frequency: SamplingFrequency,
        sample_count: usize,
    ) -> Self {
        Self {
            magnitudes,
            sampling_frequency,
            sample_count,
        }
    }

    /// Magnitudes of the meaningful bins
    #[must_use]
    pub const fn magnitudes(&self) -> &'a [f32] {
        self.magnitudes
    }

    /// Sampling frequency the spectrum was computed at
    #[must_use]
    pub const fn sampling_frequency(&self) -> SamplingFrequency {
        self.sampling_frequency
    }

    /// Number of time-domain samples behind the spectrum
    #[must_use]
    pub const fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Number of bins exposed
    #[must_use]
    pub const fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Check if no bins are exposed
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Frequency resolution (Hz per bin)
    #[must_use]
    pub fn bin_width(&self) -> f32 {
        if self.sample_count == 0 {
            return 0.0;
        }
        self.sampling_frequency.as_hz() / self.sample_count as f32
    }

    /// Center frequency of bin `bin`
    #[must_use]
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.bin_width()
    }

    /// Strongest bin above DC, with its frequency refined by parabolic
    /// interpolation over the neighbouring bins
    #[must_use]
    pub fn major_peak(&self) -> Option<Peak> {
        let mags = self.magnitudes;
        let (bin, &magnitude) = mags
            .iter()
            .enumerate()
            .skip(1)
            .fold(None, |best: Option<(usize, &f32)>, (i, m)| match best {
                Some((_, b)) if *b >= *m => best,
                _ => Some((i, m)),
            })?;

        if magnitude <= 0.0 {
            return None;
        }

        let mut offset = 0.0;
        if bin + 1 < mags.len() {
            let (a, b, c) = (mags[bin - 1], magnitude, mags[bin + 1]);
            let denom = a - 2.0 * b + c;
            if denom != 0.0 {
                offset = (0.5 * (a - c) / denom).clamp(-0.5, 0.5);
            }
        }

        Some(Peak {
            bin,
            frequency_hz: (bin as f32 + offset) * self.bin_width(),
            magnitude,
        })
    }
}
