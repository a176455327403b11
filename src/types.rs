//! Shared types used across the sensor firmware
//!
//! This module defines domain-specific types that enforce invariants
//! at compile time and provide type safety throughout the codebase.

use core::fmt;

use num_complex::Complex32;

/// Sample buffer holding one acquisition cycle
///
/// Two parallel arrays of `N` values: `real` receives the analog samples
/// and later the magnitudes, `imag` is zeroed on acquisition and holds the
/// imaginary part of the spectrum during analysis. Both always have length
/// `N`; the buffer is overwritten in place every cycle. `bins` is scratch
/// space for the complex transform and carries no state between cycles.
#[derive(Clone)]
pub struct SampleBuffer<const N: usize> {
    real: [f32; N],
    imag: [f32; N],
    bins: [Complex32; N],
}

impl<const N: usize> SampleBuffer<N> {
    /// Buffer length in samples
    pub const LEN: usize = N;

    /// Whether `N` is usable by the radix-2 transform
    pub const IS_POWER_OF_TWO: bool = N.is_power_of_two();

    /// Create a zeroed buffer
    #[must_use]
    pub const fn new() -> Self {
        Self {
            real: [0.0; N],
            imag: [0.0; N],
            bins: [Complex32::new(0.0, 0.0); N],
        }
    }

    /// Create a buffer from time-domain samples with a zeroed imaginary part
    #[must_use]
    pub const fn from_samples(real: [f32; N]) -> Self {
        Self {
            real,
            imag: [0.0; N],
            bins: [Complex32::new(0.0, 0.0); N],
        }
    }

    /// Number of slots in the buffer
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the buffer has no slots
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Real part (samples, or magnitudes after analysis)
    #[must_use]
    pub fn real(&self) -> &[f32; N] {
        &self.real
    }

    /// Imaginary part
    #[must_use]
    pub fn imag(&self) -> &[f32; N] {
        &self.imag
    }

    /// Mutable access to the real part
    pub fn real_mut(&mut self) -> &mut [f32; N] {
        &mut self.real
    }

    /// Mutable access to both parts at once
    pub fn parts_mut(&mut self) -> (&mut [f32; N], &mut [f32; N]) {
        (&mut self.real, &mut self.imag)
    }

    /// Both parts plus the complex transform scratch
    pub fn workspace_mut(&mut self) -> (&mut [f32; N], &mut [f32; N], &mut [Complex32; N]) {
        (&mut self.real, &mut self.imag, &mut self.bins)
    }

    /// Zero both parts
    pub fn clear(&mut self) {
        self.real.fill(0.0);
        self.imag.fill(0.0);
    }
}

impl<const N: usize> Default for SampleBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for SampleBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SampleBuffer({N})")
    }
}

/// Achieved sampling frequency of one acquisition cycle
///
/// Always finite and strictly positive.
#[derive(Clone, Copy, PartialEq, PartialOrd)]
pub struct SamplingFrequency(f32);

impl SamplingFrequency {
    /// Create from Hz, returns None unless finite and positive
    #[must_use]
    pub fn from_hz(hz: f32) -> Option<Self> {
        if hz.is_finite() && hz > 0.0 {
            Some(Self(hz))
        } else {
            None
        }
    }

    /// Derive the frequency of `count` samples taken over `elapsed_us`
    ///
    /// Returns None for a zero duration.
    #[must_use]
    pub fn from_elapsed(count: usize, elapsed_us: u64) -> Option<Self> {
        if elapsed_us == 0 {
            return None;
        }
        let seconds = elapsed_us as f32 / 1_000_000.0;
        Self::from_hz(count as f32 / seconds)
    }

    /// Get the frequency in Hz
    #[must_use]
    pub const fn as_hz(self) -> f32 {
        self.0
    }

    /// Highest frequency representable without aliasing
    #[must_use]
    pub fn nyquist_hz(self) -> f32 {
        self.0 / 2.0
    }
}

impl fmt::Debug for SamplingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SamplingFrequency({} Hz)", self.0)
    }
}

impl fmt::Display for SamplingFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} Hz", self.0)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for SamplingFrequency {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} Hz", self.0);
    }
}

/// Strongest component of a magnitude spectrum
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Bin index of the maximum
    pub bin: usize,
    /// Interpolated frequency in Hz
    pub frequency_hz: f32,
    /// Magnitude at the maximum bin
    pub magnitude: f32,
}

#[cfg(feature = "embedded")]
impl defmt::Format for Peak {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Peak(bin={}, {} Hz, mag={})", self.bin, self.frequency_hz, self.magnitude);
    }
}

/// Capability description of the running build
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformInfo {
    /// Hardware platform name
    pub name: &'static str,
    /// Firmware version string
    pub firmware_version: &'static str,
}

impl fmt::Display for PlatformInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.firmware_version)
    }
}

#[cfg(feature = "embedded")]
impl defmt::Format for PlatformInfo {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} v{}", self.name, self.firmware_version);
    }
}

/// Outcome of one completed pipeline cycle
#[derive(Clone, Copy, Debug)]
pub struct CycleReport {
    /// Achieved sampling frequency
    pub sampling_frequency: SamplingFrequency,
    /// Acquisition duration in microseconds
    pub acquisition_us: u64,
    /// Number of samples acquired
    pub sample_count: usize,
    /// Strongest non-DC component, if any
    pub peak: Option<Peak>,
}

#[cfg(feature = "embedded")]
impl defmt::Format for CycleReport {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Cycle({} samples in {}us, fs={}, peak={})",
            self.sample_count,
            self.acquisition_us,
            self.sampling_frequency,
            self.peak
        );
    }
}
