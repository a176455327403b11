//! Digital Signal Processing
//!
//! Provides the spectral analysis chain for the biosignal sensor:
//! - Window functions (Hamming by default)
//! - In-place radix-2 FFT on `microfft` kernels
//! - DC removal, magnitude extraction and peak detection

pub mod fft;
pub mod spectrum;
pub mod window;
