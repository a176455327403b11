//! Signal Acquisition
//!
//! Fills the pipeline's sample buffer from one analog channel and measures
//! how long that took, giving the sampling frequency actually achieved.
//! Acquisition timing is not constant (loop jitter, delay overhead), so the
//! frequency is derived again every cycle.

use embedded_hal::delay::DelayNs;

use crate::error::{Error, Result};
use crate::types::{SampleBuffer, SamplingFrequency};

/// One analog input channel
pub trait AnalogSource {
    /// Read one sample in raw ADC counts
    fn read(&mut self) -> f32;
}

/// Monotonic microsecond time base
pub trait MonotonicClock {
    /// Microseconds since an arbitrary fixed origin
    fn now_us(&mut self) -> u64;
}

/// Acquisition parameters
#[derive(Clone, Copy, Debug)]
pub struct SamplerConfig {
    /// Pause between consecutive reads (0 disables pacing)
    pub sample_delay_us: u32,
    /// Acquisitions slower than this are rejected
    pub max_acquisition_us: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_delay_us: crate::config::SAMPLE_DELAY_US,
            max_acquisition_us: crate::config::MAX_ACQUISITION_US,
        }
    }
}

/// Result of a successful acquisition
#[derive(Clone, Copy, Debug)]
pub struct Acquisition {
    /// Achieved sampling frequency
    pub sampling_frequency: SamplingFrequency,
    /// Time spent acquiring in microseconds
    pub elapsed_us: u64,
}

/// Periodic analog sampler
pub struct SignalSampler<A, C, D> {
    source: A,
    clock: C,
    delay: D,
    config: SamplerConfig,
}

impl<A, C, D> SignalSampler<A, C, D>
where
    A: AnalogSource,
    C: MonotonicClock,
    D: DelayNs,
{
    /// Create a sampler from its hardware dependencies
    pub fn new(source: A, clock: C, delay: D, config: SamplerConfig) -> Self {
        Self {
            source,
            clock,
            delay,
            config,
        }
    }

    /// Acquisition parameters in use
    #[must_use]
    pub const fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Fill `buffer` with fresh samples and zero its imaginary part
    ///
    /// # Errors
    /// - `NonFiniteSample` if the source returns NaN or infinity
    /// - `SamplingTiming` if the measured duration is zero or exceeds the
    ///   configured ceiling
    pub fn sample<const N: usize>(&mut self, buffer: &mut SampleBuffer<N>) -> Result<Acquisition> {
        let start = self.clock.now_us();

        let (real, imag) = buffer.parts_mut();
        for (index, (re, im)) in real.iter_mut().zip(imag.iter_mut()).enumerate() {
            let value = self.source.read();
            if !value.is_finite() {
                return Err(Error::NonFiniteSample { index });
            }
            *re = value;
            *im = 0.0;
            if self.config.sample_delay_us > 0 {
                self.delay.delay_us(self.config.sample_delay_us);
            }
        }

        let elapsed_us = self.clock.now_us().saturating_sub(start);
        if elapsed_us > self.config.max_acquisition_us {
            return Err(Error::SamplingTiming { elapsed_us });
        }
        let sampling_frequency = SamplingFrequency::from_elapsed(N, elapsed_us)
            .ok_or(Error::SamplingTiming { elapsed_us })?;

        Ok(Acquisition {
            sampling_frequency,
            elapsed_us,
        })
    }

    /// Release the hardware dependencies
    pub fn into_parts(self) -> (A, C, D) {
        (self.source, self.clock, self.delay)
    }
}
