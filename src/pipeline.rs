//! Acquisition Pipeline
//!
//! Owns the sample buffer and runs one acquire → analyze → emit cycle at a
//! time. The buffer is only ever touched through `&mut self`, so there is
//! exactly one writer and no concurrent reader during a cycle.

use crate::dsp::fft;
use crate::dsp::spectrum::SpectralAnalyzer;
use crate::error::Result;
use crate::sampler::{AnalogSource, MonotonicClock, SignalSampler};
use crate::sink::{ResultSink, SpectrumReport};
use crate::types::{CycleReport, SampleBuffer};

use embedded_hal::delay::DelayNs;

/// Single-channel spectrum pipeline over `N` samples
pub struct Pipeline<const N: usize> {
    buffer: SampleBuffer<N>,
    analyzer: SpectralAnalyzer,
    device: &'static str,
    cycles: u32,
    failures: u32,
}

impl<const N: usize> Pipeline<N> {
    /// Create a pipeline reporting as `device`
    #[must_use]
    pub const fn new(device: &'static str, analyzer: SpectralAnalyzer) -> Self {
        Self {
            buffer: SampleBuffer::new(),
            analyzer,
            device,
            cycles: 0,
            failures: 0,
        }
    }

    /// Run one complete cycle
    ///
    /// # Errors
    /// Any acquisition, analysis or sink error. The cycle is abandoned and
    /// not retried; the next call starts from a fresh acquisition.
    pub fn run_cycle<A, C, D, S>(
        &mut self,
        sampler: &mut SignalSampler<A, C, D>,
        sink: &mut S,
    ) -> Result<CycleReport>
    where
        A: AnalogSource,
        C: MonotonicClock,
        D: DelayNs,
        S: ResultSink + ?Sized,
    {
        let outcome = self.cycle(sampler, sink);
        match outcome {
            Ok(_) => self.cycles = self.cycles.wrapping_add(1),
            Err(_) => self.failures = self.failures.wrapping_add(1),
        }
        outcome
    }

    fn cycle<A, C, D, S>(
        &mut self,
        sampler: &mut SignalSampler<A, C, D>,
        sink: &mut S,
    ) -> Result<CycleReport>
    where
        A: AnalogSource,
        C: MonotonicClock,
        D: DelayNs,
        S: ResultSink + ?Sized,
    {
        // Reject an unusable buffer length before spending a whole acquisition on it
        fft::check_len(N)?;

        let acquisition = sampler.sample(&mut self.buffer)?;
        let spectrum = self
            .analyzer
            .analyze(&mut self.buffer, acquisition.sampling_frequency)?;

        let report = CycleReport {
            sampling_frequency: acquisition.sampling_frequency,
            acquisition_us: acquisition.elapsed_us,
            sample_count: N,
            peak: spectrum.major_peak(),
        };

        sink.emit(&SpectrumReport::new(self.device, &spectrum))?;
        Ok(report)
    }

    /// Buffer as left by the last cycle
    #[must_use]
    pub const fn buffer(&self) -> &SampleBuffer<N> {
        &self.buffer
    }

    /// Device identifier used in reports
    #[must_use]
    pub const fn device(&self) -> &'static str {
        self.device
    }

    /// Number of cycles completed successfully
    #[must_use]
    pub const fn cycles(&self) -> u32 {
        self.cycles
    }

    /// Number of cycles abandoned on an error
    #[must_use]
    pub const fn failures(&self) -> u32 {
        self.failures
    }
}
