//! Result Sinks
//!
//! Consumers of the per-cycle spectrum. The pipeline hands every sink a
//! [`SpectrumReport`] and moves on; sinks never block the pipeline and do
//! not retry. A failed emission is reported and the data is dropped.
//!
//! - [`LineProtocolSink`]: one InfluxDB line-protocol record per cycle,
//!   pushed through a [`Transport`]
//! - [`SnapshotSink`]: keeps the latest document for the query command

pub mod line_protocol;
pub mod snapshot;

pub use line_protocol::{LineProtocolSink, Transport};
pub use snapshot::SnapshotSink;

use serde::Serialize;

use crate::dsp::spectrum::Spectrum;
use crate::error::SinkError;

/// Upload document for one cycle
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SpectrumReport<'a> {
    /// Device identifier
    pub device: &'a str,
    /// Achieved sampling frequency in Hz
    #[serde(rename = "sampleFreq")]
    pub sample_freq: f32,
    /// Number of time-domain samples
    #[serde(rename = "samplesCnt")]
    pub samples_cnt: u32,
    /// Magnitudes of bins `0..samplesCnt/2`
    pub data: &'a [f32],
}

impl<'a> SpectrumReport<'a> {
    /// Build the report for `spectrum` as seen by `device`
    #[must_use]
    pub fn new(device: &'a str, spectrum: &Spectrum<'a>) -> Self {
        Self {
            device,
            sample_freq: spectrum.sampling_frequency().as_hz(),
            samples_cnt: spectrum.sample_count() as u32,
            data: spectrum.magnitudes(),
        }
    }

    /// Encode as a JSON document into `out`, returning the length written
    ///
    /// # Errors
    /// `Overflow` if the document does not fit.
    pub fn encode_json(&self, out: &mut [u8]) -> Result<usize, SinkError> {
        serde_json_core::to_slice(self, out).map_err(|_| SinkError::Overflow)
    }
}

/// Consumer of per-cycle spectra
pub trait ResultSink {
    /// Take one report
    ///
    /// # Errors
    /// Any [`SinkError`]; the report is dropped.
    fn emit(&mut self, report: &SpectrumReport<'_>) -> Result<(), SinkError>;
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    fn emit(&mut self, report: &SpectrumReport<'_>) -> Result<(), SinkError> {
        (**self).emit(report)
    }
}

/// Fan out to two sinks; both are always attempted, the first error wins
impl<A: ResultSink, B: ResultSink> ResultSink for (A, B) {
    fn emit(&mut self, report: &SpectrumReport<'_>) -> Result<(), SinkError> {
        let first = self.0.emit(report);
        let second = self.1.emit(report);
        first.and(second)
    }
}
