//! InfluxDB line-protocol encoding
//!
//! Each cycle becomes one record
//!
//! ```text
//! garden_fft_data,device=<tag> json_data="<escaped JSON document>"
//! ```
//!
//! with no timestamp; the collector on the other side of the transport
//! stamps it on arrival.

use heapless::Vec;

use super::{ResultSink, SpectrumReport};
use crate::error::SinkError;

/// Byte transport carrying encoded records towards the database
pub trait Transport {
    /// Hand over one complete record without blocking
    ///
    /// # Errors
    /// `Busy` if the record cannot be taken as a whole right now,
    /// `Disconnected` if nobody is listening.
    fn send(&mut self, record: &[u8]) -> Result<(), SinkError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, record: &[u8]) -> Result<(), SinkError> {
        (**self).send(record)
    }
}

/// Sink producing one line-protocol record per report
///
/// `DOC` bounds the JSON document, `REC` the complete record.
pub struct LineProtocolSink<T, const DOC: usize, const REC: usize> {
    transport: T,
    measurement: &'static str,
    document: [u8; DOC],
    record: Vec<u8, REC>,
}

impl<T: Transport, const DOC: usize, const REC: usize> LineProtocolSink<T, DOC, REC> {
    /// Create a sink writing `measurement` records to `transport`
    pub const fn new(transport: T, measurement: &'static str) -> Self {
        Self {
            transport,
            measurement,
            document: [0; DOC],
            record: Vec::new(),
        }
    }

    /// Transport in use
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Encode a report into the internal record buffer
    ///
    /// # Errors
    /// `Overflow` if the document or the record does not fit.
    pub fn encode(&mut self, report: &SpectrumReport<'_>) -> Result<&[u8], SinkError> {
        let len = report.encode_json(&mut self.document)?;
        let document = &self.document[..len];

        self.record.clear();
        push_escaped(&mut self.record, self.measurement.as_bytes(), b", ")?;
        push(&mut self.record, b",device=")?;
        push_escaped(&mut self.record, report.device.as_bytes(), b", =")?;
        push(&mut self.record, b" json_data=\"")?;
        push_escaped(&mut self.record, document, b"\"\\")?;
        push(&mut self.record, b"\"\n")?;

        Ok(&self.record)
    }
}

impl<T: Transport, const DOC: usize, const REC: usize> ResultSink for LineProtocolSink<T, DOC, REC> {
    fn emit(&mut self, report: &SpectrumReport<'_>) -> Result<(), SinkError> {
        self.encode(report)?;
        self.transport.send(&self.record)
    }
}

fn push<const N: usize>(out: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), SinkError> {
    out.extend_from_slice(bytes).map_err(|()| SinkError::Overflow)
}

/// Append `bytes`, prefixing every byte found in `special` with a backslash
fn push_escaped<const N: usize>(
    out: &mut Vec<u8, N>,
    bytes: &[u8],
    special: &[u8],
) -> Result<(), SinkError> {
    for &b in bytes {
        if special.contains(&b) {
            out.push(b'\\').map_err(|_| SinkError::Overflow)?;
        }
        out.push(b).map_err(|_| SinkError::Overflow)?;
    }
    Ok(())
}
