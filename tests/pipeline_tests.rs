//! Pipeline Tests
//!
//! Full acquire → analyze → emit cycles against simulated hardware.
//! Run with: cargo test --no-default-features --features std --test pipeline_tests

use biospec_firmware::dsp::spectrum::SpectralAnalyzer;
use biospec_firmware::dsp::window::WindowKind;
use biospec_firmware::error::{Error, SinkError};
use biospec_firmware::pipeline::Pipeline;
use biospec_firmware::sampler::{AnalogSource, MonotonicClock, SamplerConfig, SignalSampler};
use biospec_firmware::sink::{LineProtocolSink, ResultSink, SnapshotSink, SpectrumReport, Transport};
use core::f32::consts::PI;
use embedded_hal::delay::DelayNs;

// =============================================================================
// Simulated Hardware
// =============================================================================

/// Sine generator sampled at a fixed rate
struct ToneSource {
    freq: f32,
    rate: f32,
    amplitude: f32,
    index: u32,
}

impl AnalogSource for ToneSource {
    fn read(&mut self) -> f32 {
        let t = self.index as f32 / self.rate;
        self.index += 1;
        self.amplitude * (2.0 * PI * self.freq * t).sin()
    }
}

/// Clock that reports `span_us` between the two readings of a cycle
struct CycleClock {
    now: u64,
    span_us: u64,
}

impl MonotonicClock for CycleClock {
    fn now_us(&mut self) -> u64 {
        let now = self.now;
        self.now += self.span_us;
        now
    }
}

struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

type Sampler = SignalSampler<ToneSource, CycleClock, NoDelay>;

fn sampler(freq: f32, rate: f32, samples: u64) -> Sampler {
    let span_us = (samples as f64 * 1_000_000.0 / f64::from(rate)) as u64;
    SignalSampler::new(
        ToneSource {
            freq,
            rate,
            amplitude: 300.0,
            index: 0,
        },
        CycleClock { now: 0, span_us },
        NoDelay,
        SamplerConfig {
            sample_delay_us: 0,
            max_acquisition_us: 60_000_000,
        },
    )
}

/// Sink keeping a copy of the last report
#[derive(Default)]
struct RecordingSink {
    device: String,
    sample_freq: f32,
    samples_cnt: u32,
    data: Vec<f32>,
    emitted: usize,
}

impl ResultSink for RecordingSink {
    fn emit(&mut self, report: &SpectrumReport<'_>) -> Result<(), SinkError> {
        self.device = report.device.to_string();
        self.sample_freq = report.sample_freq;
        self.samples_cnt = report.samples_cnt;
        self.data = report.data.to_vec();
        self.emitted += 1;
        Ok(())
    }
}

struct RejectingSink(SinkError);

impl ResultSink for RejectingSink {
    fn emit(&mut self, _report: &SpectrumReport<'_>) -> Result<(), SinkError> {
        Err(self.0)
    }
}

#[derive(Default)]
struct Capture(Vec<u8>);

impl Transport for Capture {
    fn send(&mut self, record: &[u8]) -> Result<(), SinkError> {
        self.0.extend_from_slice(record);
        Ok(())
    }
}

fn argmax(data: &[f32]) -> usize {
    data.iter()
        .enumerate()
        .skip(1)
        .fold((0, f32::MIN), |best, (i, &m)| if m > best.1 { (i, m) } else { best })
        .0
}

// =============================================================================
// End-to-End
// =============================================================================

#[test]
fn ten_hertz_tone_end_to_end() {
    let mut pipeline = Pipeline::<512>::new("ecg-test", SpectralAnalyzer::default());
    let mut sampler = sampler(10.0, 100.0, 512);
    let mut sink = RecordingSink::default();

    let report = pipeline.run_cycle(&mut sampler, &mut sink).unwrap();

    assert_eq!(sink.emitted, 1);
    assert_eq!(sink.device, "ecg-test");
    assert_eq!(sink.samples_cnt, 512);
    assert_eq!(sink.data.len(), 256);
    assert!((sink.sample_freq - 100.0).abs() < 0.01, "fs = {}", sink.sample_freq);

    let peak_bin = argmax(&sink.data);
    assert!((50..=52).contains(&peak_bin), "peak at bin {}", peak_bin);

    assert_eq!(report.sample_count, 512);
    assert_eq!(report.acquisition_us, 5_120_000);
    assert_eq!(report.peak.map(|p| p.bin), Some(peak_bin));
    assert_eq!(pipeline.cycles(), 1);
    assert_eq!(pipeline.failures(), 0);
}

#[test]
fn consecutive_cycles_reuse_buffer() {
    let mut pipeline = Pipeline::<256>::new("ecg-test", SpectralAnalyzer::new(WindowKind::Hann));
    let mut sampler = sampler(5.0, 64.0, 256);
    let mut sink = RecordingSink::default();

    for _ in 0..3 {
        pipeline.run_cycle(&mut sampler, &mut sink).unwrap();
        let peak_bin = argmax(&sink.data);
        // 5 Hz * 256 / 64 Hz = bin 20
        assert!((19..=21).contains(&peak_bin), "peak at bin {}", peak_bin);
    }
    assert_eq!(sink.emitted, 3);
    assert_eq!(pipeline.cycles(), 3);
}

#[test]
fn line_protocol_record_from_cycle() {
    let mut pipeline = Pipeline::<64>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = sampler(4.0, 32.0, 64);
    let mut sink: LineProtocolSink<Capture, 2048, 4096> =
        LineProtocolSink::new(Capture::default(), "garden_fft_data");

    pipeline.run_cycle(&mut sampler, &mut sink).unwrap();

    let text = String::from_utf8(sink.transport().0.clone()).unwrap();
    assert!(text.starts_with("garden_fft_data,device=ecg-1 json_data=\"{"), "{}", text);
    assert!(text.contains("\\\"samplesCnt\\\":64"), "{}", text);
    assert!(text.ends_with("]}\"\n"));
    assert_eq!(text.matches('\n').count(), 1);
}

#[test]
fn fan_out_feeds_snapshot_and_uplink() {
    let mut pipeline = Pipeline::<64>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = sampler(4.0, 32.0, 64);
    let mut uplink: LineProtocolSink<Capture, 2048, 4096> =
        LineProtocolSink::new(Capture::default(), "garden_fft_data");
    let mut snapshot = SnapshotSink::<2048>::new();

    let mut sinks = (&mut uplink, &mut snapshot);
    pipeline.run_cycle(&mut sampler, &mut sinks).unwrap();

    assert!(!uplink.transport().0.is_empty());
    let doc = core::str::from_utf8(snapshot.latest().unwrap()).unwrap();
    assert!(doc.starts_with("{\"device\":\"ecg-1\""), "{}", doc);
}

// =============================================================================
// Failure Handling
// =============================================================================

#[test]
fn sink_failure_abandons_cycle() {
    let mut pipeline = Pipeline::<64>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = sampler(4.0, 32.0, 64);
    let mut sink = RejectingSink(SinkError::Busy);

    let err = pipeline.run_cycle(&mut sampler, &mut sink).unwrap_err();

    assert_eq!(err, Error::SinkUnavailable(SinkError::Busy));
    assert!(!err.is_fatal());
    assert_eq!(pipeline.cycles(), 0);
    assert_eq!(pipeline.failures(), 1);
}

#[test]
fn timing_failure_skips_emission() {
    let mut pipeline = Pipeline::<64>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = SignalSampler::new(
        ToneSource {
            freq: 1.0,
            rate: 10.0,
            amplitude: 1.0,
            index: 0,
        },
        CycleClock { now: 0, span_us: 0 },
        NoDelay,
        SamplerConfig::default(),
    );
    let mut sink = RecordingSink::default();

    let err = pipeline.run_cycle(&mut sampler, &mut sink).unwrap_err();

    assert_eq!(err, Error::SamplingTiming { elapsed_us: 0 });
    assert_eq!(sink.emitted, 0);
    assert_eq!(pipeline.failures(), 1);
}

#[test]
fn invalid_buffer_size_is_fatal() {
    let mut pipeline = Pipeline::<100>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = sampler(4.0, 32.0, 100);
    let mut sink = RecordingSink::default();

    let err = pipeline.run_cycle(&mut sampler, &mut sink).unwrap_err();

    assert_eq!(err, Error::InvalidBufferSize { len: 100 });
    assert!(err.is_fatal());
    assert_eq!(sink.emitted, 0);
    assert_eq!(pipeline.failures(), 1);
}

#[test]
fn invalid_buffer_size_rejected_before_sampling() {
    let mut pipeline = Pipeline::<48>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = sampler(4.0, 32.0, 48);

    let err = pipeline
        .run_cycle(&mut sampler, &mut RecordingSink::default())
        .unwrap_err();
    assert_eq!(err, Error::InvalidBufferSize { len: 48 });

    let (source, clock, _) = sampler.into_parts();
    assert_eq!(source.index, 0, "analog input was read");
    assert_eq!(clock.now, 0, "clock was read");
    assert!(pipeline.buffer().real().iter().all(|&v| v == 0.0));
}

#[test]
fn recovers_after_failed_cycle() {
    let mut pipeline = Pipeline::<64>::new("ecg-1", SpectralAnalyzer::default());
    let mut sampler = sampler(4.0, 32.0, 64);

    assert!(pipeline
        .run_cycle(&mut sampler, &mut RejectingSink(SinkError::Disconnected))
        .is_err());
    let mut sink = RecordingSink::default();
    assert!(pipeline.run_cycle(&mut sampler, &mut sink).is_ok());

    assert_eq!(pipeline.cycles(), 1);
    assert_eq!(pipeline.failures(), 1);
    assert_eq!(pipeline.device(), "ecg-1");
}
