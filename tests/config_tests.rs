//! Configuration and Constants Tests
//!
//! Tests to verify configuration values are valid and consistent.
//! Run with: cargo test --no-default-features --features std --test config_tests

use biospec_firmware::config::*;
use biospec_firmware::sink::{LineProtocolSink, ResultSink, SpectrumReport, Transport};
use biospec_firmware::error::SinkError;

// =============================================================================
// Acquisition Tests
// =============================================================================

#[test]
fn sample_count_is_power_of_two() {
    assert!(SAMPLE_COUNT.is_power_of_two());
    assert_eq!(SPECTRUM_BINS * 2, SAMPLE_COUNT);
}

#[test]
fn sample_count_fits_report() {
    assert!(u32::try_from(SAMPLE_COUNT).is_ok());
}

#[test]
fn acquisition_ceiling_covers_paced_cycle() {
    let paced_us = SAMPLE_COUNT as u64 * u64::from(SAMPLE_DELAY_US);
    assert!(paced_us < MAX_ACQUISITION_US);
}

// =============================================================================
// Maintenance Window Tests
// =============================================================================

#[test]
fn maintenance_window_is_one_minute() {
    assert_eq!(u64::from(MAINTENANCE_TICKS) * MAINTENANCE_TICK_MS, 60_000);
}

// =============================================================================
// Device Identity Tests
// =============================================================================

#[test]
fn device_name_usable_as_tag() {
    assert!(!DEVICE_NAME.is_empty());
    assert!(!DEVICE_NAME.contains('\n'));
}

#[test]
fn platform_reports_package_version() {
    assert_eq!(PLATFORM.firmware_version, env!("CARGO_PKG_VERSION"));
    assert!(!PLATFORM.name.is_empty());
}

#[test]
fn measurement_name() {
    assert_eq!(MEASUREMENT, "garden_fft_data");
}

// =============================================================================
// Buffer Capacity Tests
// =============================================================================

struct Discard;

impl Transport for Discard {
    fn send(&mut self, _record: &[u8]) -> Result<(), SinkError> {
        Ok(())
    }
}

#[test]
fn worst_case_record_fits() {
    // Longest f32 renderings, every bin
    let data = [-1.175_494_4e-38_f32; SPECTRUM_BINS];
    let report = SpectrumReport {
        device: DEVICE_NAME,
        sample_freq: -3.402_823_5e38,
        samples_cnt: SAMPLE_COUNT as u32,
        data: &data,
    };
    let mut sink: Box<LineProtocolSink<Discard, DOCUMENT_CAPACITY, RECORD_CAPACITY>> =
        Box::new(LineProtocolSink::new(Discard, MEASUREMENT));

    assert!(sink.emit(&report).is_ok());
}

#[test]
fn outbound_pipe_holds_a_record() {
    assert!(TX_PIPE_SIZE >= RECORD_CAPACITY);
    assert!(RECORD_CAPACITY > DOCUMENT_CAPACITY);
}

#[test]
fn command_buffer_holds_update_request() {
    let longest = "UP".len() + biospec_firmware::protocol::MAX_PASSWORD_LEN + ";".len();
    assert!(COMMAND_BUFFER_SIZE > longest);
    assert!(RX_PIPE_SIZE >= COMMAND_BUFFER_SIZE);
}

// =============================================================================
// USB Configuration Tests
// =============================================================================

#[test]
fn usb_ids_valid() {
    // pid.codes test VID
    assert_eq!(USB_VID, 0x1209);
    assert_ne!(USB_PID, 0);
}

#[test]
fn usb_packet_size_full_speed() {
    assert!(USB_CDC_PACKET_SIZE.is_power_of_two());
    assert!(USB_CDC_PACKET_SIZE <= 64);
}

// =============================================================================
// Pin Assignment Tests
// =============================================================================

#[test]
fn sensor_pin_assigned() {
    // ADC1_IN1 on the STM32G474
    assert_eq!(pins::SENSOR_ADC, "PA0");
}
