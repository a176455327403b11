//! System configuration and hardware constants
//!
//! This module defines compile-time constants for the biosignal sensor.
//! Acquisition parameters, upload settings and buffer capacities are
//! centralized here. Device-specific values (name, update password) are
//! supplied at build time through the environment and fall back to
//! development defaults.

use crate::types::PlatformInfo;

/// Number of samples per acquisition cycle (FFT size)
pub const SAMPLE_COUNT: usize = 1024;

/// Number of meaningful magnitude bins per cycle
pub const SPECTRUM_BINS: usize = SAMPLE_COUNT / 2;

/// Pacing delay between consecutive analog reads in microseconds
pub const SAMPLE_DELAY_US: u32 = 800;

/// Acquisitions slower than this are treated as a timing fault
pub const MAX_ACQUISITION_US: u64 = 60_000_000;

/// Number of maintenance ticks between pipeline cycles
pub const MAINTENANCE_TICKS: u32 = 600;

/// Duration of one maintenance tick in milliseconds
pub const MAINTENANCE_TICK_MS: u64 = 100;

/// Measurement name used for uploaded spectra
pub const MEASUREMENT: &str = "garden_fft_data";

/// Device identifier (record tag value and console identity)
pub const DEVICE_NAME: &str = match option_env!("BIOSPEC_DEVICE_NAME") {
    Some(name) => name,
    None => "biospec-0",
};

/// Password protecting update requests (`None` disables the check)
pub const UPDATE_PASSWORD: Option<&str> = option_env!("BIOSPEC_UPDATE_PASSWORD");

/// Platform capability description resolved by the build script
pub const PLATFORM: PlatformInfo = PlatformInfo {
    name: env!("BIOSPEC_PLATFORM"),
    firmware_version: env!("CARGO_PKG_VERSION"),
};

/// Capacity of one encoded JSON spectrum document in bytes
pub const DOCUMENT_CAPACITY: usize = 10 * 1024;

/// Capacity of one encoded line-protocol record in bytes
pub const RECORD_CAPACITY: usize = DOCUMENT_CAPACITY + 256;

/// Outbound serial pipe size (holds one full record)
pub const TX_PIPE_SIZE: usize = RECORD_CAPACITY;

/// Inbound serial pipe size
pub const RX_PIPE_SIZE: usize = 128;

/// Console command buffer size
pub const COMMAND_BUFFER_SIZE: usize = 64;

/// USB VID (use test VID for development)
pub const USB_VID: u16 = 0x1209;

/// USB PID (get from pid.codes for production)
pub const USB_PID: u16 = 0x0002;

/// USB CDC ACM packet size
pub const USB_CDC_PACKET_SIZE: u16 = 64;

const _: () = assert!(SAMPLE_COUNT.is_power_of_two(), "SAMPLE_COUNT must be a power of two");
const _: () = assert!(SAMPLE_COUNT <= u16::MAX as usize);
const _: () = assert!(SAMPLE_COUNT <= crate::dsp::fft::MAX_LEN, "no FFT kernel");

/// Pin assignments for GPIO
pub mod pins {
    //! GPIO pin assignments matching the schematic

    /// AD8232 analog output
    pub const SENSOR_ADC: &str = "PA0";
}
