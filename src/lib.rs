//! Biosignal Spectrum Sensor Firmware Library
//!
//! This library provides the core functionality for an STM32G474-based
//! biosignal sensor. An AD8232 ECG front-end is sampled on one ADC channel,
//! each block of samples is turned into a magnitude spectrum, and the
//! spectrum is emitted as an InfluxDB line-protocol record over USB.
//!
//! # Architecture
//!
//! The firmware is organized in layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    APPLICATION LAYER                         │
//! │  Pipeline  │  Console  │  Update Service                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │                  ACQUISITION / DSP LAYER                     │
//! │  Sampler  │  Window  │  FFT  │  Magnitude  │  Result Sinks   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                   HAL / DRIVER LAYER                         │
//! │  ADC  │  Clock  │  USB CDC                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │                    RTOS / SCHEDULER                          │
//! │           embassy-rs (async/await executor)                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Cycle
//!
//! ```text
//! sample (N reads, measured fs) → window → FFT → DC removal → magnitude
//!     → emit bins 0..N/2 → maintenance window (console, updates)
//! ```
//!
//! # Design Principles
//!
//! - **Single owner**: the sample buffer lives in one `Pipeline` and is
//!   only reachable through `&mut`
//! - **No heap**: every buffer has a compile-time capacity
//! - **Functional core, imperative shell**: pure logic separated from I/O
//! - **Explicit error handling**: all fallible operations return `Result`

#![cfg_attr(feature = "embedded", no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]

// Re-export dependencies needed by applications (only in embedded mode)
#[cfg(feature = "embedded")]
pub use embassy_executor;
#[cfg(feature = "embedded")]
pub use embassy_stm32;
#[cfg(feature = "embedded")]
pub use embassy_time;
#[cfg(feature = "embedded")]
pub use embassy_usb;

/// Hardware Abstraction Layer
///
/// Embassy-backed implementations of the sampler's hardware traits.
#[cfg(feature = "embedded")]
pub mod hal;

/// USB Subsystem
///
/// CDC ACM serial link carrying records out and commands in.
#[cfg(feature = "embedded")]
pub mod usb;

/// Digital Signal Processing
///
/// Windowing, FFT, DC removal and magnitude extraction.
pub mod dsp;

/// Signal acquisition
pub mod sampler;

/// Acquire → analyze → emit cycle
pub mod pipeline;

/// Consumers of per-cycle spectra
pub mod sink;

/// Firmware update service
pub mod update;

/// Serial console commands
pub mod protocol;

/// Maintenance console serviced between cycles
pub mod console;

/// Error types
pub mod error;

/// Shared types used across modules
pub mod types;

/// System configuration and constants
pub mod config;

/// Prelude module for common imports
#[cfg(feature = "embedded")]
pub mod prelude {
    //! Convenient re-exports for common types and traits.

    pub use crate::config::*;
    pub use crate::types::*;

    // Embassy
    pub use embassy_time::{Duration, Instant, Timer};

    // Error handling
    pub use crate::error::{Error, SinkError};

    // Logging
    pub use defmt::{debug, error, info, trace, warn};
}
