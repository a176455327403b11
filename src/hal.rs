//! Hardware Abstraction Layer
//!
//! Provides the STM32G474 implementations of the acquisition traits and
//! the handover to the system bootloader for firmware updates.
//! This module isolates hardware-specific code from the pipeline.

pub mod adc;
pub mod boot;
pub mod timer;
