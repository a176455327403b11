//! USB Subsystem
//!
//! Provides USB functionality for the sensor:
//! - CDC ACM serial link carrying line-protocol records and console traffic

pub mod cdc;
