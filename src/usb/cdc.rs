//! USB CDC ACM (Serial) Implementation
//!
//! The pipeline never touches the USB class directly. Outbound records and
//! responses go into [`TX_PIPE`], inbound console bytes arrive in
//! [`RX_PIPE`]; a dedicated task moves bytes between the pipes and the
//! endpoints. A record that does not fit the outbound pipe as a whole is
//! dropped rather than waited for.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::join::join;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::driver::Driver;

use crate::config::{RX_PIPE_SIZE, TX_PIPE_SIZE, USB_CDC_PACKET_SIZE};
use crate::error::SinkError;
use crate::sink::Transport;

/// Outbound bytes (records and console responses)
pub static TX_PIPE: Pipe<CriticalSectionRawMutex, TX_PIPE_SIZE> = Pipe::new();

/// Inbound console bytes
pub static RX_PIPE: Pipe<CriticalSectionRawMutex, RX_PIPE_SIZE> = Pipe::new();

/// Set while a host has the serial port configured
static HOST_CONNECTED: AtomicBool = AtomicBool::new(false);

/// Check if a host is attached
#[must_use]
pub fn host_connected() -> bool {
    HOST_CONNECTED.load(Ordering::Relaxed)
}

/// Non-blocking transport writing whole records into [`TX_PIPE`]
#[derive(Clone, Copy, Debug, Default)]
pub struct PipeTransport;

impl Transport for PipeTransport {
    fn send(&mut self, record: &[u8]) -> Result<(), SinkError> {
        if !host_connected() {
            return Err(SinkError::Disconnected);
        }
        if TX_PIPE.capacity() - TX_PIPE.len() < record.len() {
            return Err(SinkError::Busy);
        }

        let mut rest = record;
        while !rest.is_empty() {
            match TX_PIPE.try_write(rest) {
                Ok(n) => rest = &rest[n..],
                Err(_) => return Err(SinkError::Busy),
            }
        }
        Ok(())
    }
}

/// Move bytes between the CDC endpoints and the pipes, forever
pub async fn pump<'d, D: Driver<'d>>(class: CdcAcmClass<'d, D>) -> ! {
    let (mut sender, mut receiver) = class.split();

    let inbound = async {
        let mut buf = [0u8; USB_CDC_PACKET_SIZE as usize];
        loop {
            receiver.wait_connection().await;
            while let Ok(n) = receiver.read_packet(&mut buf).await {
                // Console input beyond the pipe size is discarded
                let _ = RX_PIPE.try_write(&buf[..n]);
            }
        }
    };

    let outbound = async {
        let mut buf = [0u8; USB_CDC_PACKET_SIZE as usize];
        loop {
            sender.wait_connection().await;
            HOST_CONNECTED.store(true, Ordering::Relaxed);
            loop {
                let n = TX_PIPE.read(&mut buf).await;
                if sender.write_packet(&buf[..n]).await.is_err() {
                    break;
                }
            }
            HOST_CONNECTED.store(false, Ordering::Relaxed);
            TX_PIPE.clear();
        }
    };

    join(inbound, outbound).await;
    unreachable!()
}

/// USB device descriptor strings
pub struct UsbStrings {
    /// Manufacturer name
    pub manufacturer: &'static str,
    /// Product name
    pub product: &'static str,
    /// Serial number
    pub serial: &'static str,
}

impl Default for UsbStrings {
    fn default() -> Self {
        Self {
            manufacturer: "Biospec Project",
            product: "Biosignal Spectrum Sensor",
            serial: crate::config::DEVICE_NAME,
        }
    }
}

/// Build the embassy-usb device configuration
#[must_use]
pub fn device_config(strings: &UsbStrings) -> embassy_usb::Config<'static> {
    let mut config = embassy_usb::Config::new(crate::config::USB_VID, crate::config::USB_PID);
    config.manufacturer = Some(strings.manufacturer);
    config.product = Some(strings.product);
    config.serial_number = Some(strings.serial);
    config.max_power = 100;
    config.max_packet_size_0 = 64;
    config
}
