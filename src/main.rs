//! Biosignal Spectrum Sensor Main Application
//!
//! Entry point for the STM32G474-based sensor firmware.
//! Initializes hardware, spawns the USB tasks and runs the
//! acquire → analyze → emit loop with a maintenance window between cycles.

#![no_std]
#![no_main]

use defmt::{debug, error, info, warn};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_stm32::usb::Driver;
use embassy_stm32::{bind_interrupts, peripherals, usb};
use embassy_time::Delay;
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, UsbDevice};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use biospec_firmware::console::{Console, ConsoleContext};
use biospec_firmware::dsp::spectrum::SpectralAnalyzer;
use biospec_firmware::dsp::window::WindowKind;
use biospec_firmware::hal::adc::SensorAdc;
use biospec_firmware::hal::boot;
use biospec_firmware::hal::timer::{Stopwatch, UptimeClock};
use biospec_firmware::pipeline::Pipeline;
use biospec_firmware::prelude::*;
use biospec_firmware::sampler::{SamplerConfig, SignalSampler};
use biospec_firmware::sink::{LineProtocolSink, SnapshotSink};
use biospec_firmware::update::{UpdateAction, UpdateService};
use biospec_firmware::usb::cdc::{self, PipeTransport, UsbStrings, RX_PIPE};

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USB_LP => usb::InterruptHandler<peripherals::USB>;
});

type UsbDriver = Driver<'static, peripherals::USB>;
type Uplink = LineProtocolSink<PipeTransport, DOCUMENT_CAPACITY, RECORD_CAPACITY>;

// Large buffers live in statics, not in the task arena
static PIPELINE: StaticCell<Pipeline<SAMPLE_COUNT>> = StaticCell::new();
static UPLINK: StaticCell<Uplink> = StaticCell::new();
static SNAPSHOT: StaticCell<SnapshotSink<DOCUMENT_CAPACITY>> = StaticCell::new();
static CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Chip still in reset state here
    boot::enter_requested_bootloader();

    info!("Biosignal Spectrum Sensor {}", PLATFORM);

    // HSI48 synchronized to USB SOF clocks the USB peripheral
    let mut config = embassy_stm32::Config::default();
    {
        use embassy_stm32::rcc::{mux, Hsi48Config};
        config.rcc.hsi48 = Some(Hsi48Config { sync_from_usb: true });
        config.rcc.mux.clk48sel = mux::Clk48sel::HSI48;
    }
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // Initialize status LED (typically on PA5 for Nucleo boards)
    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // USB CDC ACM link: PA12 = D+, PA11 = D-
    let driver = Driver::new(p.USB, Irqs, p.PA12, p.PA11);
    let mut builder = Builder::new(
        driver,
        cdc::device_config(&UsbStrings::default()),
        CONFIG_DESC.init([0; 256]),
        BOS_DESC.init([0; 256]),
        &mut [],
        CONTROL_BUF.init([0; 64]),
    );
    let class = CdcAcmClass::new(&mut builder, CDC_STATE.init(State::new()), USB_CDC_PACKET_SIZE);
    let usb = builder.build();

    info!("USB CDC initialized");

    // Spawn background tasks
    spawner.spawn(usb_task(usb)).unwrap();
    spawner.spawn(link_task(class)).unwrap();
    spawner.spawn(heartbeat_task(led)).unwrap();

    info!("==== Configuration ====");
    info!("Analog pin: {}", pins::SENSOR_ADC);
    info!("Samples count: {}", SAMPLE_COUNT);
    info!("Sample delay: {}us", SAMPLE_DELAY_US);
    info!("Device: {}", DEVICE_NAME);
    info!("Update password: {}", UPDATE_PASSWORD.is_some());

    let adc = SensorAdc::new(p.ADC1, p.PA0);
    let mut sampler = SignalSampler::new(adc, UptimeClock, Delay, SamplerConfig::default());

    let pipeline =
        PIPELINE.init_with(|| Pipeline::new(DEVICE_NAME, SpectralAnalyzer::new(WindowKind::Hamming)));
    let uplink = UPLINK.init_with(|| LineProtocolSink::new(PipeTransport, MEASUREMENT));
    let snapshot = SNAPSHOT.init_with(SnapshotSink::new);
    let mut console = Console::new(UpdateService::new(UPDATE_PASSWORD));

    info!("====   Starting    ====");

    loop {
        // Acquisition blocks this task; nothing else touches the buffer
        let watch = Stopwatch::started();
        let mut sinks = (&mut *uplink, &mut *snapshot);
        match pipeline.run_cycle(&mut sampler, &mut sinks) {
            Ok(report) => {
                info!("{}", report);
                debug!("Cycle took {}ms", watch.elapsed_ms());
            }
            Err(err) if err.is_fatal() => {
                error!("Fatal pipeline error: {}, restarting", err);
                cortex_m::peripheral::SCB::sys_reset();
            }
            Err(err) => warn!("Cycle abandoned: {}", err),
        }

        // Maintenance window: console and update servicing only
        for _ in 0..MAINTENANCE_TICKS {
            let mut inbound = [0u8; RX_PIPE_SIZE];
            let n = RX_PIPE.try_read(&mut inbound).unwrap_or(0);
            if n > 0 {
                let ctx = ConsoleContext {
                    device: DEVICE_NAME,
                    platform: PLATFORM,
                    cycles: pipeline.cycles(),
                    failures: pipeline.failures(),
                    latest: snapshot.latest(),
                };
                console.feed(&inbound[..n], &ctx, &mut PipeTransport);
            }

            if console.service_updates() == UpdateAction::EnterBootloader {
                info!("Update accepted, entering DFU bootloader");
                // Give the link task a chance to flush the acknowledgement
                Timer::after(Duration::from_millis(MAINTENANCE_TICK_MS)).await;
                boot::request_system_bootloader();
            }

            Timer::after(Duration::from_millis(MAINTENANCE_TICK_MS)).await;
        }
    }
}

/// USB device task - runs the USB stack
#[embassy_executor::task]
async fn usb_task(mut usb: UsbDevice<'static, UsbDriver>) -> ! {
    usb.run().await
}

/// Serial link task - moves bytes between CDC endpoints and pipes
#[embassy_executor::task]
async fn link_task(class: CdcAcmClass<'static, UsbDriver>) -> ! {
    cdc::pump(class).await
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
