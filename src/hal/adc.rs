//! ADC Driver
//!
//! Blocking single-channel reads of the AD8232 output. Each read is one
//! conversion; pacing between reads is the sampler's job.

use embassy_stm32::adc::{Adc, AdcChannel, SampleTime};
use embassy_stm32::peripherals::ADC1;

use crate::sampler::AnalogSource;

/// ADC reading result
#[derive(Clone, Copy, Debug)]
pub struct AdcReading {
    /// Raw 12-bit ADC value (0-4095)
    raw: u16,
}

impl AdcReading {
    /// Create a new ADC reading from raw value
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    /// Raw counts as a sample value
    #[must_use]
    pub fn as_sample(self) -> f32 {
        f32::from(self.raw)
    }
}

impl defmt::Format for AdcReading {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ADC({})", self.raw);
    }
}

/// Biosignal ADC bound to one input pin
pub struct SensorAdc<'d, P> {
    adc: Adc<'d, ADC1>,
    pin: P,
}

impl<'d, P: AdcChannel<ADC1>> SensorAdc<'d, P> {
    /// Create a new sensor ADC driver on `pin`
    #[must_use]
    pub fn new(adc: ADC1, pin: P) -> Self {
        let mut adc = Adc::new(adc);
        // Long sample time: the AD8232 output impedance is high
        adc.set_sample_time(SampleTime::CYCLES247_5);
        Self { adc, pin }
    }

    /// Read a single conversion
    pub fn read_raw(&mut self) -> AdcReading {
        AdcReading::from_raw(self.adc.blocking_read(&mut self.pin))
    }
}

impl<P: AdcChannel<ADC1>> AnalogSource for SensorAdc<'_, P> {
    fn read(&mut self) -> f32 {
        self.read_raw().as_sample()
    }
}
