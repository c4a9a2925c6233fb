//! Pico W wiring.
//!
//! | Pin  | Use                                   |
//! |------|---------------------------------------|
//! | GP15 | soil moisture module DO (input)       |
//! | GP14 | pump relay (output, low = pump off)   |
//! | GP26 | LDR divider (ADC0)                    |
//! | GP16 | reserved for a DHT22, not driven yet  |

use embassy_rp::adc::{self, Adc, Blocking, Channel as AdcChannel};
use embassy_rp::gpio::{self, Input, Output, Pull};
use embassy_rp::peripherals::{ADC, PIN_14, PIN_15, PIN_26};
use embassy_time::Instant;
use log::warn;

use super::control_loop::Clock;
use super::sensor_tools::{Board, Level};

/// The RP2040 ADC is 12-bit; readings are scaled down to the 10-bit range
/// the sunlight mapping expects.
const ADC_TO_10_BIT_SHIFT: u32 = 2;

pub struct PicoBoard<'d> {
    moisture: Input<'d>,
    relay: Output<'d>,
    adc: Adc<'d, Blocking>,
    light: AdcChannel<'d>,
}

impl PicoBoard<'static> {
    /// Takes the pins and drives the relay low straight away.
    pub fn new(moisture_pin: PIN_15, relay_pin: PIN_14, light_pin: PIN_26, adc: ADC) -> Self {
        Self {
            moisture: Input::new(moisture_pin, Pull::None),
            relay: Output::new(relay_pin, gpio::Level::Low),
            adc: Adc::new_blocking(adc, adc::Config::default()),
            light: AdcChannel::new_pin(light_pin, Pull::None),
        }
    }
}

impl Board for PicoBoard<'_> {
    fn read_moisture(&mut self) -> Level {
        Level::from(self.moisture.is_high())
    }

    fn read_light(&mut self) -> u16 {
        match self.adc.blocking_read(&mut self.light) {
            Ok(raw) => raw >> ADC_TO_10_BIT_SHIFT,
            Err(e) => {
                warn!("ADC read failed: {:?}", e);
                0
            }
        }
    }

    fn set_relay(&mut self, level: Level) {
        let level = match level {
            Level::Low => gpio::Level::Low,
            Level::High => gpio::Level::High,
        };
        self.relay.set_level(level);
    }
}

/// Milliseconds since boot from the embassy time driver.
pub struct UptimeClock;

impl Clock for UptimeClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
