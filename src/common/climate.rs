//! Temperature and humidity sources.
//!
//! The node has no climate sensor fitted yet (GP16 is reserved for a DHT22).
//! [`JitterClimate`] stands in for it by reporting a fixed baseline with a
//! bounded random offset, in tenths of a unit.

use rand::{Rng, RngCore};

pub const TEMPERATURE_BASELINE: f32 = 25.5;
pub const HUMIDITY_BASELINE: f32 = 60.0;

/// Jitter bounds in tenths; offsets are drawn from `-bound..bound`.
pub const TEMPERATURE_JITTER_TENTHS: i16 = 20;
pub const HUMIDITY_JITTER_TENTHS: i16 = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Climate {
    pub temperature: f32,
    pub humidity: f32,
}

pub trait ClimateSource {
    fn read_climate(&mut self) -> Climate;
}

pub struct JitterClimate<R> {
    rng: R,
}

impl<R: RngCore> JitterClimate<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore> ClimateSource for JitterClimate<R> {
    fn read_climate(&mut self) -> Climate {
        let temperature_offset = self
            .rng
            .gen_range(-TEMPERATURE_JITTER_TENTHS..TEMPERATURE_JITTER_TENTHS);
        let humidity_offset = self
            .rng
            .gen_range(-HUMIDITY_JITTER_TENTHS..HUMIDITY_JITTER_TENTHS);

        Climate {
            temperature: TEMPERATURE_BASELINE + f32::from(temperature_offset) / 10.0,
            humidity: HUMIDITY_BASELINE + f32::from(humidity_offset) / 10.0,
        }
    }
}
