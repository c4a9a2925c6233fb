use log::debug;

use super::climate::ClimateSource;

/// Full-scale value of the light sensor's analog input (10-bit).
pub const ANALOG_FULL_SCALE: u16 = 1023;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl From<bool> for Level {
    fn from(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Level the soil module's DO pin drives while the probe is wet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoisturePolarity {
    #[default]
    WetLow,
    WetHigh,
}

/// Pin-level access to the node's hardware.
///
/// One digital input (soil moisture DO), one analog input (LDR) and one
/// digital output (pump relay).
pub trait Board {
    /// Digital read of the soil moisture module.
    fn read_moisture(&mut self) -> Level;

    /// Analog read of the light sensor, in `0..=ANALOG_FULL_SCALE`.
    fn read_light(&mut self) -> u16;

    /// Digital write to the pump relay.
    fn set_relay(&mut self, level: Level);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    pub moisture_percent: u8,
    pub temperature: f32,
    pub humidity: f32,
    pub sunlight_percent: u8,
}

/// The moisture module only reports wet/dry, so this is a two-point mapping.
pub fn moisture_percent(level: Level, polarity: MoisturePolarity) -> u8 {
    let wet = match polarity {
        MoisturePolarity::WetLow => level == Level::Low,
        MoisturePolarity::WetHigh => level == Level::High,
    };
    if wet {
        100
    } else {
        0
    }
}

/// Maps a raw light reading linearly onto 0..=100, rounding to nearest.
/// Readings above full scale clamp to 100.
pub fn sunlight_percent(raw: u16) -> u8 {
    let full_scale = u32::from(ANALOG_FULL_SCALE);
    let raw = u32::from(raw.min(ANALOG_FULL_SCALE));
    ((raw * 100 + full_scale / 2) / full_scale) as u8
}

pub fn sample<B, S>(board: &mut B, climate: &mut S, polarity: MoisturePolarity) -> SensorReading
where
    B: Board,
    S: ClimateSource,
{
    let moisture_level = board.read_moisture();
    let light_raw = board.read_light();
    let climate = climate.read_climate();

    let reading = SensorReading {
        moisture_percent: moisture_percent(moisture_level, polarity),
        temperature: climate.temperature,
        humidity: climate.humidity,
        sunlight_percent: sunlight_percent(light_raw),
    };
    debug!(
        "moisture={:?} -> {}%, light={} -> {}%",
        moisture_level, reading.moisture_percent, light_raw, reading.sunlight_percent
    );
    reading
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::climate::Climate;

    struct StaticBoard {
        moisture: Level,
        light: u16,
    }

    impl Board for StaticBoard {
        fn read_moisture(&mut self) -> Level {
            self.moisture
        }

        fn read_light(&mut self) -> u16 {
            self.light
        }

        fn set_relay(&mut self, _level: Level) {}
    }

    struct FixedClimate;

    impl ClimateSource for FixedClimate {
        fn read_climate(&mut self) -> Climate {
            Climate {
                temperature: 21.0,
                humidity: 40.0,
            }
        }
    }

    #[test]
    fn test_moisture_default_polarity() {
        assert_eq!(moisture_percent(Level::Low, MoisturePolarity::WetLow), 100);
        assert_eq!(moisture_percent(Level::High, MoisturePolarity::WetLow), 0);
    }

    #[test]
    fn test_moisture_inverted_polarity() {
        assert_eq!(moisture_percent(Level::High, MoisturePolarity::WetHigh), 100);
        assert_eq!(moisture_percent(Level::Low, MoisturePolarity::WetHigh), 0);
    }

    #[test]
    fn test_sunlight_endpoints() {
        assert_eq!(sunlight_percent(0), 0);
        assert_eq!(sunlight_percent(512), 50);
        assert_eq!(sunlight_percent(1023), 100);
    }

    #[test]
    fn test_sunlight_rounds_to_nearest() {
        // 5 * 100 / 1023 = 0.49, 6 * 100 / 1023 = 0.59
        assert_eq!(sunlight_percent(5), 0);
        assert_eq!(sunlight_percent(6), 1);
        // 1018 * 100 / 1023 = 99.51
        assert_eq!(sunlight_percent(1018), 100);
    }

    #[test]
    fn test_sunlight_clamps_out_of_range() {
        assert_eq!(sunlight_percent(1024), 100);
        assert_eq!(sunlight_percent(4095), 100);
        assert_eq!(sunlight_percent(u16::MAX), 100);
    }

    #[test]
    fn test_sunlight_is_monotonic() {
        let mut previous = 0;
        for raw in 0..=ANALOG_FULL_SCALE {
            let percent = sunlight_percent(raw);
            assert!(percent >= previous, "dropped at raw={}", raw);
            assert!(percent <= 100);
            let exact = (f64::from(raw) * 100.0 / 1023.0).round() as u8;
            assert_eq!(percent, exact, "raw={}", raw);
            previous = percent;
        }
    }

    #[test]
    fn test_sample_combines_sources() {
        let mut board = StaticBoard {
            moisture: Level::Low,
            light: 512,
        };
        let reading = sample(&mut board, &mut FixedClimate, MoisturePolarity::WetLow);
        assert_eq!(
            reading,
            SensorReading {
                moisture_percent: 100,
                temperature: 21.0,
                humidity: 40.0,
                sunlight_percent: 50,
            }
        );
    }
}
