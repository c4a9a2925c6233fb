//! Build-time node configuration.
//!
//! `build.rs` forwards values from `.env` (or the build environment) as
//! `rustc-env` variables. Anything left unset falls back to a placeholder so
//! host builds and tests never need a `.env` file.

use super::sensor_tools::MoisturePolarity;

/// Milliseconds between two report cycles.
pub const REPORT_INTERVAL_MS: u64 = 10_000;

macro_rules! env_or {
    ($key:literal, $default:literal) => {
        match option_env!($key) {
            Some(value) => value,
            None => $default,
        }
    };
}

pub const WIFI_SSID: &str = env_or!("WIFI_SSID", "YOUR_WIFI_SSID");
pub const WIFI_PASSWORD: &str = env_or!("WIFI_PASSWORD", "YOUR_WIFI_PASSWORD");
pub const SERVER_URL: &str = env_or!(
    "SERVER_URL",
    "https://krishisense-backend.onrender.com/api/sensor/upload"
);
pub const DEVICE_ID: &str = env_or!("DEVICE_ID", "KS-001");
pub const ZONE: u16 = parse_zone(env_or!("ZONE", "1"));

pub const MOISTURE_POLARITY: MoisturePolarity = if cfg!(feature = "moisture-inverted") {
    MoisturePolarity::WetHigh
} else {
    MoisturePolarity::WetLow
};

/// Parses `ZONE` at compile time; a malformed value fails the build.
const fn parse_zone(value: &str) -> u16 {
    let bytes = value.as_bytes();
    assert!(!bytes.is_empty(), "ZONE must not be empty");

    let mut zone: u16 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "ZONE must be a decimal number");
        zone = match zone.checked_mul(10) {
            Some(z) => match z.checked_add((digit - b'0') as u16) {
                Some(z) => z,
                None => panic!("ZONE out of range"),
            },
            None => panic!("ZONE out of range"),
        };
        i += 1;
    }
    zone
}

/// Identity attached to every report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub device_id: &'static str,
    pub zone: u16,
}

#[derive(Debug, Copy, Clone)]
pub struct NodeConfig {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    pub server_url: &'static str,
    pub identity: DeviceIdentity,
    pub report_interval_ms: u64,
    pub moisture_polarity: MoisturePolarity,
}

impl NodeConfig {
    pub const fn from_build_env() -> NodeConfig {
        NodeConfig {
            wifi_ssid: WIFI_SSID,
            wifi_password: WIFI_PASSWORD,
            server_url: SERVER_URL,
            identity: DeviceIdentity {
                device_id: DEVICE_ID,
                zone: ZONE,
            },
            report_interval_ms: REPORT_INTERVAL_MS,
            moisture_polarity: MOISTURE_POLARITY,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}
