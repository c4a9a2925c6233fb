pub mod climate;
pub mod config;
pub mod control_loop;
pub mod report;
pub mod sensor_tools;
pub mod uplink;

#[cfg(feature = "rp2040")]
pub mod board;
#[cfg(feature = "rp2040")]
pub mod http_uplink;
#[cfg(feature = "rp2040")]
pub mod wifi;
