//! Bench check for the sensor wiring: no network, logs one reading a second
//! over RTT.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::clocks::RoscRng;
use embassy_time::{Duration, Timer};
use irrigation_node::common::board::PicoBoard;
use irrigation_node::common::climate::JitterClimate;
use irrigation_node::common::config::MOISTURE_POLARITY;
use irrigation_node::common::sensor_tools::sample;
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    let p = embassy_rp::init(Default::default());

    let delay = Duration::from_secs(1);
    let mut board = PicoBoard::new(p.PIN_15, p.PIN_14, p.PIN_26, p.ADC);
    let mut climate = JitterClimate::new(RoscRng);

    loop {
        let reading = sample(&mut board, &mut climate, MOISTURE_POLARITY);
        defmt::info!(
            "Moisture = {}%, Sunlight = {}%, Temp = {} (mock), Humi = {} (mock)",
            reading.moisture_percent,
            reading.sunlight_percent,
            reading.temperature,
            reading.humidity
        );
        Timer::after(delay).await;
    }
}
