//! Irrigation node: joins WiFi, then every 10 seconds reports soil and light
//! readings to the server and switches the pump relay from its reply.

#![no_std]
#![no_main]
#![allow(async_fn_in_trait)]

use defmt::unwrap;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::clocks::RoscRng;
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use embassy_time::{Instant, Timer};
use irrigation_node::common::board::{PicoBoard, UptimeClock};
use irrigation_node::common::climate::JitterClimate;
use irrigation_node::common::config::NodeConfig;
use irrigation_node::common::control_loop::Node;
use irrigation_node::common::http_uplink::{HttpBuffers, ReqwlessTransport};
use irrigation_node::common::wifi::PicoWifiLink;
use log::info;
use rand::RngCore;
use static_cell::StaticCell;

use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

#[embassy_executor::task]
async fn logger_task(driver: Driver<'static, USB>) {
    embassy_usb_logger::run!(1024, log::LevelFilter::Info, driver);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let config = NodeConfig::from_build_env();

    // Relay goes low before anything else can fail or block.
    let board = PicoBoard::new(p.PIN_15, p.PIN_14, p.PIN_26, p.ADC);

    unwrap!(spawner.spawn(logger_task(Driver::new(p.USB, Irqs))));
    defmt::info!("irrigation node starting");

    let mut rng = RoscRng;
    let seed = rng.next_u64();

    let mut link = PicoWifiLink::initiate_wifi_prelude(
        p.PIN_23, p.PIN_24, p.PIN_25, p.PIN_29, p.PIO0, p.DMA_CH0, spawner, seed,
    )
    .await;
    link.join_blocking(config.wifi_ssid, config.wifi_password).await;

    static HTTP_BUFFERS: StaticCell<HttpBuffers> = StaticCell::new();
    let transport =
        ReqwlessTransport::new(link.stack, HTTP_BUFFERS.init_with(HttpBuffers::new), RoscRng);

    let mut node = Node::new(
        board,
        link,
        transport,
        JitterClimate::new(RoscRng),
        UptimeClock,
        config,
    );
    info!(
        "Reporting as {} (zone {}) every {} ms",
        config.identity.device_id, config.identity.zone, config.report_interval_ms
    );

    loop {
        node.poll().await;
        Timer::at(Instant::from_millis(node.next_due_ms())).await;
    }
}
