use cyw43::Control;
use cyw43_pio::PioSpi;
use defmt::unwrap;
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_time::Timer;
use log::info;
use static_cell::StaticCell;

use super::uplink::Connectivity;

pub const STACK_SOCKETS: usize = 5;

/// Delay between association attempts and address checks.
const JOIN_RETRY_MS: u64 = 500;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

pub type NetStack = Stack<cyw43::NetDriver<'static>>;

#[embassy_executor::task]
async fn wifi_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(stack: &'static NetStack) -> ! {
    stack.run().await
}

/// The CYW43 chip and the DHCP network stack running on top of it.
pub struct PicoWifiLink {
    pub control: Control<'static>,
    pub stack: &'static NetStack,
}

impl PicoWifiLink {
    /// Powers up the radio, loads its firmware and starts the chip and
    /// network-stack runner tasks. Does not associate.
    #[allow(clippy::too_many_arguments)]
    pub async fn initiate_wifi_prelude(
        pin_23: PIN_23,
        pin_24: PIN_24,
        pin_25: PIN_25,
        pin_29: PIN_29,
        pio_0: PIO0,
        dma_ch0: DMA_CH0,
        spawner: Spawner,
        seed: u64,
    ) -> Self {
        let fw = include_bytes!("../../cyw43-firmware/43439A0.bin");
        let clm = include_bytes!("../../cyw43-firmware/43439A0_clm.bin");
        let pwr = Output::new(pin_23, Level::Low);
        let cs = Output::new(pin_25, Level::High);
        let mut pio = Pio::new(pio_0, Irqs);
        let spi = PioSpi::new(
            &mut pio.common,
            pio.sm0,
            pio.irq0,
            cs,
            pin_24,
            pin_29,
            dma_ch0,
        );

        static STATE: StaticCell<cyw43::State> = StaticCell::new();
        let state = STATE.init(cyw43::State::new());
        let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
        unwrap!(spawner.spawn(wifi_task(runner)));

        control.init(clm).await;
        control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;

        static STACK: StaticCell<NetStack> = StaticCell::new();
        static RESOURCES: StaticCell<StackResources<STACK_SOCKETS>> = StaticCell::new();
        let stack = &*STACK.init(Stack::new(
            net_device,
            Config::dhcpv4(Default::default()),
            RESOURCES.init(StackResources::<STACK_SOCKETS>::new()),
            seed,
        ));
        unwrap!(spawner.spawn(net_task(stack)));

        Self { control, stack }
    }

    /// Joins the WPA2 network and waits for a DHCP lease. Retries forever.
    pub async fn join_blocking(&mut self, wifi_ssid: &str, wifi_password: &str) {
        info!("Connecting to WiFi");
        while let Err(err) = self.control.join_wpa2(wifi_ssid, wifi_password).await {
            defmt::debug!("join failed with status={}", err.status);
            info!(".");
            Timer::after_millis(JOIN_RETRY_MS).await;
        }

        while !self.stack.is_config_up() {
            info!(".");
            Timer::after_millis(JOIN_RETRY_MS).await;
        }

        match self.stack.config_v4() {
            Some(config) => info!(
                "Connected to WiFi network with IP Address: {}",
                config.address.address()
            ),
            None => info!("Connected to WiFi network"),
        }
    }
}

impl Connectivity for PicoWifiLink {
    fn is_connected(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }
}
