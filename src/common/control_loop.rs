//! The sample, report and actuate cycle.
//!
//! A [`Node`] sits idle until the report interval has elapsed since the end of
//! its previous cycle, then runs one cycle: check the link, sample the sensors,
//! POST the report and act on the `command` in the reply. Every cycle re-arms
//! the same interval whatever its outcome; failures are logged and dropped.

use log::{debug, error, info, warn};

use super::climate::ClimateSource;
use super::config::NodeConfig;
use super::report::{parse_command, Command, ReportPayload, PAYLOAD_CAPACITY};
use super::sensor_tools::{sample, Board, Level};
use super::uplink::{Connectivity, Transport};

/// Monotonic milliseconds.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
    Off,
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No association; nothing was sampled or sent.
    Disconnected,
    EncodeFailed,
    /// The POST produced no HTTP status.
    TransportFailed,
    /// `command` is `None` when the reply body did not parse.
    Reported {
        status: u16,
        command: Option<Command>,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct LoopState {
    last_cycle_ms: u64,
    interval_ms: u64,
    relay: RelayState,
}

impl LoopState {
    pub const fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            last_cycle_ms: now_ms,
            interval_ms,
            relay: RelayState::Off,
        }
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_cycle_ms) >= self.interval_ms
    }

    pub fn next_due_ms(&self) -> u64 {
        self.last_cycle_ms.saturating_add(self.interval_ms)
    }

    pub fn rearm(&mut self, now_ms: u64) {
        self.last_cycle_ms = now_ms;
    }

    pub fn relay(&self) -> RelayState {
        self.relay
    }
}

pub struct Node<B, L, T, S, C> {
    board: B,
    link: L,
    transport: T,
    climate: S,
    clock: C,
    config: NodeConfig,
    state: LoopState,
}

impl<B, L, T, S, C> Node<B, L, T, S, C>
where
    B: Board,
    L: Connectivity,
    T: Transport,
    S: ClimateSource,
    C: Clock,
{
    /// Drives the relay low and arms the first cycle one interval from now.
    pub fn new(
        mut board: B,
        link: L,
        transport: T,
        climate: S,
        clock: C,
        config: NodeConfig,
    ) -> Self {
        board.set_relay(Level::Low);
        let state = LoopState::new(config.report_interval_ms, clock.now_ms());
        Self {
            board,
            link,
            transport,
            climate,
            clock,
            config,
            state,
        }
    }

    pub fn relay(&self) -> RelayState {
        self.state.relay()
    }

    pub fn next_due_ms(&self) -> u64 {
        self.state.next_due_ms()
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs a cycle if the interval has elapsed, otherwise returns `None`.
    pub async fn poll(&mut self) -> Option<CycleOutcome> {
        if !self.state.is_due(self.clock.now_ms()) {
            return None;
        }
        let outcome = self.run_cycle().await;
        self.state.rearm(self.clock.now_ms());
        debug!("cycle finished: {:?}", outcome);
        Some(outcome)
    }

    async fn run_cycle(&mut self) -> CycleOutcome {
        if !self.link.is_connected() {
            warn!("WiFi Disconnected");
            return CycleOutcome::Disconnected;
        }

        let reading = sample(&mut self.board, &mut self.climate, self.config.moisture_polarity);
        let payload = ReportPayload::new(&self.config.identity, &reading);

        let mut payload_buffer = [0u8; PAYLOAD_CAPACITY];
        let body = match payload.encode(&mut payload_buffer) {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to encode report: {}", e);
                return CycleOutcome::EncodeFailed;
            }
        };

        let reply = match self.transport.post_json(self.config.server_url, body).await {
            Ok(reply) if reply.status > 0 => reply,
            Ok(reply) => {
                error!("Error on sending POST: status {}", reply.status);
                return CycleOutcome::TransportFailed;
            }
            Err(e) => {
                error!("Error on sending POST: {}", e);
                return CycleOutcome::TransportFailed;
            }
        };

        info!("{}", reply.status);
        info!("{}", reply.body_str());

        let command = match parse_command(&reply.body) {
            Ok(command) => command,
            Err(e) => {
                warn!("Ignoring response: {}", e);
                return CycleOutcome::Reported {
                    status: reply.status,
                    command: None,
                };
            }
        };
        self.apply(command);

        CycleOutcome::Reported {
            status: reply.status,
            command: Some(command),
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::On => {
                self.board.set_relay(Level::High);
                self.state.relay = RelayState::On;
                info!("Pump turned ON");
            }
            Command::Off => {
                self.board.set_relay(Level::Low);
                self.state.relay = RelayState::Off;
                info!("Pump turned OFF");
            }
            Command::Ignored => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_before_interval() {
        let state = LoopState::new(10_000, 500);
        assert!(!state.is_due(500));
        assert!(!state.is_due(10_499));
        assert!(state.is_due(10_500));
        assert!(state.is_due(60_000));
    }

    #[test]
    fn test_rearm_moves_deadline() {
        let mut state = LoopState::new(10_000, 0);
        assert_eq!(state.next_due_ms(), 10_000);
        state.rearm(10_250);
        assert_eq!(state.next_due_ms(), 20_250);
        assert!(!state.is_due(20_249));
        assert!(state.is_due(20_250));
    }

    #[test]
    fn test_clock_behind_last_cycle_is_not_due() {
        let state = LoopState::new(10_000, 5_000);
        assert!(!state.is_due(0));
    }

    #[test]
    fn test_relay_starts_off() {
        assert_eq!(LoopState::new(10_000, 0).relay(), RelayState::Off);
    }
}
