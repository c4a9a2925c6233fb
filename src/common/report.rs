//! JSON report payload and the server's command reply.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use super::config::DeviceIdentity;
use super::sensor_tools::SensorReading;

/// Stack buffer size for an encoded report.
pub const PAYLOAD_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("report does not fit the payload buffer")]
    Encode,
    #[error("response body is not a valid command reply")]
    Decode,
}

/// Body of the upload POST. Field order is the wire order.
#[derive(Debug, Serialize)]
pub struct ReportPayload<'a> {
    pub device_id: &'a str,
    pub moisture: u8,
    pub temperature: f32,
    pub humidity: f32,
    pub sunlight: u8,
    pub zone: u16,
}

impl ReportPayload<'static> {
    pub fn new(identity: &DeviceIdentity, reading: &SensorReading) -> Self {
        ReportPayload {
            device_id: identity.device_id,
            moisture: reading.moisture_percent,
            temperature: reading.temperature,
            humidity: reading.humidity,
            sunlight: reading.sunlight_percent,
            zone: identity.zone,
        }
    }
}

impl ReportPayload<'_> {
    /// Serializes into `buf`, returning the written prefix.
    pub fn encode<'b>(&self, buf: &'b mut [u8]) -> Result<&'b [u8], ReportError> {
        let len = serde_json_core::to_slice(self, buf).map_err(|_| ReportError::Encode)?;
        Ok(&buf[..len])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
    /// Any other value, or no `command` field at all.
    Ignored,
}

impl Command {
    pub fn from_field(value: Option<&str>) -> Command {
        match value {
            Some("ON") => Command::On,
            Some("OFF") => Command::Off,
            _ => Command::Ignored,
        }
    }
}

#[derive(Deserialize)]
struct CommandReply<'a> {
    #[serde(borrow, default)]
    command: Option<&'a str>,
}

/// Extracts the pump command from a response body. Fields other than
/// `command` are skipped.
pub fn parse_command(body: &[u8]) -> Result<Command, ReportError> {
    let (reply, _) =
        serde_json_core::from_slice::<CommandReply>(body).map_err(|_| ReportError::Decode)?;
    debug!("command field: {:?}", reply.command);
    Ok(Command::from_field(reply.command))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: DeviceIdentity = DeviceIdentity {
        device_id: "KS-001",
        zone: 1,
    };

    fn reading() -> SensorReading {
        SensorReading {
            moisture_percent: 100,
            temperature: 25.5,
            humidity: 62.5,
            sunlight_percent: 50,
        }
    }

    #[test]
    fn test_payload_fields_in_wire_order() {
        let mut buf = [0u8; PAYLOAD_CAPACITY];
        let payload = ReportPayload::new(&IDENTITY, &reading());
        let body = core::str::from_utf8(payload.encode(&mut buf).unwrap()).unwrap();

        assert!(body.starts_with("{\"device_id\":\"KS-001\","), "{}", body);
        assert!(body.ends_with(",\"zone\":1}"), "{}", body);
        assert!(body.contains("\"moisture\":100"), "{}", body);
        assert!(body.contains("\"temperature\":25.5"), "{}", body);
        assert!(body.contains("\"humidity\":62.5"), "{}", body);
        assert!(body.contains("\"sunlight\":50"), "{}", body);

        let order = ["device_id", "moisture", "temperature", "humidity", "sunlight", "zone"];
        let positions: Vec<usize> = order.iter().map(|f| body.find(f).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", body);
    }

    #[test]
    fn test_payload_encode_reports_small_buffer() {
        let mut buf = [0u8; 16];
        let payload = ReportPayload::new(&IDENTITY, &reading());
        assert_eq!(payload.encode(&mut buf), Err(ReportError::Encode));
    }

    #[test]
    fn test_parse_on_and_off() {
        assert_eq!(parse_command(br#"{"command":"ON"}"#), Ok(Command::On));
        assert_eq!(parse_command(br#"{"command":"OFF"}"#), Ok(Command::Off));
    }

    #[test]
    fn test_parse_other_values_are_ignored() {
        assert_eq!(parse_command(br#"{"command":"NONE"}"#), Ok(Command::Ignored));
        assert_eq!(parse_command(br#"{"command":""}"#), Ok(Command::Ignored));
        assert_eq!(parse_command(br#"{"command":"on"}"#), Ok(Command::Ignored));
        assert_eq!(parse_command(br#"{"command":null}"#), Ok(Command::Ignored));
        assert_eq!(parse_command(br#"{}"#), Ok(Command::Ignored));
    }

    #[test]
    fn test_parse_skips_unrelated_fields() {
        let body = br#"{"message":"Data uploaded successfully","data":{"id":7,"moisture":0,"temperature":24.1},"command":"ON"}"#;
        assert_eq!(parse_command(body), Ok(Command::On));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert_eq!(parse_command(b"not json"), Err(ReportError::Decode));
        assert_eq!(parse_command(br#"{"command":"ON""#), Err(ReportError::Decode));
        assert_eq!(parse_command(b""), Err(ReportError::Decode));
    }
}
