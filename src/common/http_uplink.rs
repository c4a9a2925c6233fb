//! reqwless-backed [`Transport`] over the Pico W network stack.

use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use log::debug;
use rand::RngCore;
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::headers::ContentType;
use reqwless::request::{Method, RequestBuilder};

use super::uplink::{HttpReply, Transport, TransportError};
use super::wifi::NetStack;

const TCP_BUFFER_SIZE: usize = 1024;

pub struct HttpBuffers {
    pub rx_buffer: [u8; 4096],
    pub tls_read_buffer: [u8; 16640],
    pub tls_write_buffer: [u8; 16640],
}

impl HttpBuffers {
    pub const fn new() -> Self {
        Self {
            rx_buffer: [0; 4096],
            tls_read_buffer: [0; 16640],
            tls_write_buffer: [0; 16640],
        }
    }
}

impl Default for HttpBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl From<reqwless::Error> for TransportError {
    fn from(err: reqwless::Error) -> Self {
        match err {
            reqwless::Error::Dns => TransportError::Dns,
            reqwless::Error::Network(_) => TransportError::Connect,
            reqwless::Error::Tls(_) => TransportError::Tls,
            _ => TransportError::Protocol,
        }
    }
}

/// Opens a fresh TCP/TLS session for every request. Sockets, DNS resolver and
/// TLS state live only for the duration of one `post_json` call.
/// Each TLS session is seeded with a fresh draw from `rng`.
pub struct ReqwlessTransport<R> {
    stack: &'static NetStack,
    tcp_state: TcpClientState<1, TCP_BUFFER_SIZE, TCP_BUFFER_SIZE>,
    buffers: &'static mut HttpBuffers,
    rng: R,
}

impl<R: RngCore> ReqwlessTransport<R> {
    pub fn new(stack: &'static NetStack, buffers: &'static mut HttpBuffers, rng: R) -> Self {
        Self {
            stack,
            tcp_state: TcpClientState::new(),
            buffers,
            rng,
        }
    }
}

impl<R: RngCore> Transport for ReqwlessTransport<R> {
    async fn post_json(&mut self, url: &str, body: &[u8]) -> Result<HttpReply, TransportError> {
        let tcp_client = TcpClient::new(self.stack, &self.tcp_state);
        let dns_client = DnsSocket::new(self.stack);
        let tls_config = TlsConfig::new(
            self.rng.next_u64(),
            &mut self.buffers.tls_read_buffer,
            &mut self.buffers.tls_write_buffer,
            TlsVerify::None,
        );
        let mut http_client = HttpClient::new_with_tls(&tcp_client, &dns_client, tls_config);

        debug!("POST {} ({} bytes)", url, body.len());
        let mut request = http_client
            .request(Method::POST, url)
            .await?
            .content_type(ContentType::ApplicationJson)
            .body(body);
        let response = request.send(&mut self.buffers.rx_buffer).await?;

        let status = response.status.0;
        let raw_body = response.body().read_to_end().await;
        Ok(HttpReply::from_body_read(status, raw_body.map(|b| &*b)))
    }
}
