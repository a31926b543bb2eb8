use crate::address_family::AddressFamily;
use crate::dns_parser::{self, Message};
use log::{debug, trace, warn};
use std::io;
use std::marker::PhantomData;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::UdpSocket;

pub const DNS_PORT: u16 = 53;

const RECV_BUFFER_SIZE: usize = 65536;

/// Error exchanging a message with a server
#[derive(Debug, Error)]
pub enum Error {
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Codec(#[from] dns_parser::Error),
    #[error("server {0} is not reachable over this address family")]
    WrongFamily(SocketAddr),
}

/// A decoded reply together with the datagram it came from
#[derive(Debug, Clone)]
pub struct Response {
    pub message: Message,
    pub datagram: Vec<u8>,
}

/// Sends single-datagram queries to one server
///
/// There is no retransmission and no timeout; callers that need either wrap
/// [`Client::exchange`] themselves.
pub struct Client<AF: AddressFamily> {
    socket: UdpSocket,
    server: SocketAddr,
    _af: PhantomData<AF>,
}

impl<AF: AddressFamily> Client<AF> {
    // Will panic if called from outside the context of a runtime
    pub fn new(server: SocketAddr) -> Result<Client<AF>, Error> {
        if !AF::accepts(&server) {
            return Err(Error::WrongFamily(server));
        }
        let socket = UdpSocket::from_std(AF::bind()?)?;

        Ok(Client {
            socket,
            server,
            _af: PhantomData,
        })
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sends `query` and waits for the reply carrying the same id
    ///
    /// Datagrams from other peers or with another id are dropped. A datagram
    /// from the server that does not decode fails the exchange.
    pub async fn exchange(&self, query: &Message) -> Result<Response, Error> {
        let request = query.to_bytes()?;
        trace!("sending {} byte query to {:?}", request.len(), self.server);
        let sent = self.socket.send_to(&request, self.server).await?;
        if sent != request.len() {
            warn!("failed to send entire packet");
        }

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        loop {
            let (len, addr) = self.socket.recv_from(&mut buf).await?;
            trace!("received {} byte packet from {:?}", len, addr);

            if addr != self.server {
                warn!("dropping packet from unexpected peer {:?}", addr);
                continue;
            }

            let message = Message::parse(&buf[..len])?;
            if message.id() != query.id() {
                warn!(
                    "dropping reply with id {} while waiting for {}",
                    message.id(),
                    query.id()
                );
                continue;
            }

            debug!(
                "reply {} from {:?}: {} ({} answers, {} authorities, {} additionals)",
                message.id(),
                addr,
                message.flags().response_code(),
                message.answers().len(),
                message.authorities().len(),
                message.additionals().len()
            );
            return Ok(Response {
                message,
                datagram: buf[..len].to_vec(),
            });
        }
    }
}
