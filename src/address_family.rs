use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};

pub enum Inet {}

pub enum Inet6 {}

/// Selects the IP version a client socket is opened for
pub trait AddressFamily {
    type Addr: Into<IpAddr>;

    const ANY_ADDR: Self::Addr;

    const DOMAIN: Domain;

    fn udp_socket() -> io::Result<Socket> {
        Socket::new(Self::DOMAIN, Type::DGRAM, Some(Protocol::UDP))
    }

    /// Binds a non-blocking socket to the wildcard address on an ephemeral port
    fn bind() -> io::Result<UdpSocket> {
        let addr: SockAddr = SocketAddr::new(Self::ANY_ADDR.into(), 0).into();
        let socket = Self::udp_socket()?;
        socket.set_nonblocking(true)?;
        socket.bind(&addr)?;
        Ok(socket.into())
    }

    fn accepts(addr: &SocketAddr) -> bool {
        matches!(
            (addr, Self::DOMAIN),
            (SocketAddr::V4(_), Domain::IPV4) | (SocketAddr::V6(_), Domain::IPV6)
        )
    }
}

impl AddressFamily for Inet {
    type Addr = Ipv4Addr;

    const ANY_ADDR: Self::Addr = Ipv4Addr::UNSPECIFIED;

    const DOMAIN: Domain = Domain::IPV4;
}

impl AddressFamily for Inet6 {
    type Addr = Ipv6Addr;

    const ANY_ADDR: Self::Addr = Ipv6Addr::UNSPECIFIED;

    const DOMAIN: Domain = Domain::IPV6;
}
