//! Encoding and decoding of DNS messages in the RFC 1035 wire format, plus a
//! minimal UDP client to exchange them with a server.

mod address_family;
pub mod client;
pub mod dns_parser;

pub use crate::address_family::{AddressFamily, Inet, Inet6};
pub use crate::client::{Client, Response, DNS_PORT};
pub use crate::dns_parser::{
    Class, Flags, Message, Name, Opcode, Query, RData, ResourceRecord, ResponseCode, Type,
};
