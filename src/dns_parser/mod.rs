//! RFC 1035 message codec
//!
//! Everything here is synchronous and allocation-light: encoding appends to a
//! [`Writer`], decoding walks a [`Reader`] over the received datagram.

mod bytes;
mod enums;
mod error;
mod message;
mod name;
mod rrdata;
mod structs;

pub use self::bytes::{Reader, Writer};
pub use self::enums::{Class, Flags, Opcode, ResponseCode, Type};
pub use self::error::{Error, Malformed};
pub use self::message::Message;
pub use self::name::Name;
pub use self::rrdata::RData;
pub use self::structs::{Query, ResourceRecord};

/// Longest label a length byte can announce
pub const MAX_LABEL_LEN: usize = 63;
/// Longest name on the wire, length bytes and terminator included
pub const MAX_NAME_LEN: usize = 255;
/// Classic DNS datagram size limit
pub const MAX_UDP_PAYLOAD: usize = 512;
