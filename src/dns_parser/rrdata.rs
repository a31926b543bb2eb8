use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use super::{Error, Malformed, Name, Reader, Type, Writer};

/// The enumeration that represents known types of DNS resource records data
///
/// An `A` or `AAAA` record whose declared length is not 4 or 16 bytes
/// decodes to `None` instead of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RData {
    A(Option<Ipv4Addr>),
    AAAA(Option<Ipv6Addr>),
    NS(Name),
    CNAME(Name),
    PTR(Name),
    MX {
        preference: u16,
        exchange: Name,
    },
    SOA {
        primary: Name,
        mailbox: Name,
        serial: u32,
        refresh: u32,
        retry: u32,
        expire: u32,
        /// Only present when the record carried the trailing MINIMUM field
        minimum: Option<u32>,
    },
    TXT(Vec<Vec<u8>>),
    // Anything that has no dedicated variant, kept verbatim. Encoding one
    // whose type does have a variant fails with `Error::OpaqueKnownType`.
    Unknown {
        typ: Type,
        data: Vec<u8>,
    },
}

impl RData {
    /// Builds a TXT payload from a list of character strings
    pub fn txt<I, S>(strings: I) -> RData
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        RData::TXT(strings.into_iter().map(Into::into).collect())
    }

    pub fn typ(&self) -> Type {
        match *self {
            RData::A(..) => Type::A,
            RData::AAAA(..) => Type::AAAA,
            RData::NS(..) => Type::NS,
            RData::CNAME(..) => Type::CNAME,
            RData::PTR(..) => Type::PTR,
            RData::MX { .. } => Type::MX,
            RData::SOA { .. } => Type::SOA,
            RData::TXT(..) => Type::TXT,
            RData::Unknown { typ, .. } => typ,
        }
    }

    /// Size of the uncompressed payload, i.e. the `rdlength` it is sent with
    pub fn encoded_len(&self) -> usize {
        match *self {
            RData::A(ip) => ip.map_or(0, |_| 4),
            RData::AAAA(ip) => ip.map_or(0, |_| 16),
            RData::NS(ref name) | RData::CNAME(ref name) | RData::PTR(ref name) => {
                name.encoded_size()
            }
            RData::MX { ref exchange, .. } => 2 + exchange.encoded_size(),
            RData::SOA {
                ref primary,
                ref mailbox,
                minimum,
                ..
            } => primary.encoded_size() + mailbox.encoded_size() + 16 + minimum.map_or(0, |_| 4),
            RData::TXT(ref strings) => strings.iter().map(|s| s.len() + 1).sum(),
            RData::Unknown { ref data, .. } => data.len(),
        }
    }

    pub fn write_to(&self, writer: &mut Writer) -> Result<(), Error> {
        match *self {
            RData::A(ip) => {
                if let Some(ip) = ip {
                    writer.put_bytes(&ip.octets());
                }
            }
            RData::AAAA(ip) => {
                if let Some(ip) = ip {
                    writer.put_bytes(&ip.octets());
                }
            }
            RData::NS(ref name) | RData::CNAME(ref name) | RData::PTR(ref name) => {
                name.write_to(writer)
            }
            RData::MX {
                preference,
                ref exchange,
            } => {
                writer.put_u16(preference);
                exchange.write_to(writer);
            }
            RData::SOA {
                ref primary,
                ref mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                primary.write_to(writer);
                mailbox.write_to(writer);
                writer.put_u32(serial);
                writer.put_u32(refresh);
                writer.put_u32(retry);
                writer.put_u32(expire);
                if let Some(minimum) = minimum {
                    writer.put_u32(minimum);
                }
            }
            RData::TXT(ref strings) => {
                for s in strings {
                    if s.len() > usize::from(u8::MAX) {
                        return Err(Error::CharacterStringTooLong(s.len()));
                    }
                    writer.put_u8(s.len() as u8);
                    writer.put_bytes(s);
                }
            }
            RData::Unknown { typ, ref data } => {
                // `Type::Unknown(1)` goes out as code 1 too, so compare by code
                let typ = Type::from(u16::from(typ));
                if has_variant(typ) {
                    return Err(Error::OpaqueKnownType(typ));
                }
                writer.put_bytes(data)
            }
        }
        Ok(())
    }

    /// Decodes exactly `rdlength` bytes of payload for a record of type `typ`
    pub fn parse(typ: Type, rdlength: usize, reader: &mut Reader) -> Result<RData, Error> {
        let start = reader.tell();
        if reader.remaining() < rdlength {
            return Err(Error::Truncated {
                offset: start,
                wanted: rdlength,
                len: reader.len(),
            });
        }
        let end = start + rdlength;

        let data = match typ {
            Type::A if rdlength == 4 => RData::A(Some(Ipv4Addr::from(reader.read_array::<4>()?))),
            Type::A => {
                reader.seek(end);
                RData::A(None)
            }
            Type::AAAA if rdlength == 16 => {
                RData::AAAA(Some(Ipv6Addr::from(reader.read_array::<16>()?)))
            }
            Type::AAAA => {
                reader.seek(end);
                RData::AAAA(None)
            }
            Type::NS => RData::NS(Name::read_from(reader)?),
            Type::CNAME => RData::CNAME(Name::read_from(reader)?),
            Type::PTR => RData::PTR(Name::read_from(reader)?),
            Type::MX => RData::MX {
                preference: reader.read_u16()?,
                exchange: Name::read_from(reader)?,
            },
            Type::SOA => {
                let primary = Name::read_from(reader)?;
                let mailbox = Name::read_from(reader)?;
                let serial = reader.read_u32()?;
                let refresh = reader.read_u32()?;
                let retry = reader.read_u32()?;
                let expire = reader.read_u32()?;
                let minimum = if end.saturating_sub(reader.tell()) >= 4 {
                    Some(reader.read_u32()?)
                } else {
                    None
                };
                RData::SOA {
                    primary,
                    mailbox,
                    serial,
                    refresh,
                    retry,
                    expire,
                    minimum,
                }
            }
            Type::TXT => {
                let mut strings = Vec::new();
                let mut remaining = rdlength;
                while remaining > 0 {
                    let len = usize::from(reader.pop_byte()?);
                    remaining -= 1;
                    if len > remaining {
                        return Err(Malformed::CharacterStringOverrun { len, remaining }.into());
                    }
                    strings.push(reader.read_bytes(len)?.to_vec());
                    remaining -= len;
                }
                RData::TXT(strings)
            }
            typ => RData::Unknown {
                typ,
                data: reader.read_bytes(rdlength)?.to_vec(),
            },
        };

        let consumed = reader.tell() - start;
        if consumed != rdlength {
            return Err(Malformed::RdataLength {
                declared: rdlength,
                consumed,
            }
            .into());
        }
        Ok(data)
    }
}

fn has_variant(typ: Type) -> bool {
    matches!(
        typ,
        Type::A
            | Type::AAAA
            | Type::NS
            | Type::CNAME
            | Type::PTR
            | Type::MX
            | Type::SOA
            | Type::TXT
    )
}

impl fmt::Display for RData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RData::A(Some(ip)) => write!(f, "{}", ip),
            RData::AAAA(Some(ip)) => write!(f, "{}", ip),
            RData::A(None) | RData::AAAA(None) => f.write_str("<no address>"),
            RData::NS(ref name) | RData::CNAME(ref name) | RData::PTR(ref name) => {
                write!(f, "{}", name)
            }
            RData::MX {
                preference,
                ref exchange,
            } => write!(f, "{} {}", preference, exchange),
            RData::SOA {
                ref primary,
                ref mailbox,
                serial,
                refresh,
                retry,
                expire,
                minimum,
            } => {
                write!(
                    f,
                    "{} {} {} {} {} {}",
                    primary, mailbox, serial, refresh, retry, expire
                )?;
                if let Some(minimum) = minimum {
                    write!(f, " {}", minimum)?;
                }
                Ok(())
            }
            RData::TXT(ref strings) => {
                for (i, s) in strings.iter().enumerate() {
                    if i != 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{:?}", String::from_utf8_lossy(s))?;
                }
                Ok(())
            }
            RData::Unknown { ref data, .. } => {
                write!(f, "\\# {}", data.len())?;
                for byte in data {
                    write!(f, " {:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::RData;
    use crate::dns_parser::{Error, Malformed, Name, Reader, Type, Writer};

    fn name(text: &str) -> Name {
        Name::new(text).unwrap()
    }

    fn roundtrip(data: RData) {
        let mut writer = Writer::new();
        data.write_to(&mut writer).unwrap();
        let bytes = writer.into_inner();
        assert_eq!(bytes.len(), data.encoded_len());

        let mut reader = Reader::new(&bytes);
        let parsed = RData::parse(data.typ(), bytes.len(), &mut reader).unwrap();
        assert_eq!(parsed, data);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn roundtrip_every_variant() {
        roundtrip(RData::A(Some(Ipv4Addr::new(93, 184, 216, 34))));
        roundtrip(RData::AAAA(Some(Ipv6Addr::new(
            0x2606, 0x2800, 0x220, 1, 0x248, 0x1893, 0x25c8, 0x1946,
        ))));
        roundtrip(RData::NS(name("a.iana-servers.net")));
        roundtrip(RData::CNAME(name("www.example.com")));
        roundtrip(RData::PTR(name("host.example.org")));
        roundtrip(RData::MX {
            preference: 10,
            exchange: name("mail.example.com"),
        });
        roundtrip(RData::SOA {
            primary: name("ns.icann.org"),
            mailbox: name("noc.dns.icann.org"),
            serial: 2024010101,
            refresh: 7200,
            retry: 3600,
            expire: 1209600,
            minimum: None,
        });
        roundtrip(RData::SOA {
            primary: name("ns.icann.org"),
            mailbox: name("noc.dns.icann.org"),
            serial: 1,
            refresh: 2,
            retry: 3,
            expire: 4,
            minimum: Some(3600),
        });
        roundtrip(RData::txt(vec!["v=spf1 -all", "", "hello"]));
        roundtrip(RData::Unknown {
            typ: Type::Unknown(99),
            data: vec![1, 2, 3, 4, 5],
        });
    }

    #[test]
    fn encoded_lengths() {
        assert_eq!(RData::A(Some(Ipv4Addr::LOCALHOST)).encoded_len(), 4);
        assert_eq!(RData::AAAA(Some(Ipv6Addr::LOCALHOST)).encoded_len(), 16);
        assert_eq!(
            RData::MX {
                preference: 5,
                exchange: name("example.com"),
            }
            .encoded_len(),
            15
        );
        let soa = RData::SOA {
            primary: name("a.b"),
            mailbox: name("c"),
            serial: 0,
            refresh: 0,
            retry: 0,
            expire: 0,
            minimum: None,
        };
        assert_eq!(soa.encoded_len(), 5 + 3 + 16);
        assert_eq!(RData::txt(vec!["abc", "", "hello"]).encoded_len(), 11);
    }

    #[test]
    fn a_with_wrong_length_is_unset() {
        let data = b"\x01\x02\x03\x04\x05\x06\xaa";
        let mut reader = Reader::new(data);
        assert_eq!(RData::parse(Type::A, 6, &mut reader).unwrap(), RData::A(None));
        assert_eq!(reader.tell(), 6);

        let mut reader = Reader::new(data);
        assert_eq!(RData::parse(Type::AAAA, 4, &mut reader).unwrap(), RData::AAAA(None));
        assert_eq!(reader.tell(), 4);
    }

    #[test]
    fn txt_strings_stop_at_rdlength() {
        let data = b"\x03abc\x00\x05hello\x07";
        let mut reader = Reader::new(data);
        let parsed = RData::parse(Type::TXT, 11, &mut reader).unwrap();
        assert_eq!(parsed, RData::txt(vec!["abc", "", "hello"]));
        assert_eq!(reader.tell(), 11);
        assert_eq!(reader.pop_byte().unwrap(), 7);
    }

    #[test]
    fn txt_string_overrunning_rdlength() {
        let data = b"\x03abc\x05hello";
        let mut reader = Reader::new(data);
        assert_eq!(
            RData::parse(Type::TXT, 8, &mut reader),
            Err(Error::from(Malformed::CharacterStringOverrun {
                len: 5,
                remaining: 3
            }))
        );
    }

    #[test]
    fn txt_string_too_long_to_encode() {
        let data = RData::txt(vec![vec![b'x'; 256]]);
        assert_eq!(
            data.write_to(&mut Writer::new()),
            Err(Error::CharacterStringTooLong(256))
        );
    }

    #[test]
    fn name_not_filling_rdlength() {
        let data = b"\x03com\x00\x00\x00";
        let mut reader = Reader::new(data);
        assert_eq!(
            RData::parse(Type::CNAME, 7, &mut reader),
            Err(Error::from(Malformed::RdataLength {
                declared: 7,
                consumed: 5
            }))
        );
    }

    #[test]
    fn rdlength_past_end_of_packet() {
        let mut reader = Reader::new(b"\x01\x02\x03");
        assert_eq!(
            RData::parse(Type::A, 4, &mut reader),
            Err(Error::Truncated {
                offset: 0,
                wanted: 4,
                len: 3
            })
        );
    }

    #[test]
    fn unknown_is_opaque() {
        let mut reader = Reader::new(b"\xde\xad\xbe\xef");
        let parsed = RData::parse(Type::from(64), 3, &mut reader).unwrap();
        assert_eq!(
            parsed,
            RData::Unknown {
                typ: Type::Unknown(64),
                data: vec![0xde, 0xad, 0xbe],
            }
        );
        assert_eq!(parsed.to_string(), "\\# 3 de ad be");
    }

    #[test]
    fn opaque_data_for_typed_record() {
        let data = RData::Unknown {
            typ: Type::A,
            data: vec![1, 2, 3],
        };
        assert_eq!(
            data.write_to(&mut Writer::new()),
            Err(Error::OpaqueKnownType(Type::A))
        );

        let data = RData::Unknown {
            typ: Type::Unknown(15),
            data: vec![0, 10, 0],
        };
        assert_eq!(
            data.write_to(&mut Writer::new()),
            Err(Error::OpaqueKnownType(Type::MX))
        );

        let data = RData::Unknown {
            typ: Type::All,
            data: vec![7],
        };
        assert!(data.write_to(&mut Writer::new()).is_ok());
    }

    #[test]
    fn display() {
        let mx = RData::MX {
            preference: 10,
            exchange: name("mail.example.com"),
        };
        assert_eq!(mx.to_string(), "10 mail.example.com");
        assert_eq!(RData::txt(vec!["a b", "c"]).to_string(), "\"a b\" \"c\"");
        assert_eq!(RData::A(Some(Ipv4Addr::new(10, 0, 0, 1))).to_string(), "10.0.0.1");
    }
}
