use std::convert::TryFrom;

use super::{Error, Flags, Query, Reader, ResourceRecord, Writer};

/// The fixed 12-byte header as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Header {
    id: u16,
    flags: Flags,
    queries: u16,
    answers: u16,
    authorities: u16,
    additionals: u16,
}

impl Header {
    fn write_to(&self, writer: &mut Writer) {
        writer.put_u16(self.id);
        writer.put_u16(self.flags.bits());
        writer.put_u16(self.queries);
        writer.put_u16(self.answers);
        writer.put_u16(self.authorities);
        writer.put_u16(self.additionals);
    }

    fn read_from(reader: &mut Reader) -> Result<Header, Error> {
        Ok(Header {
            id: reader.read_u16()?,
            flags: Flags::from_bits(reader.read_u16()?),
            queries: reader.read_u16()?,
            answers: reader.read_u16()?,
            authorities: reader.read_u16()?,
            additionals: reader.read_u16()?,
        })
    }
}

/// A complete DNS message: header plus the four sections
///
/// The section counts are not stored; they are taken from the section
/// lengths when the message is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    id: u16,
    flags: Flags,
    queries: Vec<Query>,
    answers: Vec<ResourceRecord>,
    authorities: Vec<ResourceRecord>,
    additionals: Vec<ResourceRecord>,
}

impl Message {
    /// Creates an empty standard query with a random id
    pub fn new() -> Message {
        Message::with_id(rand::random())
    }

    pub fn with_id(id: u16) -> Message {
        Message {
            id,
            flags: Flags::STANDARD_QUERY,
            queries: Vec::new(),
            answers: Vec::new(),
            authorities: Vec::new(),
            additionals: Vec::new(),
        }
    }

    pub fn id(&self) -> u16 {
        self.id
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Adds `flags` to the flags already set
    pub fn set_flags(&mut self, flags: Flags) {
        self.flags |= flags;
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn answers(&self) -> &[ResourceRecord] {
        &self.answers
    }

    pub fn authorities(&self) -> &[ResourceRecord] {
        &self.authorities
    }

    pub fn additionals(&self) -> &[ResourceRecord] {
        &self.additionals
    }

    pub fn add_query(&mut self, query: Query) {
        self.queries.push(query);
    }

    pub fn add_answer(&mut self, record: ResourceRecord) {
        self.answers.push(record);
    }

    pub fn add_authority(&mut self, record: ResourceRecord) {
        self.authorities.push(record);
    }

    pub fn add_additional(&mut self, record: ResourceRecord) {
        self.additionals.push(record);
    }

    fn header(&self) -> Result<Header, Error> {
        Ok(Header {
            id: self.id,
            flags: self.flags,
            queries: section_count(&self.queries)?,
            answers: section_count(&self.answers)?,
            authorities: section_count(&self.authorities)?,
            additionals: section_count(&self.additionals)?,
        })
    }

    pub fn write_to(&self, writer: &mut Writer) -> Result<(), Error> {
        self.header()?.write_to(writer);
        for query in &self.queries {
            query.write_to(writer);
        }
        for record in self
            .answers
            .iter()
            .chain(&self.authorities)
            .chain(&self.additionals)
        {
            record.write_to(writer)?;
        }
        Ok(())
    }

    /// Encodes the message without name compression
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::new();
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Encodes the message, replacing repeated names with pointers
    pub fn to_compressed_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = Writer::compressing();
        self.write_to(&mut writer)?;
        Ok(writer.into_inner())
    }

    /// Decodes a message starting at the reader position
    ///
    /// Compression pointers are resolved against the whole reader, so the
    /// reader must span the entire datagram.
    pub fn read_from(reader: &mut Reader) -> Result<Message, Error> {
        let header = Header::read_from(reader)?;
        Ok(Message {
            id: header.id,
            flags: header.flags,
            queries: read_section(reader, header.queries, Query::read_from)?,
            answers: read_section(reader, header.answers, ResourceRecord::read_from)?,
            authorities: read_section(reader, header.authorities, ResourceRecord::read_from)?,
            additionals: read_section(reader, header.additionals, ResourceRecord::read_from)?,
        })
    }

    /// Parses a whole datagram; bytes after the last record are ignored
    pub fn parse(data: &[u8]) -> Result<Message, Error> {
        Message::read_from(&mut Reader::new(data))
    }
}

impl Default for Message {
    fn default() -> Message {
        Message::new()
    }
}

fn section_count<T>(section: &[T]) -> Result<u16, Error> {
    u16::try_from(section.len()).map_err(|_| Error::TooManyEntries(section.len()))
}

fn read_section<'a, T, F>(reader: &mut Reader<'a>, count: u16, read: F) -> Result<Vec<T>, Error>
where
    F: Fn(&mut Reader<'a>) -> Result<T, Error>,
{
    // a hostile count must not reserve more than the packet could hold
    let mut entries = Vec::with_capacity(usize::from(count).min(reader.remaining()));
    for _ in 0..count {
        entries.push(read(reader)?);
    }
    Ok(entries)
}

#[cfg(test)]
mod test {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use super::Message;
    use crate::dns_parser::{
        Class, Error, Flags, Name, Opcode, Query, RData, ResourceRecord, ResponseCode, Type,
    };

    fn name(text: &str) -> Name {
        Name::new(text).unwrap()
    }

    fn a_record(owner: &str, ip: Ipv4Addr) -> ResourceRecord {
        ResourceRecord::new(name(owner), Class::IN, 300, RData::A(Some(ip)))
    }

    #[test]
    fn build_query() {
        let mut message = Message::with_id(0x4849);
        message.set_flags(Flags::RD);
        message.add_query(Query::new(name("example.com"), Type::A, Class::IN));

        let bytes = message.to_bytes().unwrap();
        let result = b"HI\x01\x00\x00\x01\x00\x00\x00\x00\x00\x00\
                      \x07example\x03com\x00\x00\x01\x00\x01";
        assert_eq!(&bytes[..], &result[..]);

        let parsed = Message::parse(&bytes).unwrap();
        assert_eq!(parsed, message);
        assert!(parsed.flags().is_recursion_desired());
        assert_eq!(parsed.queries()[0].qname.as_str(), "example.com");
    }

    #[test]
    fn new_message_is_empty_standard_query() {
        let message = Message::new();
        assert_eq!(message.flags(), Flags::STANDARD_QUERY);
        assert_eq!(message.flags().opcode(), Opcode::StandardQuery);
        assert!(!message.flags().is_response());
        assert!(message.queries().is_empty());
        assert!(message.answers().is_empty());
        assert!(message.authorities().is_empty());
        assert!(message.additionals().is_empty());

        let bytes = message.to_bytes().unwrap();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[2..], &[0u8; 10][..]);
    }

    #[test]
    fn set_flags_accumulates() {
        let mut message = Message::with_id(1);
        message.set_flags(Flags::RD);
        message.set_flags(Flags::QR | Flags::AA);
        let flags = message.flags();
        assert!(flags.is_recursion_desired());
        assert!(flags.is_response());
        assert!(flags.is_authoritative());
        assert_eq!(flags.bits(), 0x8500);
    }

    // Two answers for the same owner, the second one using a pointer to the
    // first owner name at offset 12.
    const TWO_ANSWERS: &[u8] = b"\x12\x34\x81\x80\x00\x00\x00\x02\x00\x00\x00\x00\
        \x07example\x03com\x00\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x0a\x00\x00\x01\
        \xc0\x0c\x00\x01\x00\x01\x00\x00\x00\x3c\x00\x04\x0a\x00\x00\x02";

    #[test]
    fn parse_compressed_answers() {
        let message = Message::parse(TWO_ANSWERS).unwrap();
        assert_eq!(message.id(), 0x1234);
        assert!(message.flags().is_response());
        assert!(message.flags().is_recursion_available());
        assert_eq!(message.flags().response_code(), ResponseCode::NoError);
        let answers = message.answers();
        assert_eq!(answers.len(), 2);
        for (answer, last) in answers.iter().zip(1..) {
            assert_eq!(answer.name.as_str(), "example.com");
            assert_eq!(answer.ttl, 60);
            assert_eq!(answer.data, RData::A(Some(Ipv4Addr::new(10, 0, 0, last))));
        }
        assert_eq!(answers[0].name, answers[1].name);
    }

    #[test]
    fn compressed_encoding_matches_wire_sample() {
        let mut message = Message::with_id(0x1234);
        message.set_flags(Flags::QR | Flags::RD | Flags::RA);
        for last in 1..=2 {
            message.add_answer(ResourceRecord::new(
                name("example.com"),
                Class::IN,
                60,
                RData::A(Some(Ipv4Addr::new(10, 0, 0, last))),
            ));
        }
        assert_eq!(&message.to_compressed_bytes().unwrap()[..], TWO_ANSWERS);

        let plain = message.to_bytes().unwrap();
        assert_eq!(plain.len(), TWO_ANSWERS.len() + 11);
        assert_eq!(Message::parse(&plain).unwrap(), message);
    }

    #[test]
    fn truncated_anywhere_fails_with_truncated() {
        for len in 0..TWO_ANSWERS.len() {
            match Message::parse(&TWO_ANSWERS[..len]) {
                Err(Error::Truncated { .. }) => (),
                other => panic!("cut at {} gave {:?}", len, other),
            }
        }
    }

    #[test]
    fn counts_larger_than_content() {
        let mut bytes = TWO_ANSWERS.to_vec();
        bytes[11] = 1;
        assert!(matches!(Message::parse(&bytes), Err(Error::Truncated { .. })));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let mut bytes = TWO_ANSWERS.to_vec();
        bytes.extend_from_slice(b"\xde\xad");
        assert_eq!(Message::parse(&bytes).unwrap().answers().len(), 2);
    }

    #[test]
    fn full_response_roundtrip() {
        let mut message = Message::with_id(42);
        message.set_flags(Flags::QR | Flags::AA | Flags::RD);
        message.add_query(Query::new(name("example.com"), Type::All, Class::IN));
        message.add_answer(a_record("example.com", Ipv4Addr::new(93, 184, 216, 34)));
        message.add_answer(ResourceRecord::new(
            name("example.com"),
            Class::IN,
            300,
            RData::MX {
                preference: 10,
                exchange: name("mail.example.com"),
            },
        ));
        message.add_answer(ResourceRecord::new(
            name("example.com"),
            Class::IN,
            300,
            RData::txt(vec!["v=spf1 -all"]),
        ));
        message.add_authority(ResourceRecord::new(
            name("example.com"),
            Class::IN,
            3600,
            RData::SOA {
                primary: name("ns.example.com"),
                mailbox: name("hostmaster.example.com"),
                serial: 2024010101,
                refresh: 7200,
                retry: 3600,
                expire: 1209600,
                minimum: Some(300),
            },
        ));
        message.add_additional(ResourceRecord::new(
            name("mail.example.com"),
            Class::IN,
            300,
            RData::AAAA(Some(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1))),
        ));
        message.add_additional(ResourceRecord::new(
            name("example.com"),
            Class::CH,
            0,
            RData::Unknown {
                typ: Type::Unknown(65),
                data: vec![0, 1, 0],
            },
        ));

        let plain = message.to_bytes().unwrap();
        let compressed = message.to_compressed_bytes().unwrap();
        assert!(compressed.len() < plain.len());
        assert_eq!(&plain[4..12], b"\x00\x01\x00\x03\x00\x01\x00\x02");

        assert_eq!(Message::parse(&plain).unwrap(), message);
        assert_eq!(Message::parse(&compressed).unwrap(), message);
    }

    #[test]
    fn too_many_queries() {
        let mut message = Message::with_id(0);
        for _ in 0..=usize::from(u16::MAX) {
            message.add_query(Query::new(Name::root(), Type::A, Class::IN));
        }
        assert_eq!(message.to_bytes(), Err(Error::TooManyEntries(65536)));
    }

    #[test]
    fn opaque_answer_of_typed_record_is_rejected() {
        let mut message = Message::with_id(7);
        message.add_answer(ResourceRecord::new(
            name("example.com"),
            Class::IN,
            60,
            RData::Unknown {
                typ: Type::MX,
                data: vec![0, 10, 0],
            },
        ));
        assert_eq!(message.to_bytes(), Err(Error::OpaqueKnownType(Type::MX)));
        assert_eq!(
            message.to_compressed_bytes(),
            Err(Error::OpaqueKnownType(Type::MX))
        );
    }
}
