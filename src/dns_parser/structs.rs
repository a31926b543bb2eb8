use super::{Class, Error, Name, RData, Reader, Type, Writer};

/// A single entry of the question section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub qname: Name,
    pub qtype: Type,
    pub qclass: Class,
}

impl Query {
    pub fn new(qname: Name, qtype: Type, qclass: Class) -> Query {
        Query {
            qname,
            qtype,
            qclass,
        }
    }

    pub fn write_to(&self, writer: &mut Writer) {
        self.qname.write_to(writer);
        writer.put_u16(self.qtype.into());
        writer.put_u16(self.qclass.into());
    }

    pub fn read_from(reader: &mut Reader) -> Result<Query, Error> {
        Ok(Query {
            qname: Name::read_from(reader)?,
            qtype: Type::from(reader.read_u16()?),
            qclass: Class::from(reader.read_u16()?),
        })
    }
}

/// A single DNS record
///
/// The record type is not stored separately; it is the type of `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: Name,
    pub cls: Class,
    pub ttl: u32,
    pub data: RData,
}

impl ResourceRecord {
    pub fn new(name: Name, cls: Class, ttl: u32, data: RData) -> ResourceRecord {
        ResourceRecord {
            name,
            cls,
            ttl,
            data,
        }
    }

    pub fn typ(&self) -> Type {
        self.data.typ()
    }

    /// Writes the record; `rdlength` is filled in once the payload is
    /// written, so it matches what a compressing writer actually emitted.
    pub fn write_to(&self, writer: &mut Writer) -> Result<(), Error> {
        self.name.write_to(writer);
        writer.put_u16(self.typ().into());
        writer.put_u16(self.cls.into());
        writer.put_u32(self.ttl);

        let size_offset = writer.len();
        writer.put_u16(0);

        let data_offset = writer.len();
        self.data.write_to(writer)?;
        let data_size = writer.len() - data_offset;
        if data_size > usize::from(u16::MAX) {
            return Err(Error::RdataTooLong(data_size));
        }

        writer.patch_u16(size_offset, data_size as u16);
        Ok(())
    }

    pub fn read_from(reader: &mut Reader) -> Result<ResourceRecord, Error> {
        let name = Name::read_from(reader)?;
        let typ = Type::from(reader.read_u16()?);
        let cls = Class::from(reader.read_u16()?);
        let ttl = reader.read_u32()?;
        let rdlength = usize::from(reader.read_u16()?);
        let data = RData::parse(typ, rdlength, reader)?;
        Ok(ResourceRecord {
            name,
            cls,
            ttl,
            data,
        })
    }
}
