use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// The TYPE value of a resource record or question
///
/// Codes without a dedicated variant are carried through as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    All,
    Unknown(u16),
}

impl From<u16> for Type {
    fn from(code: u16) -> Type {
        match code {
            1 => Type::A,
            2 => Type::NS,
            5 => Type::CNAME,
            6 => Type::SOA,
            12 => Type::PTR,
            15 => Type::MX,
            16 => Type::TXT,
            28 => Type::AAAA,
            255 => Type::All,
            code => Type::Unknown(code),
        }
    }
}

impl From<Type> for u16 {
    fn from(typ: Type) -> u16 {
        match typ {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::PTR => 12,
            Type::MX => 15,
            Type::TXT => 16,
            Type::AAAA => 28,
            Type::All => 255,
            Type::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Type::A => f.write_str("A"),
            Type::NS => f.write_str("NS"),
            Type::CNAME => f.write_str("CNAME"),
            Type::SOA => f.write_str("SOA"),
            Type::PTR => f.write_str("PTR"),
            Type::MX => f.write_str("MX"),
            Type::TXT => f.write_str("TXT"),
            Type::AAAA => f.write_str("AAAA"),
            Type::All => f.write_str("ANY"),
            Type::Unknown(code) => write!(f, "TYPE{}", code),
        }
    }
}

/// The CLASS value of a resource record or question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    IN,
    CS,
    CH,
    HS,
    None,
    Any,
    Unknown(u16),
}

impl From<u16> for Class {
    fn from(code: u16) -> Class {
        match code {
            1 => Class::IN,
            2 => Class::CS,
            3 => Class::CH,
            4 => Class::HS,
            254 => Class::None,
            255 => Class::Any,
            code => Class::Unknown(code),
        }
    }
}

impl From<Class> for u16 {
    fn from(cls: Class) -> u16 {
        match cls {
            Class::IN => 1,
            Class::CS => 2,
            Class::CH => 3,
            Class::HS => 4,
            Class::None => 254,
            Class::Any => 255,
            Class::Unknown(code) => code,
        }
    }
}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Class::IN => f.write_str("IN"),
            Class::CS => f.write_str("CS"),
            Class::CH => f.write_str("CH"),
            Class::HS => f.write_str("HS"),
            Class::None => f.write_str("NONE"),
            Class::Any => f.write_str("ANY"),
            Class::Unknown(code) => write!(f, "CLASS{}", code),
        }
    }
}

/// The OPCODE sub-field of the header flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    StandardQuery,
    InverseQuery,
    ServerStatusRequest,
    Reserved(u8),
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Opcode {
        match code {
            0 => Opcode::StandardQuery,
            1 => Opcode::InverseQuery,
            2 => Opcode::ServerStatusRequest,
            code => Opcode::Reserved(code),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        match opcode {
            Opcode::StandardQuery => 0,
            Opcode::InverseQuery => 1,
            Opcode::ServerStatusRequest => 2,
            Opcode::Reserved(code) => code,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Opcode::StandardQuery => f.write_str("QUERY"),
            Opcode::InverseQuery => f.write_str("IQUERY"),
            Opcode::ServerStatusRequest => f.write_str("STATUS"),
            Opcode::Reserved(code) => write!(f, "OPCODE{}", code),
        }
    }
}

/// The RCODE sub-field of the header flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> ResponseCode {
        match code {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            code => ResponseCode::Reserved(code),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(rcode: ResponseCode) -> u8 {
        match rcode {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Reserved(code) => code,
        }
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ResponseCode::NoError => f.write_str("NOERROR"),
            ResponseCode::FormatError => f.write_str("FORMERR"),
            ResponseCode::ServerFailure => f.write_str("SERVFAIL"),
            ResponseCode::NameError => f.write_str("NXDOMAIN"),
            ResponseCode::NotImplemented => f.write_str("NOTIMP"),
            ResponseCode::Refused => f.write_str("REFUSED"),
            ResponseCode::Reserved(code) => write!(f, "RCODE{}", code),
        }
    }
}

/// The second 16-bit word of the header
///
/// Combine the named bits with `|`; read them back with the accessors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Flags(u16);

impl Flags {
    pub const QR: Flags = Flags(0b1000_0000_0000_0000);
    pub const OPCODE_MASK: Flags = Flags(0b0111_1000_0000_0000);
    pub const AA: Flags = Flags(0b0000_0100_0000_0000);
    pub const TC: Flags = Flags(0b0000_0010_0000_0000);
    pub const RD: Flags = Flags(0b0000_0001_0000_0000);
    pub const RA: Flags = Flags(0b0000_0000_1000_0000);
    pub const RCODE_MASK: Flags = Flags(0b0000_0000_0000_1111);

    pub const STANDARD_QUERY: Flags = Flags(0);
    pub const INVERSE_QUERY: Flags = Flags(1 << 11);
    pub const STATUS: Flags = Flags(2 << 11);

    const OPCODE_SHIFT: u16 = 11;

    pub const fn from_bits(bits: u16) -> Flags {
        Flags(bits)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_response(self) -> bool {
        self.contains(Flags::QR)
    }

    pub fn opcode(self) -> Opcode {
        Opcode::from(((self.0 & Flags::OPCODE_MASK.0) >> Flags::OPCODE_SHIFT) as u8)
    }

    /// Replaces the opcode sub-field
    ///
    /// Only the low 4 bits of the code fit the field, and the stored bits are
    /// what `opcode()` reports back: `Reserved(1)` reads as `InverseQuery`,
    /// `Reserved(19)` as `Reserved(3)`.
    pub fn with_opcode(self, opcode: Opcode) -> Flags {
        let bits = (u16::from(u8::from(opcode)) << Flags::OPCODE_SHIFT) & Flags::OPCODE_MASK.0;
        Flags((self.0 & !Flags::OPCODE_MASK.0) | bits)
    }

    pub fn is_authoritative(self) -> bool {
        self.contains(Flags::AA)
    }

    pub fn is_truncated(self) -> bool {
        self.contains(Flags::TC)
    }

    pub fn is_recursion_desired(self) -> bool {
        self.contains(Flags::RD)
    }

    pub fn is_recursion_available(self) -> bool {
        self.contains(Flags::RA)
    }

    pub fn response_code(self) -> ResponseCode {
        ResponseCode::from((self.0 & Flags::RCODE_MASK.0) as u8)
    }

    /// Replaces the response code sub-field, keeping the low 4 bits of the code
    pub fn with_response_code(self, rcode: ResponseCode) -> Flags {
        let bits = u16::from(u8::from(rcode)) & Flags::RCODE_MASK.0;
        Flags((self.0 & !Flags::RCODE_MASK.0) | bits)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl From<u16> for Flags {
    fn from(bits: u16) -> Flags {
        Flags(bits)
    }
}

impl From<Flags> for u16 {
    fn from(flags: Flags) -> u16 {
        flags.0
    }
}
