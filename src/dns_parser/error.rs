use thiserror::Error;

use super::Type;

/// Error encoding or decoding a DNS packet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("packet is truncated: {wanted} byte(s) at offset {offset} exceed length {len}")]
    Truncated {
        offset: usize,
        wanted: usize,
        len: usize,
    },
    #[error("malformed packet: {0}")]
    Malformed(#[from] Malformed),
    #[error("label {0:?} is longer than 63 bytes")]
    LabelTooLong(String),
    #[error("name {0:?} contains an empty label")]
    EmptyLabel(String),
    #[error("name {0:?} is longer than 255 bytes on the wire")]
    NameTooLong(String),
    #[error("character string of {0} bytes does not fit a length byte")]
    CharacterStringTooLong(usize),
    #[error("record data of {0} bytes does not fit rdlength")]
    RdataTooLong(usize),
    #[error("section has {0} entries, more than a header count can hold")]
    TooManyEntries(usize),
    #[error("opaque record data given for {0}, which has its own variant")]
    OpaqueKnownType(Type),
}

/// Ways in which wire data can be structurally invalid
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Malformed {
    #[error("compression pointer to {target} is outside the packet")]
    PointerOutOfBounds { target: usize },
    #[error("compression pointer at {at} to {target} does not point backwards")]
    PointerNotBackward { at: usize, target: usize },
    #[error("label at {at} has reserved type bits {byte:#04x}")]
    ReservedLabelType { at: usize, byte: u8 },
    #[error("name exceeds 255 bytes")]
    NameTooLong,
    #[error("label at {0} is not valid UTF-8")]
    LabelNotUtf8(usize),
    #[error("record data declares {declared} bytes but {consumed} were parsed")]
    RdataLength { declared: usize, consumed: usize },
    #[error("character string of {len} bytes overruns {remaining} remaining rdata bytes")]
    CharacterStringOverrun { len: usize, remaining: usize },
}
