use std::collections::HashMap;

use byteorder::{BigEndian, ByteOrder};

use super::{Error, MAX_UDP_PAYLOAD};

/// Append-only big-endian serializer
///
/// A compressing writer additionally remembers where every name suffix was
/// written so that later occurrences can be replaced by a pointer.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
    names: Option<HashMap<Vec<u8>, u16>>,
}

impl Writer {
    pub fn new() -> Writer {
        Writer {
            buf: Vec::with_capacity(MAX_UDP_PAYLOAD),
            names: None,
        }
    }

    /// Creates a writer that emits compression pointers for repeated names
    pub fn compressing() -> Writer {
        Writer {
            buf: Vec::with_capacity(MAX_UDP_PAYLOAD),
            names: Some(HashMap::new()),
        }
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn put_u16(&mut self, value: u16) {
        let mut bytes = [0u8; 2];
        BigEndian::write_u16(&mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn put_u32(&mut self, value: u32) {
        let mut bytes = [0u8; 4];
        BigEndian::write_u32(&mut bytes, value);
        self.buf.extend_from_slice(&bytes);
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites two already written bytes at `offset`
    pub(crate) fn patch_u16(&mut self, offset: usize, value: u16) {
        BigEndian::write_u16(&mut self.buf[offset..offset + 2], value);
    }

    pub fn is_compressing(&self) -> bool {
        self.names.is_some()
    }

    /// Offset of an earlier name suffix with the given uncompressed encoding
    pub(crate) fn compressed_offset(&self, suffix: &[u8]) -> Option<u16> {
        self.names.as_ref()?.get(suffix).copied()
    }

    /// Records that `suffix` starts at `offset`. Offsets beyond the 14 bits
    /// a pointer can carry are not remembered.
    pub(crate) fn remember(&mut self, suffix: Vec<u8>, offset: usize) {
        if let Some(names) = self.names.as_mut() {
            if offset < 0x4000 {
                names.entry(suffix).or_insert(offset as u16);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Random-access big-endian deserializer over a borrowed packet
///
/// Every read is bounds checked against the usable length before any byte is
/// touched; running off the end yields [`Error::Truncated`].
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Reader<'a> {
        Reader { data, pos: 0 }
    }

    /// Reads only the first `len` bytes of `buf`, e.g. the filled part of a
    /// receive buffer.
    pub fn with_len(buf: &'a [u8], len: usize) -> Result<Reader<'a>, Error> {
        if len > buf.len() {
            return Err(Error::Truncated {
                offset: 0,
                wanted: len,
                len: buf.len(),
            });
        }
        Ok(Reader::new(&buf[..len]))
    }

    /// Usable length of the underlying packet
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn seek(&mut self, offset: usize) {
        self.pos = offset;
    }

    pub fn tell(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    fn take(&mut self, wanted: usize) -> Result<&'a [u8], Error> {
        let end = match self.pos.checked_add(wanted) {
            Some(end) if end <= self.data.len() => end,
            _ => {
                return Err(Error::Truncated {
                    offset: self.pos,
                    wanted,
                    len: self.data.len(),
                })
            }
        };
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn pop_byte(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(BigEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.take(len)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], Error> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }
}
