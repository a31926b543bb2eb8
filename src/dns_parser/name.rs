use std::fmt;
use std::str::{from_utf8, FromStr};

use super::{Error, Malformed, Reader, Writer, MAX_LABEL_LEN, MAX_NAME_LEN};

/// Byte range of one label inside the owned name string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Label {
    start: usize,
    len: usize,
}

/// A domain name
///
/// Holds the dotted text form together with the span of every label in it.
/// Spans come either from splitting the text at dots or, for decoded names,
/// straight from the wire, so a label received with an embedded dot keeps
/// its original boundaries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Name {
    name: String,
    labels: Vec<Label>,
}

impl Name {
    /// Parses a dotted name
    ///
    /// A single trailing dot is dropped; `""` and `"."` are the root. Labels
    /// must be non-empty and at most 63 bytes, and the whole name must fit
    /// 255 bytes on the wire.
    pub fn new<T: Into<String>>(name: T) -> Result<Name, Error> {
        let mut name = name.into();
        if name.ends_with('.') {
            name.pop();
        }

        let mut labels = Vec::new();
        if !name.is_empty() {
            let mut start = 0;
            for part in name.split('.') {
                if part.is_empty() {
                    return Err(Error::EmptyLabel(name.clone()));
                }
                if part.len() > MAX_LABEL_LEN {
                    return Err(Error::LabelTooLong(part.to_owned()));
                }
                labels.push(Label {
                    start,
                    len: part.len(),
                });
                start += part.len() + 1;
            }
        }

        let name = Name { name, labels };
        if name.encoded_size() > MAX_NAME_LEN {
            return Err(Error::NameTooLong(name.name));
        }
        Ok(name)
    }

    pub fn root() -> Name {
        Name::default()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.labels
            .iter()
            .map(move |label| &self.name[label.start..label.start + label.len])
    }

    /// Uncompressed wire size, terminating zero byte included
    pub fn encoded_size(&self) -> usize {
        self.labels.iter().map(|label| label.len + 1).sum::<usize>() + 1
    }

    /// Uncompressed encoding of the labels from `index` to the end
    fn wire_suffix(&self, index: usize) -> Vec<u8> {
        let mut suffix = Vec::new();
        for label in &self.labels[index..] {
            suffix.push(label.len as u8);
            suffix.extend_from_slice(self.name[label.start..label.start + label.len].as_bytes());
        }
        suffix
    }

    pub fn write_to(&self, writer: &mut Writer) {
        for (index, label) in self.labels.iter().enumerate() {
            if writer.is_compressing() {
                let suffix = self.wire_suffix(index);
                if let Some(offset) = writer.compressed_offset(&suffix) {
                    writer.put_u16(0xC000 | offset);
                    return;
                }
                let offset = writer.len();
                writer.remember(suffix, offset);
            }
            writer.put_u8(label.len as u8);
            writer.put_bytes(self.name[label.start..label.start + label.len].as_bytes());
        }
        writer.put_u8(0);
    }

    /// Decodes a name at the reader position, following compression pointers
    ///
    /// Pointers must target an offset strictly before the pointer itself and
    /// the decoded name may not exceed 255 wire bytes, so every input either
    /// terminates or fails. When a pointer was followed the reader is left
    /// right after the first pointer, otherwise after the terminating zero.
    pub fn read_from(reader: &mut Reader) -> Result<Name, Error> {
        let mut name = String::new();
        let mut labels = Vec::new();
        let mut budget = MAX_NAME_LEN;
        let mut resume = None;

        loop {
            let at = reader.tell();
            let byte = reader.pop_byte()?;
            match byte & 0b1100_0000 {
                0b1100_0000 => {
                    let low = reader.pop_byte()?;
                    let target = (usize::from(byte & 0b0011_1111) << 8) | usize::from(low);
                    if target >= reader.len() {
                        return Err(Malformed::PointerOutOfBounds { target }.into());
                    }
                    if target >= at {
                        return Err(Malformed::PointerNotBackward { at, target }.into());
                    }
                    if resume.is_none() {
                        resume = Some(reader.tell());
                    }
                    reader.seek(target);
                }
                0 if byte == 0 => {
                    if budget == 0 {
                        return Err(Malformed::NameTooLong.into());
                    }
                    break;
                }
                0 => {
                    let len = usize::from(byte);
                    budget = budget
                        .checked_sub(len + 1)
                        .ok_or(Malformed::NameTooLong)?;
                    let bytes = reader.read_bytes(len)?;
                    let label = from_utf8(bytes).map_err(|_| Malformed::LabelNotUtf8(at))?;
                    if !labels.is_empty() {
                        name.push('.');
                    }
                    labels.push(Label {
                        start: name.len(),
                        len,
                    });
                    name.push_str(label);
                }
                _ => return Err(Malformed::ReservedLabelType { at, byte }.into()),
            }
        }

        if let Some(resume) = resume {
            reader.seek(resume);
        }
        Ok(Name { name, labels })
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(name: &str) -> Result<Name, Error> {
        Name::new(name)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.is_root() {
            fmt.write_str(".")
        } else {
            fmt.write_str(&self.name)
        }
    }
}
