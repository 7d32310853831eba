//! Compact binary codec used for every persisted contract value.
//!
//! All integers are written big-endian. Strings and vectors carry a u16
//! length prefix, options a one-byte tag.

use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Not enough bytes available: need {need}, have {have}")]
    NotEnoughBytes { need: usize, have: usize },

    #[error("Invalid value encountered")]
    InvalidValue,

    #[error("Invalid UTF-8 string")]
    InvalidString(#[from] FromUtf8Error),
}

/// Writer accumulating the encoded representation into a byte buffer.
pub struct Writer<'a> {
    bytes: &'a mut Vec<u8>,
}

impl<'a> Writer<'a> {
    pub fn new(bytes: &'a mut Vec<u8>) -> Self {
        Writer { bytes }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.bytes.push(u8::from(value));
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_u16(&mut self, value: &u16) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u64(&mut self, value: &u64) {
        self.bytes.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        // Length is capped by the u16 prefix, callers validate above this
        self.write_u16(&(value.len() as u16));
        self.write_bytes(value.as_bytes());
    }

    pub fn total_write(&self) -> usize {
        self.bytes.len()
    }
}

/// Reader walking over an encoded byte slice.
pub struct Reader<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, total: 0 }
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8], ReaderError> {
        if self.bytes.len() < count {
            return Err(ReaderError::NotEnoughBytes {
                need: count,
                have: self.bytes.len(),
            });
        }
        let (taken, rest) = self.bytes.split_at(count);
        self.bytes = rest;
        self.total += count;
        Ok(taken)
    }

    pub fn read<T: Serializer>(&mut self) -> Result<T, ReaderError> {
        T::read(self)
    }

    pub fn read_bool(&mut self) -> Result<bool, ReaderError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReaderError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, ReaderError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, ReaderError> {
        let bytes = self.take(8)?;
        let mut buffer = [0u8; 8];
        buffer.copy_from_slice(bytes);
        Ok(u64::from_be_bytes(buffer))
    }

    pub fn read_bytes_32(&mut self) -> Result<[u8; 32], ReaderError> {
        let bytes = self.take(32)?;
        let mut buffer = [0u8; 32];
        buffer.copy_from_slice(bytes);
        Ok(buffer)
    }

    pub fn read_string(&mut self) -> Result<String, ReaderError> {
        let len = self.read_u16()? as usize;
        let bytes = self.take(len)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Total number of bytes consumed so far
    pub fn total_read(&self) -> usize {
        self.total
    }

    /// Number of bytes left in the input
    pub fn remaining(&self) -> usize {
        self.bytes.len()
    }
}

pub trait Serializer: Sized {
    fn write(&self, writer: &mut Writer);

    fn read(reader: &mut Reader) -> Result<Self, ReaderError>;

    fn size(&self) -> usize;

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());
        let mut writer = Writer::new(&mut bytes);
        self.write(&mut writer);
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, ReaderError> {
        let mut reader = Reader::new(bytes);
        Self::read(&mut reader)
    }
}

impl Serializer for bool {
    fn write(&self, writer: &mut Writer) {
        writer.write_bool(*self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_bool()
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serializer for u8 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u8(*self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u8()
    }

    fn size(&self) -> usize {
        1
    }
}

impl Serializer for u16 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u16(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u16()
    }

    fn size(&self) -> usize {
        2
    }
}

impl Serializer for u64 {
    fn write(&self, writer: &mut Writer) {
        writer.write_u64(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_u64()
    }

    fn size(&self) -> usize {
        8
    }
}

impl Serializer for String {
    fn write(&self, writer: &mut Writer) {
        writer.write_string(self);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        reader.read_string()
    }

    fn size(&self) -> usize {
        2 + self.len()
    }
}

impl<T: Serializer> Serializer for Option<T> {
    fn write(&self, writer: &mut Writer) {
        match self {
            Some(value) => {
                writer.write_bool(true);
                value.write(writer);
            }
            None => writer.write_bool(false),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        if reader.read_bool()? {
            Ok(Some(T::read(reader)?))
        } else {
            Ok(None)
        }
    }

    fn size(&self) -> usize {
        1 + self.as_ref().map_or(0, |value| value.size())
    }
}

impl<T: Serializer> Serializer for Vec<T> {
    fn write(&self, writer: &mut Writer) {
        writer.write_u16(&(self.len() as u16));
        for item in self {
            item.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let count = reader.read_u16()? as usize;
        let mut items = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            items.push(T::read(reader)?);
        }
        Ok(items)
    }

    fn size(&self) -> usize {
        2 + self.iter().map(Serializer::size).sum::<usize>()
    }
}
