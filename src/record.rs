//! Length-prefixed, self-describing records.
//!
//! A record is the unit of storage in every register and session region:
//! a little-endian `u32` length, a one-byte kind tag, then the payload.
//! The length counts the kind byte and the payload, so a buffer of
//! records can be scanned front to back with no side index.
//!
//! Records are either atomic typed values (`Int`, `Str`, `Blob`) or
//! `Bundle`s whose payload is itself a concatenation of encoded records.

use crate::error::{Result, VmError};
use byteorder::{ByteOrder, LittleEndian};

/// Bytes of framing per record: `u32` length prefix plus the kind tag.
pub const HEADER_LEN: usize = 5;

/// The kind tag of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordKind {
    /// Payload is a concatenation of encoded records.
    Bundle = 1,
    /// Payload is a little-endian `i32`.
    Int = 2,
    /// Payload is UTF-8 text.
    Str = 3,
    /// Payload is opaque bytes.
    Blob = 4,
}

impl RecordKind {
    /// Decode a kind tag byte.
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Bundle),
            2 => Some(Self::Int),
            3 => Some(Self::Str),
            4 => Some(Self::Blob),
            _ => None,
        }
    }
}

/// A single self-describing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    kind: RecordKind,
    payload: Vec<u8>,
}

impl Record {
    /// Create a bundle record from child records, preserving their order.
    #[must_use]
    pub fn bundle<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Record>,
    {
        let mut payload = Vec::new();
        for child in children {
            child.encode_into(&mut payload);
        }
        Self {
            kind: RecordKind::Bundle,
            payload,
        }
    }

    /// Create a bundle record directly from already-encoded child bytes.
    #[must_use]
    pub(crate) fn bundle_from_encoded(payload: Vec<u8>) -> Self {
        Self {
            kind: RecordKind::Bundle,
            payload,
        }
    }

    /// Create an integer record.
    #[must_use]
    pub fn int(value: i32) -> Self {
        let mut payload = vec![0u8; 4];
        LittleEndian::write_i32(&mut payload, value);
        Self {
            kind: RecordKind::Int,
            payload,
        }
    }

    /// Create a string record.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Str,
            payload: value.into().into_bytes(),
        }
    }

    /// Create a blob record from raw bytes.
    #[must_use]
    pub fn blob(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            kind: RecordKind::Blob,
            payload: bytes.into(),
        }
    }

    /// The record's kind tag.
    #[must_use]
    pub const fn kind(&self) -> RecordKind {
        self.kind
    }

    /// The raw payload bytes (excluding framing).
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Total encoded size including framing.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.payload.len()
    }

    /// Append the encoded record to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        let mut header = [0u8; HEADER_LEN];
        LittleEndian::write_u32(&mut header[..4], (self.payload.len() + 1) as u32);
        header[4] = self.kind as u8;
        out.extend_from_slice(&header);
        out.extend_from_slice(&self.payload);
    }

    /// Encode the record into a fresh byte vector.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Parse exactly one record from the front of `bytes`.
    ///
    /// Returns the record and the number of bytes it consumed.
    ///
    /// # Errors
    /// `E004` if the header is truncated, the kind tag is unknown, or the
    /// declared length does not fit in `bytes`.
    pub fn parse(bytes: &[u8]) -> Result<(Record, usize)> {
        let total = encoded_len_at(bytes, 0)?;
        let kind_tag = bytes[4];
        let kind = RecordKind::from_u8(kind_tag).ok_or_else(|| VmError::CorruptRecord {
            offset: 0,
            cause: format!("unknown kind tag 0x{:02x}", kind_tag),
        })?;
        Ok((
            Record {
                kind,
                payload: bytes[HEADER_LEN..total].to_vec(),
            },
            total,
        ))
    }

    /// Decode all records from a concatenation of encoded records.
    ///
    /// # Errors
    /// `E004` if any record fails to parse or trailing bytes remain.
    pub fn parse_all(mut bytes: &[u8]) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        while !bytes.is_empty() {
            let (record, consumed) = Record::parse(bytes)?;
            records.push(record);
            bytes = &bytes[consumed..];
        }
        Ok(records)
    }

    /// Decode a bundle's children.
    ///
    /// # Errors
    /// `E004` if the record is not a bundle or its payload is malformed.
    pub fn children(&self) -> Result<Vec<Record>> {
        if self.kind != RecordKind::Bundle {
            return Err(VmError::CorruptRecord {
                offset: 0,
                cause: format!("expected bundle, found {:?}", self.kind),
            });
        }
        Record::parse_all(&self.payload)
    }

    /// Interpret the payload as an `i32`, if this is an integer record.
    #[must_use]
    pub fn as_int(&self) -> Option<i32> {
        if self.kind == RecordKind::Int && self.payload.len() == 4 {
            Some(LittleEndian::read_i32(&self.payload))
        } else {
            None
        }
    }

    /// Interpret the payload as UTF-8 text, if this is a string record.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if self.kind == RecordKind::Str {
            std::str::from_utf8(&self.payload).ok()
        } else {
            None
        }
    }
}

/// Total encoded length of the record beginning at `offset`, validated to
/// lie entirely within `bytes`.
///
/// # Errors
/// `E004` if the header is truncated or the declared length overruns.
pub(crate) fn encoded_len_at(bytes: &[u8], offset: usize) -> Result<usize> {
    let remaining = bytes.len().saturating_sub(offset);
    if remaining < HEADER_LEN {
        return Err(VmError::CorruptRecord {
            offset,
            cause: format!("truncated header: {} bytes remaining", remaining),
        });
    }
    let body = LittleEndian::read_u32(&bytes[offset..offset + 4]) as usize;
    if body == 0 {
        return Err(VmError::CorruptRecord {
            offset,
            cause: "zero-length record body".to_string(),
        });
    }
    let total = 4 + body;
    if total > remaining {
        return Err(VmError::CorruptRecord {
            offset,
            cause: format!("declared length {} overruns {} remaining bytes", total, remaining),
        });
    }
    Ok(total)
}
