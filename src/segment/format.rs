//! On-disk encoding of the segment header and index records.

use bytes::BytesMut;

use crate::util::coding::{
    decode_fixed16, decode_fixed32, decode_fixed64, encode_fixed16, encode_fixed32, encode_fixed64,
};
use crate::{Error, Result};

/// Segment format version written to every header.
pub const SEGMENT_VERSION: u16 = 1;

/// Header size: version (2) + capacity (2).
pub const HEADER_SIZE: usize = 4;

/// Index record size: index (8) + term (8) + offset (4) + length (4) + crc (4).
pub const INDEX_RECORD_SIZE: usize = 28;

/// First byte of the data region for a segment with the given capacity.
///
/// Constant for the life of the file: the index table is pre-reserved in
/// full even while its slots are still unwritten.
pub fn data_start(max_count: u16) -> u64 {
    HEADER_SIZE as u64 + max_count as u64 * INDEX_RECORD_SIZE as u64
}

/// The 4-byte segment file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// Format version.
    pub version: u16,
    /// Maximum number of entries, frozen at creation.
    pub max_count: u16,
}

impl SegmentHeader {
    /// Create a header for a new segment.
    pub fn new(max_count: u16) -> Self {
        Self {
            version: SEGMENT_VERSION,
            max_count,
        }
    }

    /// Encode to buffer (fixed 4 bytes, big-endian).
    pub fn encode_to(&self, buf: &mut BytesMut) {
        encode_fixed16(buf, self.version);
        encode_fixed16(buf, self.max_count);
    }

    /// Decode from buffer, validating the version.
    pub fn decode(data: &mut &[u8]) -> Result<Self> {
        let version =
            decode_fixed16(data).ok_or_else(|| Error::corruption("segment header too short"))?;
        let max_count =
            decode_fixed16(data).ok_or_else(|| Error::corruption("segment header too short"))?;

        if version != SEGMENT_VERSION {
            return Err(Error::InvalidSegmentVersion(version));
        }

        Ok(Self { version, max_count })
    }
}

/// A single 24-byte slot of the index table.
///
/// Slots are positional: the i-th slot describes the i-th appended entry,
/// not raft index i.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
    /// Raft index of the entry.
    pub index: u64,
    /// Raft term of the entry.
    pub term: u64,
    /// Payload offset within the file.
    pub offset: u32,
    /// Payload length in bytes.
    pub length: u32,
    /// CRC32 of the payload.
    pub crc: u32,
}

impl IndexRecord {
    /// Create a new index record.
    pub fn new(index: u64, term: u64, offset: u32, length: u32, crc: u32) -> Self {
        Self {
            index,
            term,
            offset,
            length,
            crc,
        }
    }

    /// Encode to buffer (fixed 24 bytes, big-endian).
    pub fn encode_to(&self, buf: &mut BytesMut) {
        encode_fixed64(buf, self.index);
        encode_fixed64(buf, self.term);
        encode_fixed32(buf, self.offset);
        encode_fixed32(buf, self.length);
        encode_fixed32(buf, self.crc);
    }

    /// Decode from buffer.
    pub fn decode(data: &mut &[u8]) -> Result<Self> {
        let short = || Error::corruption("index record too short");

        Ok(Self {
            index: decode_fixed64(data).ok_or_else(short)?,
            term: decode_fixed64(data).ok_or_else(short)?,
            offset: decode_fixed32(data).ok_or_else(short)?,
            length: decode_fixed32(data).ok_or_else(short)?,
            crc: decode_fixed32(data).ok_or_else(short)?,
        })
    }

    /// Check if a raw slot is the all-zero "unwritten" sentinel.
    ///
    /// A real record always has `offset >= data_start > 0`, so an all-zero
    /// slot cannot be confused with written data.
    pub fn is_blank(slot: &[u8]) -> bool {
        slot.iter().all(|&b| b == 0)
    }

    /// File offset one past the payload.
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}
