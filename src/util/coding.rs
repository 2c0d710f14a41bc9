//! Encoding utilities for fixed-width big-endian values.
//!
//! The segment format stores all integers in network byte order so files
//! are portable across implementations.

use bytes::{Buf, BufMut, BytesMut};

/// Encode a fixed 16-bit big-endian integer.
pub fn encode_fixed16(buf: &mut BytesMut, value: u16) {
    buf.put_u16(value);
}

/// Encode a fixed 32-bit big-endian integer.
pub fn encode_fixed32(buf: &mut BytesMut, value: u32) {
    buf.put_u32(value);
}

/// Encode a fixed 64-bit big-endian integer.
pub fn encode_fixed64(buf: &mut BytesMut, value: u64) {
    buf.put_u64(value);
}

/// Decode a fixed 16-bit big-endian integer.
pub fn decode_fixed16(buf: &mut &[u8]) -> Option<u16> {
    if buf.len() < 2 {
        return None;
    }
    Some(buf.get_u16())
}

/// Decode a fixed 32-bit big-endian integer.
pub fn decode_fixed32(buf: &mut &[u8]) -> Option<u32> {
    if buf.len() < 4 {
        return None;
    }
    Some(buf.get_u32())
}

/// Decode a fixed 64-bit big-endian integer.
pub fn decode_fixed64(buf: &mut &[u8]) -> Option<u64> {
    if buf.len() < 8 {
        return None;
    }
    Some(buf.get_u64())
}
