//! Core types for raftlog.

use bytes::Bytes;

/// Monotonic log position assigned by the replicated-log layer.
pub type RaftIndex = u64;

/// Leader term under which an entry was appended.
pub type RaftTerm = u64;

/// A log entry returned by a segment read.
///
/// The payload is opaque to this layer; index and term are the coordinates
/// assigned by the replicated-log layer that wrote the entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Raft index of the entry.
    pub index: RaftIndex,
    /// Raft term of the entry.
    pub term: RaftTerm,
    /// Entry payload.
    pub data: Bytes,
}

impl Entry {
    /// Create a new entry.
    pub fn new(index: RaftIndex, term: RaftTerm, data: impl Into<Bytes>) -> Self {
        Self {
            index,
            term,
            data: data.into(),
        }
    }
}
