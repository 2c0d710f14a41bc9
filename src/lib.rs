//! # raftlog
//!
//! Append-only log segment storage for a Raft-style replicated log.
//!
//! A [`Segment`] is a single bounded file holding a contiguous run of log
//! entries plus a fixed-size index table for constant-time random access
//! by raft index. It is the durable building block a write-ahead log rolls
//! over as segments fill up.
//!
//! ## Features
//!
//! - **Bounded appends**: capacity is frozen in the file header; a full
//!   segment rejects further appends so the caller can roll over
//! - **Crash recovery**: reopening a segment rebuilds its index from the
//!   on-disk table, tolerating torn trailing writes and rewinds
//! - **Checksummed reads**: every payload is CRC32-validated against its
//!   index record
//! - **Explicit durability**: appends never sync implicitly; `sync` is the
//!   single durability primitive
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use raftlog::{Segment, SegmentOptions};
//!
//! // Write side
//! let mut segment = Segment::open("00000001.segment", SegmentOptions::append())?;
//! segment.append(1, 1, b"put k1 v1")?;
//! segment.append(2, 1, b"put k2 v2")?;
//! segment.sync()?;
//! segment.close()?;
//!
//! // Read side
//! let mut segment = Segment::open("00000001.segment", SegmentOptions::read())?;
//! for entry in segment.read(1, 2)? {
//!     println!("{}@{}: {:?}", entry.index, entry.term, entry.data);
//! }
//! ```
//!
//! A segment has a single writer and no internal locking; serializing
//! appends is the caller's responsibility. Independent read-mode handles
//! may share a file freely.

// Public modules
pub mod error;
pub mod options;
pub mod types;

// Internal modules
mod segment;
mod util;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use options::{SegmentMode, SegmentOptions, DEFAULT_MAX_COUNT};
pub use types::{Entry, RaftIndex, RaftTerm};

// Segment file naming helpers for multi-segment log directories
pub use util::filename;

// Segment and its on-disk format
pub use segment::{
    IndexRecord, Segment, SegmentHeader, HEADER_SIZE, INDEX_RECORD_SIZE, SEGMENT_VERSION,
};
