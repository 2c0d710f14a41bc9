//! Append-only log segment, the on-disk unit of a replicated log.
//!
//! A segment is a single bounded file holding up to `capacity` log entries
//! together with a fixed-size index table that gives constant-time random
//! access by raft index.
//!
//! # File Format
//!
//! ```text
//! +---------------------------+ offset 0
//! | Header (4 bytes)          |  version: u16 BE  (== 1)
//! |                           |  capacity: u16 BE
//! +---------------------------+ offset 4
//! | Index table               |  capacity x 24-byte slots:
//! |                           |    raft_index  : u64 BE
//! |                           |    raft_term   : u64 BE
//! |                           |    data_offset : u32 BE
//! |                           |    length      : u32 BE
//! |                           |    crc32       : u32 BE
//! |                           |  unwritten slots are all-zero
//! +---------------------------+ offset 4 + capacity*24 (= data_start)
//! | Data region               |  payloads concatenated in append order
//! +---------------------------+
//! ```
//!
//! Slots are positional: the i-th slot describes the i-th appended entry.
//! The index area is not pre-zeroed at creation; the file system fills the
//! gap with zeros as the data cursor advances past it, which is what makes
//! the all-zero slot a reliable end-of-records sentinel.
//!
//! Each append writes the payload into the data region first and the index
//! slot second. A slot whose payload never reached the disk is caught by
//! the recovery scan (data past end of file) or by CRC validation at read
//! time, never served silently.
//!
//! A segment has exactly one writer at a time and carries no internal
//! locking; any number of independent read-mode handles may read the same
//! file concurrently.

mod format;
mod recovery;

pub use format::{IndexRecord, SegmentHeader, HEADER_SIZE, INDEX_RECORD_SIZE, SEGMENT_VERSION};

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::options::{SegmentMode, SegmentOptions};
use crate::types::Entry;
use crate::util::crc::crc32;
use crate::{Error, Result};

/// A bounded, append-only log segment backed by a single file.
///
/// Opened in [`SegmentMode::Append`] it accepts entries until every index
/// slot is taken; opened in [`SegmentMode::Read`] it serves random-access
/// reads keyed by raft index. See the [module docs](self) for the on-disk
/// layout.
#[derive(Debug)]
pub struct Segment {
    /// Underlying file handle, exclusively owned by this state.
    file: File,
    /// Path the segment was opened at.
    path: PathBuf,
    /// Format version read from or written to the header.
    version: u16,
    /// Capacity frozen at creation.
    max_count: u16,
    /// Access mode.
    mode: SegmentMode,
    /// File offset of the next free index slot.
    index_offset: u64,
    /// File offset of the next payload write.
    data_offset: u64,
    /// First byte of the data region.
    data_start: u64,
    /// Raft-index lookup table (read mode only).
    index: Option<HashMap<u64, IndexRecord>>,
    /// Lowest and highest raft index recovered (read mode only).
    range: Option<(u64, u64)>,
}

impl Segment {
    /// Open a segment file.
    ///
    /// A non-existent path is created in append mode with
    /// `options.max_count` index slots; opening a non-existent path in read
    /// mode is an I/O error. An existing file is validated and its index
    /// recovered; the capacity in its header wins over `options.max_count`.
    pub fn open(path: impl Into<PathBuf>, options: SegmentOptions) -> Result<Segment> {
        options.validate()?;
        let path = path.into();

        if options.mode.is_append() && !path.exists() {
            Self::create(path, options.max_count)
        } else {
            Self::open_existing(path, options.mode)
        }
    }

    /// Create a fresh segment file and write its header.
    fn create(path: PathBuf, max_count: u16) -> Result<Segment> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        let mut buf = BytesMut::with_capacity(HEADER_SIZE);
        SegmentHeader::new(max_count).encode_to(&mut buf);
        file.write_all(&buf)?;

        let data_start = format::data_start(max_count);
        debug!(path = %path.display(), max_count, "created segment");

        Ok(Segment {
            file,
            path,
            version: SEGMENT_VERSION,
            max_count,
            mode: SegmentMode::Append,
            index_offset: HEADER_SIZE as u64,
            data_offset: data_start,
            data_start,
            index: None,
            range: None,
        })
    }

    /// Open an existing segment file and recover its index.
    fn open_existing(path: PathBuf, mode: SegmentMode) -> Result<Segment> {
        let mut file = match mode {
            SegmentMode::Append => OpenOptions::new().read(true).write(true).open(&path)?,
            SegmentMode::Read => OpenOptions::new().read(true).open(&path)?,
        };
        let file_size = file.metadata()?.len();

        if file_size < HEADER_SIZE as u64 {
            return Err(Error::corruption("segment file too small for header"));
        }

        let mut header_buf = [0u8; HEADER_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut header_buf)?;
        let header = SegmentHeader::decode(&mut &header_buf[..])?;

        let recovered = recovery::recover_index(&mut file, header.max_count, file_size)?;
        let index_offset = recovered.index_offset();
        let data_offset = recovered.next_data_offset;

        debug!(
            path = %path.display(),
            count = recovered.count,
            ?mode,
            "opened segment"
        );

        // The recovered mapping is only retained for reading; an appender
        // just needs its cursors.
        let (index, range) = match mode {
            SegmentMode::Read => {
                let range = recovered.range();
                (Some(recovered.index), range)
            }
            SegmentMode::Append => (None, None),
        };

        Ok(Segment {
            file,
            path,
            version: header.version,
            max_count: header.max_count,
            mode,
            index_offset,
            data_offset,
            data_start: format::data_start(header.max_count),
            index,
            range,
        })
    }

    /// Append an entry with the given raft index and term.
    ///
    /// Returns [`Error::SegmentFull`] without touching the file once every
    /// index slot is occupied; the caller is expected to roll over to a new
    /// segment. Raft indices are opaque here; keeping them monotonic across
    /// appends (rewinds excepted) is the caller's contract.
    ///
    /// Durability is explicit: an append is not on stable storage until a
    /// later [`sync`](Segment::sync) completes.
    pub fn append(&mut self, index: u64, term: u64, data: &[u8]) -> Result<()> {
        if !self.mode.is_append() {
            return Err(Error::NotAppendable);
        }
        if self.index_offset == self.data_start {
            return Err(Error::SegmentFull);
        }
        if data.len() as u64 > u32::MAX as u64 {
            return Err(Error::io(format!(
                "payload length {} exceeds the 32-bit length field",
                data.len()
            )));
        }
        let length = data.len() as u32;
        if self.data_offset + length as u64 > u32::MAX as u64 {
            return Err(Error::io(
                "segment data region exceeds the 32-bit offset field",
            ));
        }

        let record = IndexRecord::new(index, term, self.data_offset as u32, length, crc32(data));
        let mut slot = BytesMut::with_capacity(INDEX_RECORD_SIZE);
        record.encode_to(&mut slot);

        // Payload first, index slot second.
        self.file.seek(SeekFrom::Start(self.data_offset))?;
        self.file.write_all(data)?;
        self.file.seek(SeekFrom::Start(self.index_offset))?;
        self.file.write_all(&slot)?;

        self.index_offset += INDEX_RECORD_SIZE as u64;
        self.data_offset += length as u64;

        Ok(())
    }

    /// Read up to `count` entries starting at `start_index`.
    ///
    /// Raft indices in `[start_index, start_index + count)` that are not
    /// present in the segment are silently skipped; results come back in
    /// ascending raft-index order. Every returned payload is CRC-validated
    /// against its index record.
    pub fn read(&mut self, start_index: u64, count: usize) -> Result<Vec<Entry>> {
        let index = match &self.index {
            Some(index) => index,
            None => return Err(Error::NotReadable),
        };

        let end = start_index.saturating_add(count as u64);
        let mut located: Vec<IndexRecord> = Vec::new();
        for idx in start_index..end {
            if let Some(record) = index.get(&idx) {
                located.push(*record);
            }
        }

        let mut entries = Vec::with_capacity(located.len());
        for record in located {
            let mut payload = vec![0u8; record.length as usize];
            self.file.seek(SeekFrom::Start(record.offset as u64))?;
            self.file.read_exact(&mut payload)?;

            let actual = crc32(&payload);
            if actual != record.crc {
                return Err(Error::CrcMismatch {
                    expected: record.crc,
                    actual,
                });
            }

            entries.push(Entry {
                index: record.index,
                term: record.term,
                data: Bytes::from(payload),
            });
        }

        Ok(entries)
    }

    /// Force buffered writes and file metadata to durable storage.
    ///
    /// The only durability primitive this layer offers; callers must sync
    /// before telling external observers about appended entries.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Close the segment, releasing the file handle.
    ///
    /// Pending writes are not synced; call [`sync`](Segment::sync) first if
    /// durability is required. The on-disk file persists.
    pub fn close(self) -> Result<()> {
        drop(self.file);
        Ok(())
    }

    /// Path of the underlying file.
    pub fn filename(&self) -> &Path {
        &self.path
    }

    /// Format version from the header.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Maximum number of entries, frozen at creation.
    pub fn max_count(&self) -> u16 {
        self.max_count
    }

    /// Access mode this segment was opened with.
    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    /// Check if every index slot is occupied.
    pub fn is_full(&self) -> bool {
        self.index_offset == self.data_start
    }

    /// Number of free index slots left.
    pub fn remaining(&self) -> u16 {
        ((self.data_start - self.index_offset) / INDEX_RECORD_SIZE as u64) as u16
    }

    /// Lowest and highest raft index held by the segment.
    ///
    /// `None` in append mode (no index is retained) and for an empty
    /// segment.
    pub fn range(&self) -> Option<(u64, u64)> {
        self.range
    }
}
