//! Index reconstruction for existing segment files.
//!
//! Recovery reads the pre-reserved index table and rebuilds the in-memory
//! state a crashed or closed writer left behind. The scan stops at the
//! first all-zero slot (never written) and at the first slot whose payload
//! bytes lie beyond the end of the file (written but never flushed); a
//! zero-length record has no payload bytes to lose and is always kept.

use std::collections::HashMap;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use tracing::{debug, warn};

use super::format::{self, IndexRecord, HEADER_SIZE, INDEX_RECORD_SIZE};
use crate::Result;

/// Outcome of scanning a segment's index table.
#[derive(Debug)]
pub(crate) struct RecoveredIndex {
    /// Number of occupied index slots.
    pub count: usize,
    /// File offset where the next payload write lands.
    pub next_data_offset: u64,
    /// Mapping from raft index to its index record.
    pub index: HashMap<u64, IndexRecord>,
    /// Lowest raft index in the map.
    pub first_index: Option<u64>,
    /// Highest raft index in the map.
    pub last_index: Option<u64>,
}

impl RecoveredIndex {
    fn empty(max_count: u16) -> Self {
        Self {
            count: 0,
            next_data_offset: format::data_start(max_count),
            index: HashMap::new(),
            first_index: None,
            last_index: None,
        }
    }

    /// File offset of the first free index slot.
    pub fn index_offset(&self) -> u64 {
        HEADER_SIZE as u64 + (self.count * INDEX_RECORD_SIZE) as u64
    }

    /// Lowest and highest raft index recovered, if any.
    pub fn range(&self) -> Option<(u64, u64)> {
        self.first_index.zip(self.last_index)
    }
}

/// Rebuild the index of an existing segment file with capacity `max_count`.
///
/// Tolerates torn trailing slots and deliberate rewinds by higher layers
/// that re-append at a lower raft index without rewriting earlier slots.
pub(crate) fn recover_index(
    file: &mut File,
    max_count: u16,
    file_size: u64,
) -> Result<RecoveredIndex> {
    let table_len = max_count as usize * INDEX_RECORD_SIZE;
    let mut table = vec![0u8; table_len];

    file.seek(SeekFrom::Start(HEADER_SIZE as u64))?;
    let available = read_full(file, &mut table)?;
    if available == 0 {
        // Header-only file: nothing has ever been appended.
        return Ok(RecoveredIndex::empty(max_count));
    }

    let mut recovered = RecoveredIndex::empty(max_count);
    let mut last_index = 0u64;

    for slot in table[..available].chunks_exact(INDEX_RECORD_SIZE) {
        if IndexRecord::is_blank(slot) {
            // First unwritten slot; appends advance slots monotonically, so
            // everything after it is unwritten too.
            break;
        }

        let record = IndexRecord::decode(&mut &slot[..])?;

        // A zero-length record owns no data bytes, so only records with a
        // payload can be torn.
        if record.length > 0 && record.end() > file_size {
            warn!(
                index = record.index,
                offset = record.offset,
                length = record.length,
                "index slot references data past end of file, stopping scan"
            );
            break;
        }

        if record.index < last_index {
            // The writer rewound to re-append at a lower raft index. Slots
            // above the resumption point are stale.
            let resume = record.index + 1;
            debug!(rewind_to = record.index, "rewind detected in index table");
            recovered.index.retain(|&key, _| key <= resume);
            // Surviving keys are bounded by the resumption point.
            recovered.last_index = if recovered.index.contains_key(&resume) {
                Some(resume)
            } else {
                Some(record.index)
            };
        } else {
            recovered.last_index = Some(record.index);
        }
        recovered.first_index = Some(
            recovered
                .first_index
                .map_or(record.index, |first| first.min(record.index)),
        );

        last_index = record.index;
        recovered.next_data_offset = record.end();
        recovered.count += 1;
        recovered.index.insert(record.index, record);
    }

    debug!(
        count = recovered.count,
        next_data_offset = recovered.next_data_offset,
        "recovered segment index"
    );

    Ok(recovered)
}

/// Read as many bytes as the file still holds, up to `buf.len()`.
fn read_full(file: &mut File, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
