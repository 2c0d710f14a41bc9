//! Segment file naming conventions.
//!
//! Segments belonging to one log directory are numbered files named
//! `NNNNNNNN.segment`; the write-ahead log layer allocates numbers
//! monotonically as it rolls full segments over.

use std::path::{Path, PathBuf};

/// File extension for segment files.
pub const SEGMENT_EXTENSION: &str = "segment";

/// Generate a segment file path.
pub fn segment_file_path(dir: &Path, number: u64) -> PathBuf {
    dir.join(format!("{:08}.{}", number, SEGMENT_EXTENSION))
}

/// Parse a segment file name and return its number.
///
/// Returns `None` if the file name doesn't match the segment pattern.
pub fn parse_segment_file_name(name: &str) -> Option<u64> {
    let stem = name.strip_suffix(".segment")?;
    stem.parse::<u64>().ok()
}

/// List all segment file numbers in a directory, sorted ascending.
pub fn list_segment_files(dir: &Path) -> std::io::Result<Vec<u64>> {
    let mut numbers = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();

        if let Some(number) = parse_segment_file_name(&name) {
            numbers.push(number);
        }
    }

    numbers.sort_unstable();
    Ok(numbers)
}

/// Get the file size.
pub fn file_size(path: &Path) -> std::io::Result<u64> {
    Ok(std::fs::metadata(path)?.len())
}

/// Sync a directory to ensure file creations are durable.
pub fn sync_dir(path: &Path) -> std::io::Result<()> {
    let dir = std::fs::File::open(path)?;
    dir.sync_all()
}
