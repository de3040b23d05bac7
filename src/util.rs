//! Private utility module
use std::convert::TryFrom;
use std::path::Path;

/// Gzip stream magic bytes.
const GZ_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Whether the given leading bytes belong to a gzip stream.
pub fn is_gz_stream(head: &[u8]) -> bool {
    head.len() >= 2 && head[..2] == GZ_MAGIC
}

/// Whether the file name suggests gzip compression.
pub fn is_gz_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .map(|a| a.to_string_lossy().ends_with(".gz"))
        .unwrap_or(false)
}

/// Number of elements of a shape, `None` on overflow.
pub fn element_count(shape: &[u64]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| {
        usize::try_from(d).ok().and_then(|d| acc.checked_mul(d))
    })
}
