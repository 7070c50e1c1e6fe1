//! File metadata returned by driver stat operations.

use time::OffsetDateTime;

/// Information about a path within a driver's namespace.
///
/// Immutable after construction. Unlike `std::fs::Metadata` this carries the
/// full path of the target, since driver namespaces are addressed by absolute
/// path rather than by open handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    path: String,
    size: u64,
    mod_time: OffsetDateTime,
    is_dir: bool,
}

impl FileInfo {
    /// Describe a regular file.
    pub fn file(path: impl Into<String>, size: u64, mod_time: OffsetDateTime) -> Self {
        Self {
            path: path.into(),
            size,
            mod_time,
            is_dir: false,
        }
    }

    /// Describe a directory. Directory sizes are meaningless and read as zero.
    pub fn dir(path: impl Into<String>, mod_time: OffsetDateTime) -> Self {
        Self {
            path: path.into(),
            size: 0,
            mod_time,
            is_dir: true,
        }
    }

    /// The full path of the target.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Current length of the file in bytes. Meaningless for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Modification time, or creation time for backends without one.
    pub fn mod_time(&self) -> OffsetDateTime {
        self.mod_time
    }

    /// Whether the path is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}
