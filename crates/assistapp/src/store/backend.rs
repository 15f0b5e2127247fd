use crate::error::Result;
use std::path::PathBuf;
use std::string::FromUtf8Error;

/// One line as read from storage. A line that is not valid UTF-8 comes back
/// as `Err` so the store can skip it without losing its neighbours.
pub type RawLine = std::result::Result<String, FromUtf8Error>;

/// Abstract interface for the raw line storage behind one record file.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while RecordStore handles the "what" (decoding, validation, ordering).
pub trait LineBackend {
    /// Read every line of the backing file.
    /// Returns Ok(None) if the file does not exist yet (an empty store).
    /// Returns Err only on actual I/O errors (permissions, disk failure);
    /// undecodable bytes are reported per line.
    fn read_lines(&self) -> Result<Option<Vec<RawLine>>>;

    /// Append one encoded record, creating the file if needed.
    fn append_line(&self, line: &str) -> Result<()>;

    /// Replace the whole file with `lines`.
    /// MUST be atomic (e.g. write to tmp then rename) so a failed rewrite
    /// leaves the previous contents intact.
    fn rewrite(&self, lines: &[String]) -> Result<()>;

    /// Where the records live. For MemBackend, a virtual path.
    fn location(&self) -> PathBuf;
}
