//! Whole-file text I/O for the patch target.
//!
//! Reads pull the entire file into memory and require valid UTF-8. Writes
//! truncate the existing file and rewrite it in place, so the inode, owner,
//! mode and any hard links are kept. A crash mid-write can leave the file
//! partially written; no backup is taken.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Read the whole file as UTF-8 text.
pub fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let len = bytes.len();
    let text = String::from_utf8(bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "file is not valid UTF-8 (invalid byte at offset {})",
                e.utf8_error().valid_up_to()
            ),
        )
    })?;
    tracing::debug!(path = %path.display(), bytes = len, "read target file");
    Ok(text)
}

/// Overwrite the existing file with `content`.
///
/// The file must already exist; it is never created. Whether the caller may
/// write it is decided by the OS when the file is opened, so a file that
/// became unwritable since it was read fails here untouched.
pub fn write_text(path: &Path, content: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "rewrote target file");
    Ok(())
}
