//! Backing storage for a ledger's journal.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

/// Persisted bytes behind a [`crate::ledger::Ledger`]. Storage is append-only:
/// records are never rewritten in place.
pub trait Storage {
    /// Opens the persisted journal for reading. Returns `None` when nothing
    /// has been persisted yet.
    fn reader(&self) -> io::Result<Option<Box<dyn Read + '_>>>;

    /// Appends one already-terminated journal line.
    fn append(&mut self, line: &str) -> io::Result<()>;
}

/// A journal stored in a file on disk.
#[derive(Debug)]
pub struct JournalFile {
    path: PathBuf,
}

impl JournalFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        JournalFile { path: path.into() }
    }
}

impl fmt::Display for JournalFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{:?}", self.path)
    }
}

impl Storage for JournalFile {
    fn reader(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        match File::open(&self.path) {
            Ok(f) => Ok(Some(Box::new(f) as Box<dyn Read>)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn append(&mut self, line: &str) -> io::Result<()> {
        let mut f = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;

        // A torn previous write can leave the last line unterminated.
        if needs_line_break(&mut f)? {
            tracing::warn!(
                "journal {} does not end in a newline, terminating the last line",
                self
            );
            f.write_all(b"\n")?;
        }

        f.write_all(line.as_bytes())?;
        f.flush()
    }
}

fn needs_line_break(f: &mut File) -> io::Result<bool> {
    if f.metadata()?.len() == 0 {
        return Ok(false);
    }
    f.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    f.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}
