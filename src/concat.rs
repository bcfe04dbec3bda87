/*!
 * Concatenation of walked files into one text stream with path headers
 */

use std::fs;
use std::io::{self, Write};

use log::{debug, warn};

use crate::types::FileEntry;

/// Counters for one concatenation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConcatStats {
    /// Blocks written, readable or not
    pub files: usize,
    /// Files replaced by an error marker
    pub unreadable: usize,
    /// Bytes written to the stream
    pub bytes: u64,
}

/// Header line for a file block
pub fn header(rel_path: &str) -> String {
    format!("=== {} ===\n", rel_path)
}

/// Inline marker written in place of unreadable content
pub fn error_marker(message: &str) -> String {
    format!("[Error reading file: {}]\n", message)
}

/// Streams `=== path ===` blocks to a writer, one file at a time
pub struct Concatenator<W: Write> {
    out: W,
    stats: ConcatStats,
}

impl<W: Write> Concatenator<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            stats: ConcatStats::default(),
        }
    }

    /// Read `entry` and append its block.
    ///
    /// A file that cannot be read or is not valid UTF-8 gets an error marker
    /// instead of content; only failures of the output stream are returned.
    pub fn append(&mut self, entry: &FileEntry) -> io::Result<()> {
        let rel = entry.display_path();
        match fs::read_to_string(&entry.path) {
            Ok(content) => {
                debug!("Appending {} ({} bytes)", rel, content.len());
                self.write_block(&rel, &content)
            }
            Err(e) => {
                warn!("Could not read {}: {}", rel, e);
                self.stats.unreadable += 1;
                self.write_raw_block(&rel, &error_marker(&e.to_string()))
            }
        }
    }

    /// Append a block with the given content, enforcing a trailing newline
    pub fn write_block(&mut self, rel_path: &str, content: &str) -> io::Result<()> {
        if content.ends_with('\n') {
            self.write_raw_block(rel_path, content)
        } else {
            self.write_raw_block(rel_path, &format!("{}\n", content))
        }
    }

    fn write_raw_block(&mut self, rel_path: &str, body: &str) -> io::Result<()> {
        if self.stats.files > 0 {
            self.emit("\n")?;
        }
        self.emit(&header(rel_path))?;
        self.emit(body)?;
        self.stats.files += 1;
        Ok(())
    }

    fn emit(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())?;
        self.stats.bytes += text.len() as u64;
        Ok(())
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> io::Result<(W, ConcatStats)> {
        self.out.flush()?;
        Ok((self.out, self.stats))
    }
}

/// Concatenate `files` in order into `out`
pub fn concatenate<W: Write>(files: &[FileEntry], out: W) -> io::Result<(W, ConcatStats)> {
    let mut concatenator = Concatenator::new(out);
    for entry in files {
        concatenator.append(entry)?;
    }
    concatenator.finish()
}
