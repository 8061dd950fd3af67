//! Length-framed streams of records.
//!
//! A dataset file is a plain concatenation of frames, each a u64 LE byte
//! length followed by one encoded record.

use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use super::record::{decode, encode};
use crate::error::RecordError;
use crate::example::ShapeExample;

/// Writes framed records to a sink.
pub struct RecordWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Encode and append one example.
    pub fn write(&mut self, example: &ShapeExample) -> Result<(), RecordError> {
        let record = encode(example);
        self.writer.write_all(&(record.len() as u64).to_le_bytes())?;
        self.writer.write_all(&record)?;
        log::debug!(
            "wrote record {} ({}, {} bytes)",
            self.written,
            example.mesh_id(),
            record.len()
        );
        self.written += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the inner writer.
    pub fn finish(mut self) -> Result<W, RecordError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

/// Reads framed records from a source, yielding one decoded example per frame.
///
/// Iteration stops after the first error.
pub struct RecordReader<R: Read> {
    reader: R,
    index: usize,
    failed: bool,
}

impl<R: Read> RecordReader<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            index: 0,
            failed: false,
        }
    }

    /// Read the next frame; `Ok(None)` at a clean end of stream.
    pub fn read_next(&mut self) -> Result<Option<ShapeExample>, RecordError> {
        let mut prefix = [0u8; 8];
        let got = read_fully(&mut self.reader, &mut prefix)?;
        if got == 0 {
            return Ok(None);
        }
        if got < prefix.len() {
            return Err(RecordError::Truncated {
                index: self.index,
                expected: prefix.len() as u64,
                got: got as u64,
            });
        }

        let len = u64::from_le_bytes(prefix);
        let mut body = Vec::new();
        Read::take(&mut self.reader, len).read_to_end(&mut body)?;
        if (body.len() as u64) < len {
            return Err(RecordError::Truncated {
                index: self.index,
                expected: len,
                got: body.len() as u64,
            });
        }

        let example = decode(&body).map_err(|source| RecordError::Schema {
            index: self.index,
            source,
        })?;
        log::debug!("read record {} ({})", self.index, example.mesh_id());
        self.index += 1;
        Ok(Some(example))
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<ShapeExample, RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.read_next() {
            Ok(Some(example)) => Some(Ok(example)),
            Ok(None) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Fill `buf` as far as the reader allows; returns the number of bytes read.
fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize, RecordError> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(filled)
}

/// Write examples to a record file, replacing any existing file.
pub fn write_records_to_file<'a, P, I>(path: P, examples: I) -> Result<usize, RecordError>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a ShapeExample>,
{
    let mut writer = RecordWriter::new(BufWriter::new(File::create(path)?));
    for example in examples {
        writer.write(example)?;
    }
    let count = writer.written();
    writer.finish()?;
    Ok(count)
}

/// Read every example from a record file.
pub fn read_records_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<ShapeExample>, RecordError> {
    RecordReader::new(BufReader::new(File::open(path)?)).collect()
}
