//! Byte store abstraction
//!
//! The walker needs read, seek and (for injection) write access to a single
//! cursor. Files opened for update and `Cursor<Vec<u8>>` both qualify.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// A seekable, readable and writable byte store
pub trait ByteStore: Read + Write + Seek {}

impl<T: Read + Write + Seek> ByteStore for T {}

/// Wraps a read-only source so it can be walked as a [`ByteStore`]
///
/// Every write fails with [`io::ErrorKind::Unsupported`].
#[derive(Debug)]
pub struct ReadOnly<R>(pub R);

impl<R> ReadOnly<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> Read for ReadOnly<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R: Seek> Seek for ReadOnly<R> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.0.seek(pos)
    }
}

impl<R> Write for ReadOnly<R> {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "byte store is read-only",
        ))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_only_reads_and_seeks() {
        let mut store = ReadOnly(Cursor::new(&b"abcdef"[..]));
        store.seek(SeekFrom::Start(2)).unwrap();
        let mut buf = [0u8; 3];
        store.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"cde");
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut store = ReadOnly(Cursor::new(&b"abc"[..]));
        let err = store.write_all(b"x").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
        assert_eq!(store.into_inner().into_inner(), b"abc");
    }
}
