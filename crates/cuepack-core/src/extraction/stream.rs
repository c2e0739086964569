//! Bounded stream copy.

use std::io;
use std::io::Read;
use std::io::Write;

/// Buffer size for entry copies (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Reusable heap buffer for entry copies.
///
/// One buffer is allocated per extraction and shared by every entry.
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies at most `limit` bytes from `reader` to `writer`.
///
/// Bytes beyond `limit` are left unread. Returns the number of bytes written,
/// which equals `limit` when the source was at least that long.
///
/// # Errors
///
/// Returns an error if reading or writing fails.
pub fn copy_capped<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    limit: u64,
    buffer: &mut CopyBuffer,
) -> io::Result<u64> {
    let mut total: u64 = 0;

    while total < limit {
        let remaining = limit - total;
        let chunk = usize::try_from(remaining)
            .map_or(buffer.buf.len(), |r| r.min(buffer.buf.len()));

        let bytes_read = match reader.read(&mut buffer.buf[..chunk]) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;
        total += bytes_read as u64;
    }

    Ok(total)
}
