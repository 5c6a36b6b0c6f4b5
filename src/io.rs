//! Positioned I/O primitives.
//!
//! Thin, error-propagating wrappers around read/write/seek/tell with
//! network-byte-order conversion for the 64-bit fields used throughout the
//! on-disk format. Generic over `Read + Write + Seek` so the writer and
//! reader can be exercised against a real [`std::fs::File`] or an in-memory
//! `Cursor<Vec<u8>>` in tests.

use std::convert::TryFrom;
use std::io::{Read, Seek, SeekFrom, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Result, ShardError};

/// Read exactly `buf.len()` bytes, failing with [`ShardError::ShortRead`] if
/// the underlying reader runs out first (no short reads tolerated).
pub fn read_exact<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    let mut filled = 0;
    while filled < buf.len() {
        match r.read(&mut buf[filled..]) {
            Ok(0) => {
                return Err(ShardError::ShortRead {
                    expected: buf.len(),
                    got: filled,
                })
            }
            Ok(n) => filled += n,
            Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Seek to an absolute offset, rejecting offsets that don't fit in `i64`.
pub fn seek_to<S: Seek>(s: &mut S, offset: u64) -> Result<u64> {
    if i64::try_from(offset).is_err() {
        return Err(ShardError::SeekOverflow);
    }
    Ok(s.seek(SeekFrom::Start(offset))?)
}

/// Current stream position.
pub fn tell<S: Seek>(s: &mut S) -> Result<u64> {
    Ok(s.stream_position()?)
}

/// Read one network-byte-order u64.
pub fn read_u64_net<R: Read>(r: &mut R) -> Result<u64> {
    Ok(r.read_u64::<BigEndian>()?)
}

/// Write one network-byte-order u64.
pub fn write_u64_net<W: Write>(w: &mut W, value: u64) -> Result<()> {
    Ok(w.write_u64::<BigEndian>(value)?)
}
