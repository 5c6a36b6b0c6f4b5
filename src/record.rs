//! Object record framing: a `u64` network-order size prefix followed by the
//! raw payload bytes.
//!
//! Both the writer (appending) and the reader (random-access lookup) use
//! this exact framing, so it lives in its own module rather than being
//! duplicated.

use std::io::{Read, Seek, Write};

use crate::error::Result;
use crate::io::{read_exact, read_u64_net, write_u64_net};

/// Append one record at the writer's current position. Returns the number
/// of bytes written (`8 + data.len()`).
pub fn write_record<W: Write>(w: &mut W, data: &[u8]) -> Result<u64> {
    write_u64_net(w, data.len() as u64)?;
    w.write_all(data)?;
    Ok(8 + data.len() as u64)
}

/// Read the `u64` size prefix at the reader's current position.
pub fn read_size<R: Read>(r: &mut R) -> Result<u64> {
    read_u64_net(r)
}

/// Read `size` raw bytes at the reader's current position into a freshly
/// allocated buffer.
pub fn read_payload<R: Read>(r: &mut R, size: u64) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; size as usize];
    read_exact(r, &mut buf)?;
    Ok(buf)
}

/// Read `size` raw bytes into a caller-supplied buffer (zero-copy form,
/// used by [`crate::shard::Shard::lookup_into`]).
pub fn read_payload_into<R: Read>(r: &mut R, buf: &mut [u8]) -> Result<()> {
    read_exact(r, buf)
}

/// Read the size prefix and payload of the record at `offset`, seeking
/// first. Used by the reader's fused `lookup`.
pub fn read_record_at<R: Read + Seek>(r: &mut R, offset: u64) -> Result<Vec<u8>> {
    crate::io::seek_to(r, offset)?;
    let size = read_size(r)?;
    read_payload(r, size)
}
