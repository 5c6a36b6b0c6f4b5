//! Writer (build mode): accepts `(key, object)` pairs and finalizes the
//! searchable footer.

use std::fs::{self, File};
use std::io::{Seek, Write};
use std::path::Path;

use crate::config::SHARD_KEY_LEN;
use crate::error::{Result, ShardError};
use crate::header::Header;
use crate::io::{seek_to, tell};
use crate::mphf::{KeyStream, Mphf};
use crate::record;

/// Accumulates objects for one shard under construction.
pub struct Writer<W: Write + Seek> {
    file: W,
    header: Header,
    /// Staged `(key, object_offset)` pairs, in write order.
    index: Vec<(Vec<u8>, u64)>,
    capacity: u64,
}

impl Writer<File> {
    /// Open `path` in read/write-truncate mode and prepare for `objects_count`
    /// writes.
    pub fn create<P: AsRef<Path>>(path: P, objects_count: u64) -> Result<Self> {
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Self::create_in(file, objects_count)
    }
}

impl<W: Write + Seek> Writer<W> {
    /// Same as [`Writer::create`] but over any `Write + Seek`, which lets
    /// tests exercise the engine against an in-memory buffer.
    pub fn create_in(mut file: W, objects_count: u64) -> Result<Self> {
        let header = Header::new(objects_count);
        seek_to(&mut file, header.objects_position)?;
        log::debug!(
            "shard writer created: objects_count={objects_count} objects_position={}",
            header.objects_position
        );
        Ok(Writer {
            file,
            header,
            index: Vec::with_capacity(objects_count as usize),
            capacity: objects_count,
        })
    }

    /// Number of objects written so far.
    pub fn len(&self) -> u64 {
        self.index.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Stage one `(key, object)` pair. `key` must be exactly
    /// [`SHARD_KEY_LEN`] bytes; duplicate keys are accepted here and only
    /// rejected at [`Writer::finalize`] time, when the MPHF build runs.
    pub fn write(&mut self, key: &[u8], object: &[u8]) -> Result<()> {
        if self.index.len() as u64 >= self.capacity {
            return Err(ShardError::IndexOverflow {
                capacity: self.capacity,
            });
        }
        debug_assert_eq!(
            key.len(),
            SHARD_KEY_LEN,
            "caller must supply exactly SHARD_KEY_LEN bytes"
        );

        let offset = tell(&mut self.file)?;
        record::write_record(&mut self.file, object)?;
        self.index.push((key.to_vec(), offset));
        log::trace!("staged object at offset {offset}, size {}", object.len());
        Ok(())
    }

    /// Run the five-step finalize sequence and return the sealed header.
    /// Consumes `self`; the underlying file is left positioned arbitrarily
    /// and should be synced/closed by the caller.
    pub fn finalize(mut self) -> Result<(W, Header)> {
        // (a) objects_size from current tell.
        let end_of_objects = tell(&mut self.file)?;
        self.header.objects_size = end_of_objects - self.header.objects_position;
        log::debug!("finalize: objects_size={}", self.header.objects_size);

        // (b) build MPHF over the in-memory index.
        let keys: Vec<Vec<u8>> = self.index.iter().map(|(k, _)| k.clone()).collect();
        let mut stream = KeyStream::new(&keys);
        let mphf = Mphf::build(&mut stream)?;
        log::debug!("finalize: mphf built over {} keys", mphf.size());

        // (c) offset table, indexed by MPHF slot.
        self.header.index_position = self.header.objects_position + self.header.objects_size;
        seek_to(&mut self.file, self.header.index_position)?;
        let mut table = vec![0u64; self.capacity as usize];
        for (key, offset) in &self.index {
            let slot = mphf.search(key) as usize;
            table[slot] = *offset;
        }
        for offset in &table {
            crate::io::write_u64_net(&mut self.file, *offset)?;
        }
        self.header.index_size = self.capacity * 8;

        // (d) MPHF blob.
        self.header.hash_position = self.header.index_position + self.header.index_size;
        seek_to(&mut self.file, self.header.hash_position)?;
        mphf.dump(&mut self.file)?;

        // (e) header, then magic last — the durability boundary.
        self.header.write(&mut self.file)?;
        Header::write_magic(&mut self.file)?;
        log::info!(
            "shard finalized: objects_count={} objects_size={} index_size={}",
            self.header.objects_count,
            self.header.objects_size,
            self.header.index_size
        );

        Ok((self.file, self.header))
    }
}
