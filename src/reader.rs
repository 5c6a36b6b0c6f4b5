//! Reader (lookup mode): opens a sealed shard and answers point lookups.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

use crate::error::Result;
use crate::header::Header;
use crate::io::{read_u64_net, seek_to};
use crate::mphf::Mphf;
use crate::record;

pub struct Reader<R: Read + Seek> {
    file: R,
    header: Header,
    mphf: Mphf,
}

impl Reader<File> {
    /// Open `path` read-only and validate magic, header, and MPHF blob.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::open_in(file)
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Same as [`Reader::open`] but over any `Read + Seek`.
    pub fn open_in(mut file: R) -> Result<Self> {
        Header::check_magic(&mut file)?;
        let header = Header::load(&mut file)?;
        seek_to(&mut file, header.hash_position)?;
        let mphf = Mphf::load(&mut file)?;
        log::debug!(
            "shard opened: objects_count={} mphf_size={}",
            header.objects_count,
            mphf.size()
        );
        Ok(Reader { file, header, mphf })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Resolve `key` to an object offset via the MPHF and offset table,
    /// without reading the object itself.
    fn resolve_offset(&mut self, key: &[u8]) -> Result<u64> {
        let h = self.mphf.search(key) as u64;
        let slot_offset = self.header.index_position + h * 8;
        seek_to(&mut self.file, slot_offset)?;
        read_u64_net(&mut self.file)
    }

    /// Split form, step 1: resolve `key` and position the reader right
    /// after the object's size prefix. Returns the object size. Must be
    /// followed by [`Reader::lookup_into`].
    pub fn lookup_size(&mut self, key: &[u8]) -> Result<u64> {
        let object_offset = self.resolve_offset(key)?;
        seek_to(&mut self.file, object_offset)?;
        record::read_size(&mut self.file)
    }

    /// Split form, step 2: read the object payload from the reader's
    /// current position into `buf`. `buf.len()` must equal the size
    /// returned by the preceding [`Reader::lookup_size`] call.
    pub fn lookup_into(&mut self, buf: &mut [u8]) -> Result<()> {
        record::read_payload_into(&mut self.file, buf)
    }

    /// Fused convenience form: resolve, read the size, and return the
    /// object bytes in one call.
    pub fn lookup(&mut self, key: &[u8]) -> Result<Vec<u8>> {
        let object_offset = self.resolve_offset(key)?;
        record::read_record_at(&mut self.file, object_offset)
    }
}
