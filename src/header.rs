//! Magic marker and fixed-size header codec.
//!
//! ```text
//! Offset 0:       MAGIC                  (8 bytes)
//! Offset 8:       HEADER (7 x u64 BE)    (56 bytes)
//!                   version
//!                   objects_count
//!                   objects_position
//!                   objects_size
//!                   index_position
//!                   index_size
//!                   hash_position
//! ```

use std::io::{Read, Seek, SeekFrom, Write};

use crate::config::{HEADER_SIZE, MAGIC, SHARD_VERSION};
use crate::error::{Result, ShardError};
use crate::io::{read_u64_net, write_u64_net};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub version: u64,
    pub objects_count: u64,
    pub objects_position: u64,
    pub objects_size: u64,
    pub index_position: u64,
    pub index_size: u64,
    pub hash_position: u64,
}

impl Header {
    /// A freshly zeroed header with `version` and `objects_position` set,
    /// as produced by `Shard::create`.
    pub fn new(objects_count: u64) -> Self {
        Header {
            version: SHARD_VERSION,
            objects_count,
            objects_position: (MAGIC.len() + HEADER_SIZE) as u64,
            objects_size: 0,
            index_position: 0,
            index_size: 0,
            hash_position: 0,
        }
    }

    /// Write the magic at offset 0.
    pub fn write_magic<W: Write + Seek>(w: &mut W) -> Result<()> {
        w.seek(SeekFrom::Start(0))?;
        w.write_all(MAGIC.as_slice())?;
        Ok(())
    }

    /// Read and validate the magic at offset 0.
    pub fn check_magic<R: Read + Seek>(r: &mut R) -> Result<()> {
        r.seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; 8];
        crate::io::read_exact(r, &mut buf)?;
        if &buf != MAGIC {
            return Err(ShardError::BadMagic);
        }
        Ok(())
    }

    /// Write all seven fields at offset `|MAGIC|`. Does not validate the
    /// offsets are internally consistent — that is finalize's job.
    pub fn write<W: Write + Seek>(&self, w: &mut W) -> Result<()> {
        w.seek(SeekFrom::Start(MAGIC.len() as u64))?;
        write_u64_net(w, self.version)?;
        write_u64_net(w, self.objects_count)?;
        write_u64_net(w, self.objects_position)?;
        write_u64_net(w, self.objects_size)?;
        write_u64_net(w, self.index_position)?;
        write_u64_net(w, self.index_size)?;
        write_u64_net(w, self.hash_position)?;
        Ok(())
    }

    /// Read the header, rejecting unsupported versions.
    pub fn load<R: Read + Seek>(r: &mut R) -> Result<Self> {
        r.seek(SeekFrom::Start(MAGIC.len() as u64))?;
        let version = read_u64_net(r)?;
        if version != SHARD_VERSION {
            return Err(ShardError::UnsupportedVersion { found: version });
        }
        let header = Header {
            version,
            objects_count: read_u64_net(r)?,
            objects_position: read_u64_net(r)?,
            objects_size: read_u64_net(r)?,
            index_position: read_u64_net(r)?,
            index_size: read_u64_net(r)?,
            hash_position: read_u64_net(r)?,
        };
        header.check_derived_offsets()?;
        Ok(header)
    }

    /// Verify the stored offsets agree with what's algebraically derivable
    /// from `objects_count`/`objects_size`/`index_size`.
    pub fn check_derived_offsets(&self) -> Result<()> {
        let expected_objects_position = (MAGIC.len() + HEADER_SIZE) as u64;
        if self.objects_position != expected_objects_position {
            return Err(ShardError::CorruptHeader {
                detail: format!(
                    "objects_position {} != expected {}",
                    self.objects_position, expected_objects_position
                ),
            });
        }
        let expected_index_position = self.objects_position + self.objects_size;
        if self.index_position != expected_index_position {
            return Err(ShardError::CorruptHeader {
                detail: format!(
                    "index_position {} != expected {}",
                    self.index_position, expected_index_position
                ),
            });
        }
        let expected_index_size = self.objects_count * 8;
        if self.index_size != expected_index_size {
            return Err(ShardError::CorruptHeader {
                detail: format!(
                    "index_size {} != expected {}",
                    self.index_size, expected_index_size
                ),
            });
        }
        let expected_hash_position = self.index_position + self.index_size;
        if self.hash_position != expected_hash_position {
            return Err(ShardError::CorruptHeader {
                detail: format!(
                    "hash_position {} != expected {}",
                    self.hash_position, expected_hash_position
                ),
            });
        }
        Ok(())
    }
}
