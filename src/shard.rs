//! High-level [`Shard`] — the lifecycle and resource manager and the
//! primary embedding surface.
//!
//! ```no_run
//! use shardhash::Shard;
//!
//! // Write
//! let mut shard = Shard::create("out.shard", 1)?;
//! shard.write(&[0u8; 32], b"hello")?;
//! shard.finalize()?;
//!
//! // Read
//! let mut shard = Shard::open_read("out.shard")?;
//! let data = shard.lookup(&[0u8; 32])?;
//! assert_eq!(data, b"hello");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::config::SHARD_KEY_LEN;
use crate::error::{Result, ShardError};
use crate::header::Header;
use crate::reader::Reader;
use crate::writer::Writer;

enum Mode {
    Building(Writer<File>),
    Sealed(Header),
    Reading(Reader<File>),
}

impl Mode {
    fn name(&self) -> &'static str {
        match self {
            Mode::Building(_) => "Building",
            Mode::Sealed(_) => "Sealed",
            Mode::Reading(_) => "Reading",
        }
    }
}

/// A shard handle, in one of three states: `Building` (accepting writes),
/// `Sealed` (finalized, this handle is done), or `Reading` (opened
/// read-only, answering lookups).
pub struct Shard {
    path: PathBuf,
    mode: Mode,
}

fn bad_state(expected: &'static str, actual: &Mode) -> ShardError {
    ShardError::BadState {
        expected,
        actual: actual.name(),
    }
}

impl Shard {
    // ── Construction ──────────────────────────────────────────────────────

    /// `shard_init` + `shard_create`: open `path` for writing and declare
    /// exactly `objects_count` objects will follow.
    pub fn create<P: AsRef<Path>>(path: P, objects_count: u64) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let writer = Writer::create(&path, objects_count)?;
        log::info!("shard create: {} (objects_count={objects_count})", path.display());
        Ok(Shard {
            path,
            mode: Mode::Building(writer),
        })
    }

    /// `shard_load` / `open_read`: open an already-sealed shard for lookups.
    pub fn open_read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let reader = Reader::open(&path)?;
        log::info!("shard open_read: {}", path.display());
        Ok(Shard {
            path,
            mode: Mode::Reading(reader),
        })
    }

    // ── Write path ────────────────────────────────────────────────────────

    /// `shard_object_write`. Valid only while `Building`.
    pub fn write(&mut self, key: &[u8; SHARD_KEY_LEN], object: &[u8]) -> Result<()> {
        match &mut self.mode {
            Mode::Building(w) => w.write(key, object),
            other => Err(bad_state("Building", other)),
        }
    }

    /// `shard_save` / finalize. Valid only while `Building`; transitions to
    /// `Sealed`. Returns the finalized header for callers that want it
    /// (e.g. to log or assert on it in tests) without reopening the file.
    pub fn finalize(&mut self) -> Result<Header> {
        let mode = std::mem::replace(&mut self.mode, Mode::Sealed(Header::default()));
        match mode {
            Mode::Building(w) => {
                let (file, header) = w.finalize()?;
                file.sync_all()?;
                self.mode = Mode::Sealed(header);
                log::info!("shard finalize: {}", self.path.display());
                Ok(header)
            }
            other => {
                let err = bad_state("Building", &other);
                self.mode = other;
                Err(err)
            }
        }
    }

    // ── Read path ─────────────────────────────────────────────────────────

    /// `shard_lookup_object_size`. Valid only while `Reading`.
    pub fn lookup_size(&mut self, key: &[u8; SHARD_KEY_LEN]) -> Result<u64> {
        match &mut self.mode {
            Mode::Reading(r) => r.lookup_size(key),
            other => Err(bad_state("Reading", other)),
        }
    }

    /// `shard_lookup_object`. Must follow a successful [`Shard::lookup_size`]
    /// call; reads from the reader's current position.
    pub fn lookup_into(&mut self, out_buf: &mut [u8]) -> Result<()> {
        match &mut self.mode {
            Mode::Reading(r) => r.lookup_into(out_buf),
            other => Err(bad_state("Reading", other)),
        }
    }

    /// Fused convenience form of `lookup_size` + `lookup_into`.
    pub fn lookup(&mut self, key: &[u8; SHARD_KEY_LEN]) -> Result<Vec<u8>> {
        match &mut self.mode {
            Mode::Reading(r) => r.lookup(key),
            other => Err(bad_state("Reading", other)),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `shard_destroy`. Releases the file handle. Best-effort: dropping a
    /// `Shard` without calling this also releases everything, but this form
    /// lets the caller observe the close error.
    pub fn close(self) -> Result<()> {
        log::debug!("shard close: {}", self.path.display());
        // self.mode's Drop releases the file handle and in-memory index.
        Ok(())
    }
}
