//! # shardhash — append-only, minimal-perfect-hash-indexed object shards
//!
//! Format guarantees:
//! - All numeric fields on disk are network-byte-order (big-endian) `u64`s
//! - The magic marker is written last during finalize, so a half-written
//!   shard is never mistaken for a sealed one
//! - Lookup never validates key membership: a key absent from the original
//!   write set resolves to an arbitrary slot and returns whatever object
//!   happens to live there — callers that need membership proof must
//!   verify it themselves, e.g. by checking the returned bytes hash back
//!   to the key
//! - `SHARD_KEY_LEN` and the MPHF build parameters (`MPHF_KEYS_PER_BIN`,
//!   `MPHF_B`) are compile-time constants, not stored on disk; reader and
//!   writer must agree on them out of band

pub mod config;
pub mod error;
mod header;
mod io;
mod mphf;
mod reader;
mod record;
mod shard;
mod writer;

pub use error::{Result, ShardError};
pub use header::Header;
pub use reader::Reader;
pub use shard::Shard;
pub use writer::Writer;
