//! Build-time-tunable constants that are part of the on-disk contract.
//!
//! Everything here is frozen for a given shard: reader and writer must be
//! compiled with the same values, since none of them (other than the
//! version field) is stored in the file. Changing `SHARD_KEY_LEN` or the
//! MPHF build parameters changes the format and requires bumping
//! [`SHARD_VERSION`].

/// Fixed per-key byte length. The canonical use case is SHA-256 content
/// addressing.
pub const SHARD_KEY_LEN: usize = 32;

/// Current on-disk format version.
pub const SHARD_VERSION: u64 = 1;

/// Magic marker at offset 0. Stable across versions.
pub const MAGIC: &[u8; 8] = b"SHRD\0\0\0\0";

/// Size in bytes of the fixed-size header (7 × u64).
pub const HEADER_SIZE: usize = 7 * 8;

/// Average number of keys placed in each MPHF bucket during construction.
/// Part of the frozen MPHF build contract.
pub const MPHF_KEYS_PER_BIN: u32 = 1;

/// Displacement search width, as a power of two. Feeds the MPHF builder's
/// per-bucket placement budget; part of the frozen MPHF build contract.
pub const MPHF_B: u32 = 4;
