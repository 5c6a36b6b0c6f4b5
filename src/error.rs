//! Unified error type for the shard engine.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShardError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    #[error("missing or invalid magic — file is not a sealed shard")]
    BadMagic,

    #[error("unsupported shard version {found} (this build handles {})", crate::config::SHARD_VERSION)]
    UnsupportedVersion { found: u64 },

    #[error("corrupt header: {detail}")]
    CorruptHeader { detail: String },

    #[error("invalid operation: shard is {actual}, expected {expected}")]
    BadState {
        expected: &'static str,
        actual: &'static str,
    },

    #[error("write called more times than the declared capacity ({capacity})")]
    IndexOverflow { capacity: u64 },

    #[error("minimal perfect hash construction failed: {detail}")]
    MphfBuildFailed { detail: String },

    #[error("seek offset exceeds i64::MAX")]
    SeekOverflow,
}

pub type Result<T> = std::result::Result<T, ShardError>;
