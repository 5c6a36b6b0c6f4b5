//! Minimal perfect hash function: adapter over the `minimal_perfect_hash`
//! crate's bucket-and-displacement construction.
//!
//! The engine stages keys in memory as part of the write path; this module
//! replays that in-memory index as a restartable key stream and hands it to
//! the external builder, rather than re-implementing bucket placement and
//! displacement search here. `keys_per_bin`/`b` map onto the builder's
//! `target_bucket_size`/`max_seed_attempts` knobs and are fixed constants so
//! a shard built with one set of values loads correctly with the same set.

use std::io::{Read, Write};

use minimal_perfect_hash::{BuildConfig, Builder, MphError};

use crate::config::{MPHF_B, MPHF_KEYS_PER_BIN};
use crate::error::{Result, ShardError};
use crate::io::{read_u64_net, write_u64_net};

/// A restartable view over the keys staged for hashing.
pub struct KeyStream<'a> {
    keys: &'a [Vec<u8>],
    cursor: usize,
}

impl<'a> KeyStream<'a> {
    pub fn new(keys: &'a [Vec<u8>]) -> Self {
        KeyStream { keys, cursor: 0 }
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn read(&mut self) -> Option<&'a [u8]> {
        let key = self.keys.get(self.cursor)?;
        self.cursor += 1;
        Some(key.as_slice())
    }
}

fn build_config() -> BuildConfig {
    BuildConfig {
        target_bucket_size: 1.0 / MPHF_KEYS_PER_BIN as f64,
        max_seed_attempts: 1u32 << (MPHF_B + 16),
        ..BuildConfig::default()
    }
}

fn mph_error(e: MphError) -> ShardError {
    ShardError::MphfBuildFailed {
        detail: e.to_string(),
    }
}

/// A built minimal perfect hash function over `n` keys. `n == 0` is kept as
/// its own variant because the wrapped crate's builder does not accept an
/// empty key set.
#[derive(Debug, Clone)]
pub enum Mphf {
    Empty,
    Built(minimal_perfect_hash::Mphf),
}

impl Mphf {
    /// Build the MPHF over every key yielded by `stream`.
    pub fn build(stream: &mut KeyStream) -> Result<Self> {
        stream.rewind();
        let mut keys: Vec<&[u8]> = Vec::new();
        while let Some(k) = stream.read() {
            keys.push(k);
        }
        if keys.is_empty() {
            return Ok(Mphf::Empty);
        }

        let mphf = Builder::new()
            .with_config(build_config())
            .build(keys)
            .map_err(mph_error)?;
        Ok(Mphf::Built(mphf))
    }

    /// Map `key` into `[0, size())`. Returns an arbitrary in-range value for
    /// a key that was not in the build set — the engine never verifies
    /// membership.
    pub fn search(&self, key: &[u8]) -> u32 {
        match self {
            Mphf::Empty => 0,
            Mphf::Built(m) => m.index(key) as u32,
        }
    }

    /// Number of keys this MPHF was built over.
    pub fn size(&self) -> u64 {
        match self {
            Mphf::Empty => 0,
            Mphf::Built(m) => m.n,
        }
    }

    /// Serialize to the opaque on-disk blob: a `u64` key count (`0` is the
    /// empty sentinel) followed, when non-empty, by a `u64` byte length and
    /// the builder's own serialized representation.
    pub fn dump<W: Write>(&self, w: &mut W) -> Result<()> {
        match self {
            Mphf::Empty => write_u64_net(w, 0),
            Mphf::Built(m) => {
                let bytes = m.to_bytes().map_err(mph_error)?;
                write_u64_net(w, m.n)?;
                write_u64_net(w, bytes.len() as u64)?;
                w.write_all(&bytes)?;
                Ok(())
            }
        }
    }

    /// Deserialize a blob written by [`Mphf::dump`].
    pub fn load<R: Read>(r: &mut R) -> Result<Self> {
        let n = read_u64_net(r)?;
        if n == 0 {
            return Ok(Mphf::Empty);
        }
        let blob_len = read_u64_net(r)?;
        let mut buf = vec![0u8; blob_len as usize];
        crate::io::read_exact(r, &mut buf)?;
        let inner = minimal_perfect_hash::Mphf::from_bytes(&buf).map_err(mph_error)?;
        Ok(Mphf::Built(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn build_keys(n: usize) -> Vec<Vec<u8>> {
        (0..n)
            .map(|i| {
                let mut k = vec![0u8; 32];
                k[0..8].copy_from_slice(&(i as u64).to_be_bytes());
                k
            })
            .collect()
    }

    #[test]
    fn bijection_on_distinct_keys() {
        let keys = build_keys(500);
        let mut stream = KeyStream::new(&keys);
        let mphf = Mphf::build(&mut stream).unwrap();
        assert_eq!(mphf.size(), 500);

        let mut seen = vec![false; 500];
        for k in &keys {
            let h = mphf.search(k) as usize;
            assert!(h < 500);
            assert!(!seen[h], "collision at slot {h}");
            seen[h] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn duplicate_key_fails_build() {
        let mut keys = build_keys(2);
        keys[1] = keys[0].clone();
        let mut stream = KeyStream::new(&keys);
        assert!(matches!(
            Mphf::build(&mut stream),
            Err(ShardError::MphfBuildFailed { .. })
        ));
    }

    #[test]
    fn dump_load_round_trip() {
        let keys = build_keys(64);
        let mut stream = KeyStream::new(&keys);
        let mphf = Mphf::build(&mut stream).unwrap();

        let mut buf = Vec::new();
        mphf.dump(&mut buf).unwrap();
        let loaded = Mphf::load(&mut std::io::Cursor::new(&buf)).unwrap();

        assert_eq!(loaded.size(), mphf.size());
        for k in &keys {
            assert_eq!(loaded.search(k), mphf.search(k));
        }
    }

    #[test]
    fn empty_key_set_round_trips() {
        let keys: Vec<Vec<u8>> = Vec::new();
        let mut stream = KeyStream::new(&keys);
        let mphf = Mphf::build(&mut stream).unwrap();
        assert_eq!(mphf.size(), 0);

        let mut buf = Vec::new();
        mphf.dump(&mut buf).unwrap();
        let loaded = Mphf::load(&mut std::io::Cursor::new(&buf)).unwrap();
        assert_eq!(loaded.size(), 0);
    }

    proptest::proptest! {
        #[test]
        fn prop_bijection(n in 1usize..200) {
            let keys = build_keys(n);
            let mut stream = KeyStream::new(&keys);
            let mphf = Mphf::build(&mut stream).unwrap();
            let mut seen = vec![false; n];
            for k in &keys {
                let h = mphf.search(k) as usize;
                prop_assert!(h < n);
                prop_assert!(!seen[h]);
                seen[h] = true;
            }
        }
    }
}
