//! End-to-end scenarios against the public `Shard` API.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shardhash::{Shard, ShardError};

fn key(byte: u8) -> [u8; 32] {
    [byte; 32]
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn round_trip_single_object() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("round_trip.shard");

    let mut shard = Shard::create(&path, 1).unwrap();
    shard.write(&key(0x00), b"hello").unwrap();
    shard.finalize().unwrap();

    let mut shard = Shard::open_read(&path).unwrap();
    let data = shard.lookup(&key(0x00)).unwrap();
    assert_eq!(data, b"hello");
}

#[test]
fn three_keys_distinct_object_sizes() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("distinct_sizes.shard");

    let k1 = key(0x11);
    let k2 = key(0x22);
    let k3 = key(0x33);
    let obj2 = b"bb".repeat(1000);

    let mut shard = Shard::create(&path, 3).unwrap();
    shard.write(&k1, b"a").unwrap();
    shard.write(&k2, &obj2).unwrap();
    shard.write(&k3, b"").unwrap();
    let header = shard.finalize().unwrap();

    assert_eq!(header.objects_size, 2025);

    let mut shard = Shard::open_read(&path).unwrap();
    assert_eq!(shard.lookup(&k1).unwrap(), b"a");
    assert_eq!(shard.lookup(&k2).unwrap(), obj2);
    assert_eq!(shard.lookup(&k3).unwrap(), Vec::<u8>::new());
}

#[test]
fn flipped_magic_byte_fails_open() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("flipped_magic.shard");

    let mut shard = Shard::create(&path, 1).unwrap();
    shard.write(&key(0xaa), b"x").unwrap();
    shard.finalize().unwrap();

    {
        let mut file = OpenOptions::new().write(true).open(&path).unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();
        file.write_all(&[0u8]).unwrap();
    }

    let err = Shard::open_read(&path).unwrap_err();
    assert!(matches!(err, ShardError::BadMagic));
}

#[test]
fn unsupported_version_fails_open() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("version_bump.shard");

    let mut shard = Shard::create(&path, 1).unwrap();
    shard.write(&key(0xbb), b"x").unwrap();
    shard.finalize().unwrap();

    {
        let mut file = OpenOptions::new().write(true).open(&path).unwrap();
        // version is the first header field, right after the 8-byte magic.
        file.seek(SeekFrom::Start(8)).unwrap();
        file.write_all(&99u64.to_be_bytes()).unwrap();
    }

    let err = Shard::open_read(&path).unwrap_err();
    assert!(matches!(err, ShardError::UnsupportedVersion { found: 99 }));
}

#[test]
fn duplicate_key_fails_finalize_and_leaves_file_unsealed() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("duplicate_key.shard");

    let mut shard = Shard::create(&path, 2).unwrap();
    let k = key(0xcc);
    shard.write(&k, b"a").unwrap();
    shard.write(&k, b"b").unwrap();
    let err = shard.finalize().unwrap_err();
    assert!(matches!(err, ShardError::MphfBuildFailed { .. }));

    let err = Shard::open_read(&path).unwrap_err();
    assert!(matches!(err, ShardError::BadMagic));
}

#[test]
fn large_shard_random_keys_round_trip() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("large_shard.shard");

    let mut rng = StdRng::seed_from_u64(0xA5A5_1234);
    let n = 10_000usize;
    let mut keys = Vec::with_capacity(n);
    let mut objects = Vec::with_capacity(n);
    for _ in 0..n {
        let mut k = [0u8; 32];
        rng.fill(&mut k);
        keys.push(k);
        let len = rng.gen_range(1..=1024);
        let mut obj = vec![0u8; len];
        rng.fill(obj.as_mut_slice());
        objects.push(obj);
    }

    let mut shard = Shard::create(&path, n as u64).unwrap();
    for i in 0..n {
        shard.write(&keys[i], &objects[i]).unwrap();
    }
    shard.finalize().unwrap();

    let mut shard = Shard::open_read(&path).unwrap();
    for i in 0..n {
        let data = shard.lookup(&keys[i]).unwrap();
        assert_eq!(data, objects[i], "mismatch at key {i}");
    }
}

#[test]
fn write_past_declared_capacity_overflows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overflow.shard");

    let mut shard = Shard::create(&path, 1).unwrap();
    shard.write(&key(0x01), b"x").unwrap();
    let err = shard.write(&key(0x02), b"y").unwrap_err();
    assert!(matches!(err, ShardError::IndexOverflow { capacity: 1 }));
}

#[test]
fn lookup_before_finalize_is_bad_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("badstate.shard");

    let mut shard = Shard::create(&path, 1).unwrap();
    let err = shard.lookup(&key(0x01)).unwrap_err();
    assert!(matches!(err, ShardError::BadState { .. }));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// For any set of distinct keys and arbitrary object bodies, writing,
    /// finalizing, reopening, and looking every key back up returns exactly
    /// the bytes originally written.
    #[test]
    fn prop_round_trip_arbitrary_keys_and_objects(
        objects in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..128), 1..40)
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prop_round_trip.shard");
        let n = objects.len();

        // Distinct by construction: each key embeds its own index.
        let keys: Vec<[u8; 32]> = (0..n)
            .map(|i| {
                let mut k = [0u8; 32];
                k[0..8].copy_from_slice(&(i as u64).to_be_bytes());
                k
            })
            .collect();

        let mut shard = Shard::create(&path, n as u64).unwrap();
        for i in 0..n {
            shard.write(&keys[i], &objects[i]).unwrap();
        }
        shard.finalize().unwrap();

        let mut shard = Shard::open_read(&path).unwrap();
        for i in 0..n {
            let data = shard.lookup(&keys[i]).unwrap();
            prop_assert_eq!(data, objects[i].clone());
        }
    }
}
