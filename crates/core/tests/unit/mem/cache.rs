//! Cache behavior tests: hit timing, miss fills, write-back eviction, and
//! replacement policy selection.

use pipesim_core::config::{CacheConfig, ReplacementPolicyKind};
use pipesim_core::core::units::Cache;
use pipesim_core::mem::{BackingStore, MemoryImage};

fn small_config(ways: usize, sets: usize, policy: ReplacementPolicyKind) -> CacheConfig {
    CacheConfig {
        ways,
        sets,
        line_bytes: 8,
        policy,
        fill_beat_bytes: 8,
    }
}

fn store_with_word(addr: u32, value: u32) -> BackingStore {
    let mut image = MemoryImage::new(256);
    image.write(value, addr, 4).unwrap();
    BackingStore::new(image, 1)
}

/// Clocks store and cache (in the memory unit's order) until the held
/// access completes, returning its result.
fn spin(cache: &mut Cache, store: &mut BackingStore) -> u32 {
    for _ in 0..200 {
        if let Some(value) = cache.request_status() {
            return value;
        }
        store.clock().unwrap();
        cache.clock(store);
    }
    panic!("cache access did not complete");
}

#[test]
fn cold_read_misses_then_fills() {
    let config = small_config(1, 2, ReplacementPolicyKind::Fifo);
    let mut store = store_with_word(0, 0x1122_3344);
    let mut cache = Cache::new("test", &config);

    cache.send_read(0, 4, &mut store).unwrap();
    assert!(cache.request_status().is_none(), "a cold read cannot hit");
    assert_eq!(spin(&mut cache, &mut store), 0x1122_3344);
    assert_eq!(cache.misses(), 1);
    // The post-fill replay must not count as a hit.
    assert_eq!(cache.hits(), 0);
}

#[test]
fn hit_completes_within_the_issuing_cycle() {
    let config = small_config(1, 2, ReplacementPolicyKind::Fifo);
    let mut store = store_with_word(4, 0xa5a5_a5a5);
    let mut cache = Cache::new("test", &config);

    cache.send_read(0, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);

    // Same line, different word: resident now, result available at issue.
    cache.send_read(4, 4, &mut store).unwrap();
    assert_eq!(cache.request_status(), Some(0xa5a5_a5a5));
    assert_eq!(cache.hits(), 1);
    assert_eq!(cache.misses(), 1);
}

#[test]
fn dirty_eviction_round_trips_through_the_store() {
    // One way, one set: every distinct line conflicts.
    let config = small_config(1, 1, ReplacementPolicyKind::Fifo);
    let mut store = BackingStore::new(MemoryImage::new(256), 1);
    let mut cache = Cache::new("test", &config);

    cache.send_write(0xabcd_1234, 0, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    assert_eq!(cache.evictions(), 0);

    // Conflicting line: the dirty victim is written back before the fill.
    cache.send_read(8, 4, &mut store).unwrap();
    assert_eq!(spin(&mut cache, &mut store), 0);
    assert_eq!(cache.evictions(), 1);
    assert_eq!(store.image().read(0, 4).unwrap(), 0xabcd_1234);

    // Refill the original line: the written value survived the eviction.
    cache.send_read(0, 4, &mut store).unwrap();
    assert_eq!(spin(&mut cache, &mut store), 0xabcd_1234);
    // The second eviction victim was clean, so no further write-back.
    assert_eq!(cache.evictions(), 1);
    assert_eq!(cache.misses(), 3);
}

#[test]
fn narrow_write_hits_merge_into_the_line() {
    let config = small_config(1, 2, ReplacementPolicyKind::Fifo);
    let mut store = store_with_word(0, 0xffff_ffff);
    let mut cache = Cache::new("test", &config);

    cache.send_read(0, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);

    cache.send_write(0x12, 1, 1, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    cache.send_read(0, 4, &mut store).unwrap();
    assert_eq!(spin(&mut cache, &mut store), 0xffff_12ff);
}

#[test]
fn fill_advances_in_beats() {
    let config = CacheConfig {
        ways: 1,
        sets: 2,
        line_bytes: 8,
        policy: ReplacementPolicyKind::Fifo,
        fill_beat_bytes: 2,
    };
    let mut store = store_with_word(4, 0x6789_abcd);
    let mut cache = Cache::new("test", &config);

    // Four beats of two bytes each, one store round-trip per beat.
    cache.send_read(4, 4, &mut store).unwrap();
    let mut cycles = 0;
    while cache.request_status().is_none() {
        store.clock().unwrap();
        cache.clock(&mut store);
        cycles += 1;
        assert!(cycles < 100, "fill never completed");
    }
    assert!(cycles >= 4, "a 4-beat fill cannot finish in {cycles} cycles");
    assert_eq!(cache.request_status(), Some(0x6789_abcd));
}

#[test]
fn whole_line_beats_carry_every_byte() {
    // One beat per line: the transfer is wider than a word and must not
    // truncate or pad the upper bytes.
    let config = CacheConfig {
        ways: 1,
        sets: 1,
        line_bytes: 16,
        policy: ReplacementPolicyKind::Fifo,
        fill_beat_bytes: 16,
    };
    let mut image = MemoryImage::new(256);
    for addr in 0..16 {
        image.write(0xa0 + addr, addr, 1).unwrap();
    }
    let mut store = BackingStore::new(image, 1);
    let mut cache = Cache::new("test", &config);

    cache.send_read(12, 4, &mut store).unwrap();
    assert_eq!(spin(&mut cache, &mut store), 0xafae_adac);

    // Dirty the top of the line, evict it, and check the write-back moved
    // the full width too.
    cache.send_write(0x5150_4f4e, 12, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    cache.send_read(16, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    assert_eq!(cache.evictions(), 1);
    assert_eq!(store.image().read(0, 4).unwrap(), 0xa3a2_a1a0);
    assert_eq!(store.image().read(12, 4).unwrap(), 0x5150_4f4e);
}

#[test]
fn access_crossing_a_line_boundary_is_rejected() {
    let config = small_config(1, 2, ReplacementPolicyKind::Fifo);
    let mut store = BackingStore::new(MemoryImage::new(256), 1);
    let mut cache = Cache::new("test", &config);

    // Two bytes at offset 7 of an 8-byte line straddle the boundary.
    let err = cache.send_read(7, 2, &mut store).unwrap_err();
    assert!(err.to_string().contains("misaligned"), "{err}");
    let err = cache.send_write(0xbeef, 7, 2, &mut store).unwrap_err();
    assert!(err.to_string().contains("misaligned"), "{err}");
    assert!(!cache.is_busy(), "a rejected access must not occupy the port");

    // The last byte of the line is still a legal access.
    cache.send_read(7, 1, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
}

#[test]
fn fifo_rotates_victims_regardless_of_use() {
    let config = small_config(2, 1, ReplacementPolicyKind::Fifo);
    let mut store = BackingStore::new(MemoryImage::new(256), 1);
    let mut cache = Cache::new("test", &config);

    for addr in [0, 8] {
        cache.send_read(addr, 4, &mut store).unwrap();
        let _ = spin(&mut cache, &mut store);
    }
    // Touch line 0; FIFO ignores the use.
    cache.send_read(0, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    cache.send_read(16, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);

    // The rotation points at line 0's way, so it was evicted despite being
    // the most recently used.
    let misses_before = cache.misses();
    cache.send_read(0, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    assert_eq!(cache.misses(), misses_before + 1);
}

#[test]
fn lru_keeps_the_recently_used_line() {
    let config = small_config(2, 1, ReplacementPolicyKind::Lru);
    let mut store = BackingStore::new(MemoryImage::new(256), 1);
    let mut cache = Cache::new("test", &config);

    for addr in [0, 8] {
        cache.send_read(addr, 4, &mut store).unwrap();
        let _ = spin(&mut cache, &mut store);
    }
    // Touch line 0 so line 8 becomes the eviction candidate.
    cache.send_read(0, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    cache.send_read(16, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);

    let hits_before = cache.hits();
    cache.send_read(0, 4, &mut store).unwrap();
    assert_eq!(cache.hits(), hits_before + 1, "line 0 should still be resident");

    let misses_before = cache.misses();
    cache.send_read(8, 4, &mut store).unwrap();
    let _ = spin(&mut cache, &mut store);
    assert_eq!(cache.misses(), misses_before + 1, "line 8 should have been evicted");
}
