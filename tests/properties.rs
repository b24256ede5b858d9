//! Randomized checks of the range, CIDR and interval map invariants.
//!
//! Run with: cargo test --test properties

use ipv4_ranges::{
    cidr_to_interval, interval_to_cidrs, to_dots, AddressSet, Cidr, Interval, IntervalMap,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const SEED: u64 = 0x1b4_2024;
const ROUNDS: usize = 2_000;

#[test]
fn cidr_to_range_is_aligned() {
    let mut rng = StdRng::seed_from_u64(SEED);

    for _ in 0..ROUNDS {
        let address: u32 = rng.gen();
        let prefix: u8 = rng.gen_range(0..=32);
        let cidr = format!("{}/{}", to_dots(address), prefix);

        let (first, last) = cidr_to_interval(&cidr).unwrap();

        let size = 1_u64 << (32 - prefix);
        assert!(first <= last, "{}", cidr);
        assert_eq!(u64::from(first) % size, 0, "{}", cidr);
        assert_eq!(u64::from(last - first), size - 1, "{}", cidr);
        assert!(first <= address && address <= last, "{}", cidr);
    }
}

/// Blocks must be ascending, aligned, non overlapping and cover exactly `[left, right]`.
fn assert_exact_cover(left: u32, right: u32, blocks: &[Cidr]) {
    assert!(!blocks.is_empty());
    assert_eq!(blocks[0].first(), left);
    assert_eq!(blocks[blocks.len() - 1].last(), right);

    for block in blocks {
        assert_eq!(u64::from(block.first()) % block.size(), 0, "{}", block);
    }
    for pair in blocks.windows(2) {
        assert_eq!(
            u64::from(pair[0].last()) + 1,
            u64::from(pair[1].first()),
            "{} then {}",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn range_to_cidrs_covers_exactly() {
    let mut rng = StdRng::seed_from_u64(SEED);

    for round in 0..ROUNDS {
        let (a, b): (u32, u32) = (rng.gen(), rng.gen());
        // Mix wide ranges with narrow ones.
        let (left, right) = if round % 2 == 0 {
            (a.min(b), a.max(b))
        } else {
            (a, a.saturating_add(b % 5_000))
        };

        let blocks: Vec<_> = interval_to_cidrs(left, right).unwrap().collect();
        assert_exact_cover(left, right, &blocks);
    }
}

#[test]
fn range_to_cidrs_edges() {
    for (left, right) in [
        (0, 0),
        (0, u32::MAX),
        (1, u32::MAX),
        (u32::MAX, u32::MAX),
        (u32::MAX - 1, u32::MAX),
        (0, u32::MAX - 1),
    ] {
        let blocks: Vec<_> = interval_to_cidrs(left, right).unwrap().collect();
        assert_exact_cover(left, right, &blocks);
    }
}

/// Fewest aligned blocks covering exactly `[left, right]`, by exhaustive search.
fn fewest_blocks(left: u32, right: u32) -> usize {
    let len = (right - left + 1) as usize;
    let mut best = vec![usize::MAX; len + 1];
    best[len] = 0;

    for offset in (0..len).rev() {
        let start = left as usize + offset;
        let mut size = 1;
        while start % size == 0 && offset + size <= len {
            best[offset] = best[offset].min(1 + best[offset + size]);
            size *= 2;
        }
    }
    best[0]
}

#[test]
fn range_to_cidrs_is_minimal() {
    for left in 0..96 {
        for right in left..96 {
            let count = interval_to_cidrs(left, right).unwrap().count();
            assert_eq!(count, fewest_blocks(left, right), "[{}, {}]", left, right);
        }
    }
}

/// Stored intervals are sorted, disjoint, and touching ones have different values.
fn assert_coalesced(map: &IntervalMap<u8>) {
    assert_eq!(map.valid(), Ok(()));

    for pair in map.intervals().windows(2) {
        let (prev, next): (&Interval<u8>, &Interval<u8>) = (&pair[0], &pair[1]);
        assert!(prev.right < next.left);
        if prev.right + 1 == next.left {
            assert_ne!(prev.value, next.value, "{} {}", prev, next);
        }
    }
}

#[test]
fn interval_map_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(SEED);

    for _ in 0..50 {
        let mut map = IntervalMap::new();
        let mut inserted: Vec<(u32, u32)> = Vec::new();

        for _ in 0..40 {
            let left = rng.gen_range(0..500);
            let right = left + rng.gen_range(0..40);
            let value = rng.gen_range(0..3_u8);

            map.add(left, right, value).unwrap();
            inserted.push((left, right));
            assert_coalesced(&map);
        }

        // Coalescing never loses or invents addresses.
        for address in 0..560 {
            let covered = inserted
                .iter()
                .any(|&(left, right)| left <= address && address <= right);
            assert_eq!(map.get(address).is_some(), covered, "{}", address);
        }
    }
}

#[test]
fn interval_map_insert_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut map = IntervalMap::new();

    for _ in 0..200 {
        let left: u32 = rng.gen();
        let right = left.saturating_add(rng.gen_range(0..1 << 16));
        let value = rng.gen_range(0..3_u8);

        map.add(left, right, value).unwrap();
        let before = map.intervals().to_vec();

        map.add(left, right, value).unwrap();
        assert_eq!(map.intervals(), &before[..]);
        assert_coalesced(&map);
    }
}

#[test]
fn address_set_matches_sorted_dedup() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let mut set = AddressSet::new();
    let mut model = Vec::new();

    for _ in 0..ROUNDS {
        let address = rng.gen_range(0..1_000);
        assert_eq!(set.insert(address), !model.contains(&address));
        model.push(address);
    }

    model.sort_unstable();
    model.dedup();
    assert!(set.valid());
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), model);
}
