//! Map of disjoint, value-tagged IPv4 intervals.

use std::fmt::{self, Debug, Display, Formatter, Write};
use std::slice::Iter;

use tracing::{debug, trace};

use crate::addr::{self, Address};
use crate::cidr;
use crate::config::Config;
use crate::{Error, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
/// A closed interval `[left, right]` of addresses carrying a value.
pub struct Interval<V> {
    pub left: Address,
    pub right: Address,
    pub value: V,
}

impl<V> Interval<V> {
    pub fn new(left: Address, right: Address, value: V) -> Self {
        Interval { left, right, value }
    }

    pub fn contains(&self, address: Address) -> bool {
        self.left <= address && address <= self.right
    }

    /// Number of addresses in the interval.
    pub fn span(&self) -> u64 {
        span(self.left, self.right)
    }
}

impl<V: Display> Display for Interval<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]={}",
            addr::to_ipv4(self.left),
            addr::to_ipv4(self.right),
            self.value
        )
    }
}

/// A set of disjoint intervals, each mapped to a value.
///
/// After every public operation the intervals are sorted by `left`, never
/// overlap, never span more than [Config::max_span] addresses, and two
/// touching intervals never carry equal values (those are coalesced).
///
/// Overlapping insertions are merged into the interval with the smallest
/// `left`, keeping that interval's value. When both start at the same
/// address the interval already in the map wins.
#[derive(Clone, Debug)]
pub struct IntervalMap<V> {
    intervals: Vec<Interval<V>>,
    config: Config,
}

/// Result of coalescing a new interval into its neighbourhood, computed
/// before anything is moved.
struct Merge {
    /// Stored intervals `start..end` are replaced by the merged one.
    start: usize,
    end: usize,
    left: Address,
    right: Address,
    /// Whether the merged interval keeps the value stored at `start`.
    keeps_stored_value: bool,
}

impl<V> IntervalMap<V> {
    /// Create an empty map with the default [Config].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty map with room for `capacity` intervals.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(Config {
            capacity,
            ..Config::default()
        })
    }

    pub fn with_config(config: Config) -> Self {
        IntervalMap {
            intervals: Vec::with_capacity(config.capacity),
            config,
        }
    }

    // === Getters ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the stored intervals, sorted by `left`.
    pub fn intervals(&self) -> &[Interval<V>] {
        &self.intervals
    }

    pub fn iter(&self) -> Iter<'_, Interval<V>> {
        self.intervals.iter()
    }

    /// Number of disjoint intervals in the map.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    // === Lookups ===

    /// Returns the value of the interval containing `address`, if any.
    pub fn get(&self, address: Address) -> Option<&V> {
        let intervals = &self.intervals;
        let i = intervals.partition_point(|interval| interval.left < address);

        // Past the end, only the last interval can still contain it.
        if i == intervals.len() {
            let last = intervals.last()?;
            return last.contains(address).then(|| &last.value);
        }

        if intervals[i].left == address {
            return Some(&intervals[i].value);
        }

        if i == 0 {
            return None;
        }

        let prev = &intervals[i - 1];
        prev.contains(address).then(|| &prev.value)
    }

    /// Returns the value of the interval containing a dotted address.
    ///
    /// Malformed input is never contained.
    pub fn contains(&self, dots: &str) -> Option<&V> {
        let address = addr::from_dots(dots).ok()?;

        self.get(address)
    }

    // === Validation ===

    /// Audit the stored intervals: each one well formed and within the span
    /// limit, and every pair strictly ordered without overlap.
    pub fn valid(&self) -> Result<()> {
        let mut prev: Option<(usize, &Interval<V>)> = None;

        for (pos, interval) in self.intervals.iter().enumerate() {
            self.check_interval(interval.left, interval.right)?;

            if let Some((prev_pos, prev)) = prev {
                check_order(
                    prev_pos,
                    prev.left,
                    prev.right,
                    pos,
                    interval.left,
                    interval.right,
                )?;
            }
            prev = Some((pos, interval));
        }

        Ok(())
    }

    fn check_interval(&self, left: Address, right: Address) -> Result<()> {
        if left > right {
            return Err(Error::InvertedRange {
                left: addr::to_ipv4(left),
                right: addr::to_ipv4(right),
            });
        }

        if span(left, right) > self.config.max_span {
            return Err(Error::RangeTooLarge {
                left: addr::to_ipv4(left),
                right: addr::to_ipv4(right),
                max_span: self.config.max_span,
            });
        }

        Ok(())
    }
}

impl<V: PartialEq> IntervalMap<V> {
    // === Insertion ===

    /// Insert the closed interval `[left, right]` with `value`, coalescing it
    /// with the intervals it overlaps or continues.
    ///
    /// On error the map is left untouched.
    pub fn add(&mut self, left: Address, right: Address, value: V) -> Result<()> {
        trace!(left = %addr::to_ipv4(left), right = %addr::to_ipv4(right), "Adding interval");

        if let Err(error) = self.check_interval(left, right) {
            debug!(?error, "Rejected interval");
            return Err(error);
        }

        let merge = match self.plan_merge(left, right, &value) {
            Some(merge) => merge,
            None => {
                trace!("Interval already covered");
                return Ok(());
            }
        };

        if let Err(error) = self.check_merge(&merge) {
            debug!(?error, "Rejected coalesced interval");
            return Err(error);
        }

        let mut removed = self.intervals.drain(merge.start..merge.end);
        let value = match removed.next() {
            Some(stored) if merge.keeps_stored_value => stored.value,
            _ => value,
        };
        drop(removed);

        self.intervals
            .insert(merge.start, Interval::new(merge.left, merge.right, value));

        debug_assert!(self.valid().is_ok(), "{:?}", self.valid());

        Ok(())
    }

    /// Insert a single dotted address, or a CIDR block if `spec` contains a `/`.
    pub fn add_by_address_or_cidr(&mut self, spec: &str, value: V) -> Result<()> {
        let (left, right) = if spec.contains('/') {
            cidr::cidr_to_interval(spec)?
        } else {
            let address = addr::from_dots(spec)?;
            (address, address)
        };

        self.add(left, right, value)
    }

    /// Insert the range between two dotted addresses, both inclusive.
    pub fn add_by_range(&mut self, left: &str, right: &str, value: V) -> Result<()> {
        let left = addr::from_dots(left)?;
        let right = addr::from_dots(right)?;

        self.add(left, right, value)
    }

    /// Coalesce `[left, right]` into the stored intervals without moving
    /// anything.
    ///
    /// Returns `None` if an existing interval already covers it.
    fn plan_merge(&self, left: Address, right: Address, value: &V) -> Option<Merge> {
        let intervals = &self.intervals;

        // New intervals go after stored ones with the same `left`.
        let pos = intervals.partition_point(|interval| interval.left <= left);

        let mut merge = Merge {
            start: pos,
            end: pos,
            left,
            right,
            keeps_stored_value: false,
        };

        if pos > 0 {
            let prev = &intervals[pos - 1];

            if right <= prev.right {
                return None;
            }

            if left <= prev.right || (continues(prev.right, left) && prev.value == *value) {
                merge.start = pos - 1;
                merge.left = prev.left;
                merge.keeps_stored_value = true;
            }
        }

        let merged_value = if merge.keeps_stored_value {
            &intervals[merge.start].value
        } else {
            value
        };

        for next in &intervals[pos..] {
            if next.left <= merge.right {
                merge.right = merge.right.max(next.right);
            } else if continues(merge.right, next.left) && next.value == *merged_value {
                merge.right = next.right;
            } else {
                break;
            }
            merge.end += 1;
        }

        Some(merge)
    }

    /// Check the merged interval on its own and against its future neighbours.
    fn check_merge(&self, merge: &Merge) -> Result<()> {
        self.check_interval(merge.left, merge.right)?;

        if let Some(prev) = merge.start.checked_sub(1).map(|i| &self.intervals[i]) {
            check_order(
                merge.start - 1,
                prev.left,
                prev.right,
                merge.start,
                merge.left,
                merge.right,
            )?;
        }
        if let Some(next) = self.intervals.get(merge.end) {
            check_order(
                merge.start,
                merge.left,
                merge.right,
                merge.start + 1,
                next.left,
                next.right,
            )?;
        }

        Ok(())
    }
}

impl<V: Debug> IntervalMap<V> {
    /// Render the map as Rust-literal-like text for debugging.
    ///
    /// Not meant to be parsed back.
    pub fn dump(&self) -> String {
        let mut out = String::from("IntervalMap {\n    intervals: vec![\n");

        for interval in &self.intervals {
            let _ = writeln!(
                out,
                "        {:?}, // [{}, {}]",
                interval,
                addr::to_ipv4(interval.left),
                addr::to_ipv4(interval.right)
            );
        }

        out.push_str("    ],\n}");
        out
    }
}

impl<V> Default for IntervalMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Display> Display for IntervalMap<V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (pos, interval) in self.intervals.iter().enumerate() {
            writeln!(f, "{}: {}", pos, interval)?;
        }
        Ok(())
    }
}

impl<'a, V> IntoIterator for &'a IntervalMap<V> {
    type Item = &'a Interval<V>;
    type IntoIter = Iter<'a, Interval<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn span(left: Address, right: Address) -> u64 {
    u64::from(right.saturating_sub(left)) + 1
}

/// `true` if `next` is the address right after `right`.
fn continues(right: Address, next: Address) -> bool {
    right.checked_add(1) == Some(next)
}

fn check_order(
    prev_pos: usize,
    prev_left: Address,
    prev_right: Address,
    pos: usize,
    left: Address,
    right: Address,
) -> Result<()> {
    if left <= prev_right || right <= prev_right {
        return Err(Error::OverlapDetected {
            prev_pos,
            prev_left: addr::to_ipv4(prev_left),
            prev_right: addr::to_ipv4(prev_right),
            pos,
            left: addr::to_ipv4(left),
            right: addr::to_ipv4(right),
        });
    }

    Ok(())
}
