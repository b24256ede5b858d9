//! Conversion between CIDR blocks and inclusive address ranges.

use std::{
    fmt::{self, Display, Formatter},
    iter::FusedIterator,
    net::IpAddr,
    str::FromStr,
};

use tracing::trace;

use crate::addr::{self, Address, MAX_ADDRESS};
use crate::{Error, Result};

/// Longest valid IPv4 prefix.
pub const MAX_PREFIX: u8 = 32;

/// Netmask with the top `prefix` bits set.
///
/// `prefix` values above 32 saturate to the full mask.
pub fn mask(prefix: u8) -> u32 {
    match prefix {
        0 => 0,
        p if p >= MAX_PREFIX => u32::MAX,
        p => u32::MAX << (MAX_PREFIX - p),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// An aligned IPv4 network: `network/prefix`.
pub struct Cidr {
    network: Address,
    prefix: u8,
}

impl Cidr {
    /// Create the block of length `prefix` containing `address`.
    ///
    /// The host bits of `address` are cleared, `prefix` is clamped to 32.
    pub fn new(address: Address, prefix: u8) -> Self {
        let prefix = prefix.min(MAX_PREFIX);

        Cidr {
            network: address & mask(prefix),
            prefix,
        }
    }

    /// First address of the block.
    pub fn first(&self) -> Address {
        self.network
    }

    /// Last address of the block (inclusive).
    pub fn last(&self) -> Address {
        self.network | !mask(self.prefix)
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Number of addresses in the block, `2^(32 - prefix)`.
    pub fn size(&self) -> u64 {
        1_u64 << (MAX_PREFIX - self.prefix)
    }

    pub fn contains(&self, address: Address) -> bool {
        address & mask(self.prefix) == self.network
    }
}

impl Display for Cidr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", addr::to_ipv4(self.network), self.prefix)
    }
}

impl FromStr for Cidr {
    type Err = Error;

    /// Parse `a.b.c.d/p`. The address does not need to be aligned.
    fn from_str(s: &str) -> Result<Cidr> {
        let malformed = || Error::MalformedCidr(s.to_string());

        let (ip, prefix) = s.split_once('/').ok_or_else(malformed)?;

        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let prefix: u32 = prefix.parse().map_err(|_| malformed())?;

        match ip.parse::<IpAddr>().map_err(|_| malformed())? {
            IpAddr::V4(ip) => {
                if prefix > MAX_PREFIX as u32 {
                    return Err(malformed());
                }
                Ok(Cidr::new(addr::from_ipv4(ip), prefix as u8))
            }
            IpAddr::V6(_) => {
                if prefix > 128 {
                    return Err(malformed());
                }
                Err(Error::NotIpv4(s.to_string()))
            }
        }
    }
}

/// Convert a CIDR string to the dotted first and last addresses of its block.
///
/// ```
/// let (first, last) = ipv4_ranges::cidr_to_range("199.27.72.0/21").unwrap();
/// assert_eq!(first, "199.27.72.0");
/// assert_eq!(last, "199.27.79.255");
/// ```
pub fn cidr_to_range(cidr: &str) -> Result<(String, String)> {
    let (first, last) = cidr_to_interval(cidr)?;

    Ok((addr::to_dots(first), addr::to_dots(last)))
}

/// Integer version of [cidr_to_range].
pub fn cidr_to_interval(cidr: &str) -> Result<(Address, Address)> {
    let cidr: Cidr = cidr.parse()?;

    Ok((cidr.first(), cidr.last()))
}

/// Decompose a dotted address range into the minimal list of CIDR blocks.
///
/// ```
/// assert_eq!(
///     ipv4_ranges::range_to_cidrs("127.0.0.0", "127.0.0.255").unwrap(),
///     vec!["127.0.0.0/24"]
/// );
/// ```
pub fn range_to_cidrs(left: &str, right: &str) -> Result<Vec<String>> {
    let left = addr::from_dots(left)?;
    let right = addr::from_dots(right)?;

    Ok(interval_to_cidrs(left, right)?
        .map(|cidr| cidr.to_string())
        .collect())
}

/// Decompose the inclusive range `[left, right]` into CIDR blocks.
///
/// The blocks come out in ascending order, are pairwise disjoint, each one is
/// aligned to its own size, and together they cover exactly `[left, right]`.
/// No shorter list of CIDR blocks covers the same range.
pub fn interval_to_cidrs(left: Address, right: Address) -> Result<Cidrs> {
    if left > right {
        return Err(Error::InvertedRange {
            left: addr::to_ipv4(left),
            right: addr::to_ipv4(right),
        });
    }

    trace!(left = %addr::to_ipv4(left), right = %addr::to_ipv4(right), "Decomposing range");

    Ok(Cidrs {
        cursor: Some(left),
        right,
    })
}

/// Lazily produced CIDR blocks of a range, see [interval_to_cidrs].
#[derive(Clone, Debug)]
pub struct Cidrs {
    /// Start of the next block, `None` once the range is exhausted.
    cursor: Option<Address>,
    right: Address,
}

impl Iterator for Cidrs {
    type Item = Cidr;

    fn next(&mut self) -> Option<Cidr> {
        let cursor = self.cursor?;

        if cursor == self.right {
            self.cursor = None;
            return Some(Cidr::new(cursor, MAX_PREFIX));
        }

        // Largest block aligned on `cursor` that still ends within the range.
        let (prefix, last) = (0..=MAX_PREFIX)
            .map(|prefix| (prefix, cursor | !mask(prefix)))
            .find(|&(prefix, last)| cursor & !mask(prefix) == 0 && last <= self.right)
            .unwrap_or((MAX_PREFIX, cursor));

        self.cursor = if last == MAX_ADDRESS || last >= self.right {
            None
        } else {
            Some(last + 1)
        };

        Some(Cidr::new(cursor, prefix))
    }
}

impl FusedIterator for Cidrs {}
