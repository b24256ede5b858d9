//! Main Crate Error

use std::net::Ipv4Addr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
/// ipv4-ranges crate error enum.
pub enum Error {
    /// The string is not a dotted IPv4 address.
    #[error("Unable to parse {0:?} as an IPv4 address")]
    MalformedAddress(String),

    /// The string is not syntactically a CIDR (`address/prefix`).
    #[error("Unable to parse {0:?} as a CIDR")]
    MalformedCidr(String),

    /// The input is a valid address or CIDR, but an IPv6 one.
    #[error("Not an IPv4 address: {0:?}")]
    NotIpv4(String),

    #[error("left {left} > right {right}")]
    /// An interval whose left edge is after its right edge.
    InvertedRange { left: Ipv4Addr, right: Ipv4Addr },

    #[error("Interval too large: [{left}, {right}] spans more than {max_span} addresses")]
    /// An interval spanning more addresses than the configured maximum.
    RangeTooLarge {
        left: Ipv4Addr,
        right: Ipv4Addr,
        max_span: u64,
    },

    /// Two stored intervals overlap or are out of order.
    ///
    /// Only reported by [crate::IntervalMap::valid], a correct insertion never produces it.
    #[error("Overlapping regions [{prev_left}, {prev_right}] at pos {prev_pos} vs. [{left}, {right}] at pos {pos}")]
    OverlapDetected {
        prev_pos: usize,
        prev_left: Ipv4Addr,
        prev_right: Ipv4Addr,
        pos: usize,
        left: Ipv4Addr,
        right: Ipv4Addr,
    },
}

/// Alias for `Result<T, ipv4_ranges::Error>`.
pub type Result<T, E = Error> = std::result::Result<T, E>;
