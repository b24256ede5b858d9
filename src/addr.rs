//! Conversions between dotted IPv4 strings and `u32` addresses.
//!
//! Addresses are kept in network byte order (most significant octet first),
//! so comparing two `u32` values orders them like their dotted forms.

use std::net::{IpAddr, Ipv4Addr};

use crate::{Error, Result};

/// An IPv4 address as a big-endian `u32`.
pub type Address = u32;

/// The last representable IPv4 address, `255.255.255.255`.
pub const MAX_ADDRESS: Address = u32::MAX;

/// Parse a dotted IPv4 address such as `"10.0.0.1"`.
///
/// IPv4-mapped IPv6 addresses (`::ffff:10.0.0.1`) are reduced to their IPv4 form,
/// any other IPv6 address is rejected with [Error::NotIpv4].
pub fn from_dots(dots: &str) -> Result<Address> {
    match dots.parse::<IpAddr>() {
        Ok(ip) => from_ip(ip).map_err(|_| Error::NotIpv4(dots.to_string())),
        Err(_) => Err(Error::MalformedAddress(dots.to_string())),
    }
}

/// Render an address in the four-octet dotted form.
pub fn to_dots(address: Address) -> String {
    to_ipv4(address).to_string()
}

/// Convert any [IpAddr] to an address, failing for non IPv4-mapped IPv6 addresses.
pub fn from_ip(ip: IpAddr) -> Result<Address> {
    match ip {
        IpAddr::V4(ip) => Ok(from_ipv4(ip)),
        IpAddr::V6(ip) => match ip.to_ipv4_mapped() {
            Some(ip) => Ok(from_ipv4(ip)),
            None => Err(Error::NotIpv4(ip.to_string())),
        },
    }
}

pub fn from_ipv4(ip: Ipv4Addr) -> Address {
    u32::from_be_bytes(ip.octets())
}

pub fn to_ipv4(address: Address) -> Ipv4Addr {
    Ipv4Addr::from(address.to_be_bytes())
}
