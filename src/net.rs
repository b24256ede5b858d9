//! Classification of address strings.

use std::net::Ipv4Addr;

use crate::addr;
use crate::cidr::Cidr;

/// Returns `true` for a dotted IPv4 address or an IPv4 CIDR.
pub fn is_ipv4(s: &str) -> bool {
    if s.contains('/') {
        return s.parse::<Cidr>().is_ok();
    }

    addr::from_dots(s).is_ok()
}

/// Returns `true` if the address is not public.
///
/// Not public means loopback, link-local or one of the private subnets
/// `10/8`, `172.16/12` and `192.168/16`. Strings starting with `localhost`
/// or `127.0.0.1:` (host and port) count as well.
pub fn is_private(s: &str) -> bool {
    let private = addr::from_dots(s)
        .map(addr::to_ipv4)
        .map_or(false, is_private_ipv4);

    // Sometimes we get host and port, like localhost:2131231
    private || s.starts_with("localhost") || s.starts_with("127.0.0.1:")
}

fn is_private_ipv4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4() {
        let tests = [
            ("10.0.0.0", true),
            ("10.0.0.0/8", true),
            ("2001:4860:0:2001::68", false),
            ("2001:DB8::/48", false),
            ("false/48", false),
            ("false", false),
            ("", false),
        ];

        for (ip, want) in tests {
            assert_eq!(is_ipv4(ip), want, "is_ipv4({:?})", ip);
        }
    }

    #[test]
    fn private() {
        let tests = [
            ("10.0.0.0", true),
            ("10.255.255.255", true),
            ("192.168.0.0", true),
            ("192.168.255.255", true),
            ("172.16.0.0", true),
            ("172.31.255.255", true),
            ("169.254.0.0", true),
            ("169.254.255.255", true),
            ("127.0.0.1", true),
            ("9.255.255.255", false),
            ("11.0.0.0", false),
            ("192.167.255.255", false),
            ("192.169.0.0", false),
            ("172.15.255.255", false),
            ("172.32.0.0", false),
            ("169.253.255.255", false),
            ("169.255.0.0", false),
            ("localhost", true),
            ("localhost:12312", true),
            ("127.0.0.1:12321", true),
            ("junk", false),
        ];

        for (ip, want) in tests {
            assert_eq!(is_private(ip), want, "is_private({:?})", ip);
        }
    }
}
