//! Sorted, duplicate-free set of IPv4 addresses.

use std::iter::FromIterator;
use std::slice::Iter;

use tracing::trace;

use crate::addr::{self, Address};
use crate::Result;

/// A unique set of IPv4 addresses kept in a sorted `Vec<u32>`.
///
/// Lookups and single insertions binary search the vector, bulk insertions
/// append then sort and deduplicate once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddressSet {
    addresses: Vec<Address>,
}

impl AddressSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        AddressSet {
            addresses: Vec::with_capacity(capacity),
        }
    }

    // === Public Methods ===

    /// Insert an address, returns `false` if it was already in the set.
    pub fn insert(&mut self, address: Address) -> bool {
        match self.addresses.binary_search(&address) {
            Ok(_) => false,
            Err(index) => {
                self.addresses.insert(index, address);
                true
            }
        }
    }

    /// Parse and insert a dotted address, returns `Ok(false)` if it already existed.
    pub fn add(&mut self, dots: &str) -> Result<bool> {
        let address = addr::from_dots(dots)?;

        Ok(self.insert(address))
    }

    /// Parse and insert many dotted addresses at once.
    ///
    /// Every entry is parsed before anything is inserted, so a malformed
    /// entry leaves the set unchanged.
    pub fn add_all<S: AsRef<str>>(&mut self, dots: &[S]) -> Result<()> {
        let addresses = dots
            .iter()
            .map(|dots| addr::from_dots(dots.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        self.extend(addresses);
        Ok(())
    }

    /// Returns `true` if the set holds `address`.
    pub fn contains_addr(&self, address: Address) -> bool {
        self.addresses.binary_search(&address).is_ok()
    }

    /// Returns `true` if the set holds a dotted address. Malformed input is never contained.
    pub fn contains(&self, dots: &str) -> bool {
        addr::from_dots(dots).map_or(false, |address| self.contains_addr(address))
    }

    /// Returns `true` if the addresses are strictly ascending.
    pub fn valid(&self) -> bool {
        self.addresses.windows(2).all(|pair| pair[0] < pair[1])
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Address> {
        self.addresses.iter()
    }

    /// Returns the addresses in dotted form, ascending.
    pub fn to_dots(&self) -> Vec<String> {
        self.addresses.iter().copied().map(addr::to_dots).collect()
    }

    // === Private Methods ===

    fn sort(&mut self) {
        self.addresses.sort_unstable();
        self.addresses.dedup();
    }
}

impl Extend<Address> for AddressSet {
    fn extend<T: IntoIterator<Item = Address>>(&mut self, iter: T) {
        let before = self.addresses.len();
        self.addresses.extend(iter);

        trace!(added = self.addresses.len() - before, "Bulk insert");
        self.sort();
    }
}

impl FromIterator<Address> for AddressSet {
    fn from_iter<T: IntoIterator<Item = Address>>(iter: T) -> Self {
        let mut set = AddressSet::new();
        set.extend(iter);
        set
    }
}

impl<'a> IntoIterator for &'a AddressSet {
    type Item = &'a Address;
    type IntoIter = Iter<'a, Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
