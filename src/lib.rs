#![doc = include_str!("../README.md")]

// Public modules
pub mod addr;
pub mod cidr;
mod config;
mod error;
mod map;
pub mod net;
mod set;

pub use addr::{from_dots, to_dots, Address};
pub use cidr::{cidr_to_interval, cidr_to_range, interval_to_cidrs, range_to_cidrs, Cidr, Cidrs};
pub use config::{Config, DEFAULT_CAPACITY, DEFAULT_MAX_SPAN};
pub use error::{Error, Result};
pub use map::{Interval, IntervalMap};
pub use set::AddressSet;
