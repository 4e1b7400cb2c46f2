//! Greenbox Core - Shared product types.
//!
//! This crate provides the types shared by every Greenbox component:
//! - `catalog` - Periodic product cache and its HTTP read API
//! - `integration-tests` - End-to-end tests against live upstreams
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no timers. Anything that fetches or schedules lives in `catalog`.
//!
//! # Modules
//!
//! - [`types`] - Product records, IDs and prices
//! - [`transform`] - Raw-to-display record transformation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod transform;
pub mod types;

pub use transform::{capitalize_name, price_to_money, transform};
pub use types::*;
