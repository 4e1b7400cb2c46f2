//! Core types for Greenbox.
//!
//! This module provides type-safe wrappers for the product domain.

pub mod id;
pub mod price;
pub mod product;

pub use id::ProductId;
pub use price::{CurrencyCode, Price};
pub use product::{DisplayProduct, RawProduct};
