//! Core types for Sleep Outside.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod quantity;

pub use cart::{CartLineItem, ProductColor, ProductImages};
pub use id::*;
pub use price::{Price, PriceError};
pub use quantity::Quantity;
