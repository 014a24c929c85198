//! Sleep Outside Core - Shared types library.
//!
//! This crate provides the types shared by every Sleep Outside component:
//! - `storefront` - Cart storage, reconciliation and rendering
//! - `cli` - Command-line driver for the cart against an on-disk store
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! backends, no templating. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and quantities, plus the
//!   persisted cart line item record

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
