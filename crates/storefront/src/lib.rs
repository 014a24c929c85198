//! Sleep Outside Storefront library.
//!
//! Client-side cart for the storefront: persisted cart state, duplicate
//! reconciliation, totals and list rendering, driven by UI events.
//!
//! # Architecture
//!
//! - [`storage`] - injected key-value store (`get`/`set`/`subscribe`) with
//!   in-memory and on-disk backends
//! - [`cart`] - normalizer, totalizer, renderer, event registry and controller
//! - [`page`] - the display regions the controller writes to
//! - Askama templates for the list, summary and item-count badge

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod filters;
pub mod page;
pub mod storage;
