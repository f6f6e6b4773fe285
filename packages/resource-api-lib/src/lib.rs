//! # resource-api-lib
//!
//! `resource-api-lib` is a collection of utilities used by the various `resource-api-*` crates.

#![deny(unused_crate_dependencies)]

pub mod config;
pub mod defaults;
pub mod utils;
