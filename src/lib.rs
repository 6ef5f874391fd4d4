// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_inception)]
#![allow(clippy::new_without_default)]

pub mod cache;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod enrich;
pub mod target;
pub mod vendors;
pub mod verdict;
