//! PocketBase record-store backend.

mod client;
mod dto;
pub mod filter;

pub use client::PocketBaseClient;
pub use filter::{FilterBuilder, identity_filter};
