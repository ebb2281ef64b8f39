//! # Web Remote Common Library
//!
//! Shared code for the web remote control client including:
//! - Request signing (SipHash-2-4 keyed digest over path + timestamp)
//! - Control-channel wire protocol (actions and sparse snapshots)
//! - Configuration loading
//! - Time utilities and track time formatting

pub mod api;
pub mod config;
pub mod error;
pub mod human_time;
pub mod protocol;
pub mod time;

pub use api::{derive_key, hash64, Digest64, SipKey, Signature, Signer};
pub use error::{Error, Result};
