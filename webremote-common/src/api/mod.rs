//! Request authentication shared by every protected endpoint
//!
//! Every URL that reaches a protected resource (control channel handshake,
//! media stream, album art) carries a `sig`/`ts` pair computed from a shared
//! passphrase and the current time.
//!
//! # Design Principle
//!
//! This module contains ONLY pure functions and plain types. No transport or
//! framework dependencies; the client wraps these when it builds URLs.

pub mod auth;
pub mod siphash;

pub use auth::{Signature, Signer};
pub use siphash::{derive_key, hash64, Digest64, SipKey};
