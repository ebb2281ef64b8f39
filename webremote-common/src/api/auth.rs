//! Request signing via timestamp and keyed hash
//!
//! # Architecture
//!
//! - Every protected request carries `ts` (i64 Unix epoch ms) and `sig`
//! - `sig` is the SipHash-2-4 digest of `"{path}\n{ts}"` under the key derived
//!   from the shared passphrase, as 16 hex characters
//! - The server rejects stale timestamps and replayed signatures; the client
//!   only has to produce a fresh pair per URL
//!
//! # Pure Functions
//!
//! Signing is deterministic given a timestamp. `sign` reads the wall clock,
//! `sign_at` takes the timestamp explicitly.

use tracing::warn;

use super::siphash::{derive_key, hash64, SipKey};
use crate::{time, Error, Result};

// ========================================
// Signature
// ========================================

/// Signature attached to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// 16 lowercase hex characters
    pub sig: String,
    /// Unix epoch milliseconds the signature was made for
    pub ts: i64,
}

impl Signature {
    /// Query string fragment: `sig=<hex>&ts=<ms>`
    pub fn query(&self) -> String {
        format!("sig={}&ts={}", self.sig, self.ts)
    }

    /// Parse a `sig=..&ts=..` query string
    ///
    /// Unknown parameters are ignored; `sig` and `ts` are required.
    ///
    /// # Examples
    ///
    /// ```
    /// use webremote_common::api::Signature;
    ///
    /// let s = Signature::from_query("sig=0d7562af8ad556bc&ts=1700000000000").unwrap();
    /// assert_eq!(s.ts, 1_700_000_000_000);
    /// ```
    pub fn from_query(query: &str) -> Result<Self> {
        let mut sig = None;
        let mut ts = None;

        for pair in query.split('&') {
            match pair.split_once('=') {
                Some(("sig", value)) => sig = Some(value.to_string()),
                Some(("ts", value)) => {
                    ts = Some(value.parse::<i64>().map_err(|e| {
                        Error::InvalidInput(format!("Invalid ts '{}': {}", value, e))
                    })?);
                }
                _ => {}
            }
        }

        match (sig, ts) {
            (Some(sig), Some(ts)) => Ok(Self { sig, ts }),
            (None, _) => Err(Error::InvalidInput("Missing sig parameter".to_string())),
            (_, None) => Err(Error::InvalidInput("Missing ts parameter".to_string())),
        }
    }
}

// ========================================
// Signer
// ========================================

/// Signs request paths with a key derived from the shared passphrase
#[derive(Debug, Clone)]
pub struct Signer {
    key: SipKey,
}

impl Signer {
    /// Create a signer from the shared passphrase
    pub fn new(passphrase: &str) -> Self {
        Self {
            key: derive_key(passphrase),
        }
    }

    /// Create a signer from an already derived key
    pub fn from_key(key: SipKey) -> Self {
        Self { key }
    }

    /// The derived key
    pub fn key(&self) -> &SipKey {
        &self.key
    }

    /// False when no passphrase was configured
    ///
    /// Signing still works with the all-zero key; whether to send such
    /// requests is up to the caller.
    pub fn has_key(&self) -> bool {
        !self.key.is_zero()
    }

    /// Sign `path` with the current wall-clock time
    pub fn sign(&self, path: &str) -> Signature {
        self.sign_at(path, time::now_ms())
    }

    /// Sign `path` for an explicit timestamp
    ///
    /// # Examples
    ///
    /// ```
    /// use webremote_common::api::Signer;
    ///
    /// let signer = Signer::new("hunter2");
    /// let s = signer.sign_at("/ws/player", 1_700_000_000_000);
    /// assert_eq!(s.sig, "0d7562af8ad556bc");
    /// assert_eq!(s.query(), "sig=0d7562af8ad556bc&ts=1700000000000");
    /// ```
    pub fn sign_at(&self, path: &str, ts: i64) -> Signature {
        if !self.has_key() {
            warn!("Signing {} without an access key", path);
        }
        let message = format!("{}\n{}", path, ts);
        Signature {
            sig: hash64(&self.key, message.as_bytes()).to_hex(),
            ts,
        }
    }

    /// `"{path}?sig=..&ts=.."` signed with the current time
    pub fn signed_path(&self, path: &str) -> String {
        self.signed_path_at(path, time::now_ms())
    }

    /// `"{path}?sig=..&ts=.."` signed for an explicit timestamp
    pub fn signed_path_at(&self, path: &str, ts: i64) -> String {
        format!("{}?{}", path, self.sign_at(path, ts).query())
    }

    /// Check that `signature` was produced for `path` with this key
    ///
    /// Only the digest is checked. Timestamp windows and replay detection
    /// belong to the server.
    pub fn verify(&self, path: &str, signature: &Signature) -> bool {
        let message = format!("{}\n{}", path, signature.ts);
        hash64(&self.key, message.as_bytes()).to_hex() == signature.sig
    }
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    const TS: i64 = 1_700_000_000_000;

    #[test]
    fn test_sign_known_vectors() {
        let signer = Signer::new("hunter2");
        assert_eq!(signer.sign_at("/ws/player", TS).sig, "0d7562af8ad556bc");
        assert_eq!(
            signer.sign_at("/entry/current/stream", TS + 123).sig,
            "55c541c48dee0676"
        );
        assert_eq!(
            signer.sign_at("/art/ab/cd1234", TS + 500).sig,
            "d5a2480b333a78d1"
        );
    }

    #[test]
    fn test_sign_without_key_is_defined() {
        let signer = Signer::new("");
        assert!(!signer.has_key());
        assert_eq!(signer.sign_at("/ws/player", TS).sig, "08c043e13c29daf3");
    }

    #[test]
    fn test_signed_path_format() {
        let signer = Signer::new("hunter2");
        assert_eq!(
            signer.signed_path_at("/ws/player", TS),
            "/ws/player?sig=0d7562af8ad556bc&ts=1700000000000"
        );
    }

    #[test]
    fn test_sign_uses_current_time() {
        let signer = Signer::new("hunter2");
        let before = time::now_ms();
        let signature = signer.sign("/ws/player");
        let after = time::now_ms();
        assert!(signature.ts >= before && signature.ts <= after);
        assert_eq!(signature.sig.len(), 16);
        assert!(signer.verify("/ws/player", &signature));
    }

    #[test]
    fn test_verify_rejects_other_path_or_key() {
        let signer = Signer::new("hunter2");
        let signature = signer.sign_at("/ws/player", TS);
        assert!(signer.verify("/ws/player", &signature));
        assert!(!signer.verify("/entry/current/stream", &signature));
        assert!(!Signer::new("hunter3").verify("/ws/player", &signature));

        let shifted = Signature {
            ts: TS + 1,
            ..signature
        };
        assert!(!signer.verify("/ws/player", &shifted));
    }

    #[test]
    fn test_query_round_trip() {
        let signature = Signer::new("hunter2").sign_at("/ws/player", TS);
        let parsed = Signature::from_query(&signature.query()).unwrap();
        assert_eq!(parsed, signature);
    }

    #[test]
    fn test_from_query_errors() {
        assert!(Signature::from_query("ts=1").is_err());
        assert!(Signature::from_query("sig=abc").is_err());
        assert!(Signature::from_query("sig=abc&ts=soon").is_err());
        // Extra parameters are tolerated
        assert!(Signature::from_query("k=default&sig=abc&ts=1").is_ok());
    }
}
