//! SipHash-2-4 keyed digest and passphrase key derivation
//!
//! The server verifies signatures with its own implementation of the same
//! construction, so the output is a wire format: initialization constants,
//! rotation amounts, round counts and the key folding below must not change.
//!
//! # Key derivation quirk
//!
//! Passphrase words are folded into the key modulo `0xFFFF_FFFF` (2^32 - 1),
//! not modulo 2^32. The verifier does the same, so keys containing large
//! words only match when this is preserved.

use std::fmt;

/// Initialization constants: "somepseudorandomlygeneratedbytes" as four
/// big-endian 64-bit words
const INIT_V0: u64 = 0x736f_6d65_7073_6575;
const INIT_V1: u64 = 0x646f_7261_6e64_6f6d;
const INIT_V2: u64 = 0x6c79_6765_6e65_7261;
const INIT_V3: u64 = 0x7465_6462_7974_6573;

const COMPRESSION_ROUNDS: usize = 2;
const FINALIZATION_ROUNDS: usize = 4;

/// Modulus used when folding passphrase words into the key
const KEY_WORD_MODULUS: u64 = 0xFFFF_FFFF;

// ========================================
// Key
// ========================================

/// 128-bit signing key stored as four little-endian 32-bit words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SipKey([u32; 4]);

impl SipKey {
    /// Build a key from its four words
    pub const fn from_words(words: [u32; 4]) -> Self {
        Self(words)
    }

    /// The four key words
    pub const fn words(&self) -> [u32; 4] {
        self.0
    }

    /// True when every word is zero (empty or missing passphrase)
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }

    /// First 64-bit half (`k0 = w1 << 32 | w0`)
    fn k0(&self) -> u64 {
        (u64::from(self.0[1]) << 32) | u64::from(self.0[0])
    }

    /// Second 64-bit half (`k1 = w3 << 32 | w2`)
    fn k1(&self) -> u64 {
        (u64::from(self.0[3]) << 32) | u64::from(self.0[2])
    }
}

/// Derive a signing key from a passphrase
///
/// The UTF-8 bytes of the passphrase are padded with four NUL bytes and read
/// as little-endian 32-bit words at offsets 0, 4, 8, ... for as long as the
/// offset is inside the unpadded passphrase. Word `n` is added into key word
/// `n mod 4`, each sum reduced modulo `0xFFFF_FFFF`.
///
/// Any passphrase is accepted; the empty passphrase yields the all-zero key.
///
/// # Examples
///
/// ```
/// use webremote_common::api::siphash::derive_key;
///
/// let key = derive_key("hunter2");
/// assert_eq!(key.words(), [0x746e_7568, 0x0032_7265, 0, 0]);
/// assert!(derive_key("").is_zero());
/// ```
pub fn derive_key(passphrase: &str) -> SipKey {
    let bytes = passphrase.as_bytes();
    let mut padded = Vec::with_capacity(bytes.len() + 4);
    padded.extend_from_slice(bytes);
    padded.extend_from_slice(&[0; 4]);

    let mut words = [0u32; 4];
    for (index, offset) in (0..bytes.len()).step_by(4).enumerate() {
        let chunk = [
            padded[offset],
            padded[offset + 1],
            padded[offset + 2],
            padded[offset + 3],
        ];
        let word = u64::from(u32::from_le_bytes(chunk));
        let slot = &mut words[index % 4];
        // Both operands are below 2^32, so the sum fits and the remainder
        // is below 0xFFFF_FFFF.
        *slot = ((u64::from(*slot) + word) % KEY_WORD_MODULUS) as u32;
    }

    SipKey(words)
}

// ========================================
// Digest
// ========================================

/// 64-bit keyed digest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest64(u64);

impl Digest64 {
    /// Full 64-bit value
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Upper 32 bits
    pub const fn high(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Lower 32 bits
    pub const fn low(&self) -> u32 {
        self.0 as u32
    }

    /// 16 lowercase hex characters: high word then low word, zero-padded
    pub fn to_hex(&self) -> String {
        format!("{:08x}{:08x}", self.high(), self.low())
    }
}

impl fmt::Display for Digest64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}{:08x}", self.high(), self.low())
    }
}

// ========================================
// Hash
// ========================================

/// Internal SipHash state (v0..v3)
struct State {
    v0: u64,
    v1: u64,
    v2: u64,
    v3: u64,
}

impl State {
    fn new(key: &SipKey) -> Self {
        let k0 = key.k0();
        let k1 = key.k1();
        Self {
            v0: k0 ^ INIT_V0,
            v1: k1 ^ INIT_V1,
            v2: k0 ^ INIT_V2,
            v3: k1 ^ INIT_V3,
        }
    }

    /// One SipRound
    #[inline]
    fn round(&mut self) {
        self.v0 = self.v0.wrapping_add(self.v1);
        self.v2 = self.v2.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(13);
        self.v3 = self.v3.rotate_left(16);
        self.v1 ^= self.v0;
        self.v3 ^= self.v2;
        self.v0 = self.v0.rotate_left(32);

        self.v2 = self.v2.wrapping_add(self.v1);
        self.v0 = self.v0.wrapping_add(self.v3);
        self.v1 = self.v1.rotate_left(17);
        self.v3 = self.v3.rotate_left(21);
        self.v1 ^= self.v2;
        self.v3 ^= self.v0;
        self.v2 = self.v2.rotate_left(32);
    }

    fn compress(&mut self, block: u64) {
        self.v3 ^= block;
        for _ in 0..COMPRESSION_ROUNDS {
            self.round();
        }
        self.v0 ^= block;
    }

    fn finish(mut self) -> u64 {
        self.v2 ^= 0xff;
        for _ in 0..FINALIZATION_ROUNDS {
            self.round();
        }
        self.v0 ^ self.v1 ^ self.v2 ^ self.v3
    }
}

/// Compute the SipHash-2-4 digest of `message` under `key`
///
/// # Algorithm
///
/// 1. Initialize v0..v3 from the key halves XORed with the constants
/// 2. For every full 8-byte little-endian block: `v3 ^= m`, 2 rounds, `v0 ^= m`
/// 3. Final block holds the 0-7 trailing bytes with `len mod 256` in the top byte
/// 4. `v2 ^= 0xff`, 4 rounds
/// 5. Output `v0 ^ v1 ^ v2 ^ v3`
///
/// # Examples
///
/// ```
/// use webremote_common::api::siphash::{hash64, SipKey};
///
/// // Reference key 00 01 02 .. 0f
/// let key = SipKey::from_words([0x0302_0100, 0x0706_0504, 0x0b0a_0908, 0x0f0e_0d0c]);
/// assert_eq!(hash64(&key, b"").to_hex(), "726fdb47dd0e0e31");
/// ```
pub fn hash64(key: &SipKey, message: &[u8]) -> Digest64 {
    let mut state = State::new(key);

    let mut blocks = message.chunks_exact(8);
    for block in &mut blocks {
        let mut word = [0u8; 8];
        word.copy_from_slice(block);
        state.compress(u64::from_le_bytes(word));
    }

    let tail = blocks.remainder();
    let mut last = [0u8; 8];
    last[..tail.len()].copy_from_slice(tail);
    last[7] = (message.len() % 256) as u8;
    state.compress(u64::from_le_bytes(last));

    Digest64(state.finish())
}

// ========================================
// Tests
// ========================================
