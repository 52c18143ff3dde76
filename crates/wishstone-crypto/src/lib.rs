//! # wishstone-crypto
//!
//! Write-only protection of client IP addresses.
//!
//! Stored IPs are never decrypted. The ciphertext exists so that two
//! submissions from the same address can be matched by plain string
//! equality, which is what the per-IP quota check relies on. That only
//! works because the cipher is deterministic: a fixed key and a fixed IV
//! for the lifetime of the process. Identical plaintexts therefore produce
//! identical ciphertexts, which also leaks equality to anyone holding the
//! table. This is accepted. The [`IpCipher`] trait is the seam where a keyed
//! hash (e.g. HMAC) could replace encryption without touching callers.
//!
//! ## Modules
//!
//! - [`aes_cbc`]: AES-128/CBC/PKCS#7 with Base64 output
//! - [`key_material`]: loading, validation and generation of the 16-byte key and IV

pub mod aes_cbc;
pub mod key_material;

pub use aes_cbc::AesCbcCipher;
pub use key_material::KeyMaterial;

/// Error types for cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// A required environment variable is unset or empty.
    #[error("missing key material: {0} is not set")]
    MissingKeyMaterial(&'static str),

    /// Decoded key or IV is not exactly 16 bytes.
    #[error("invalid {name} length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The block cipher rejected its inputs.
    #[error("encryption failed: {0}")]
    Encryption(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Deterministic one-way protection of a plaintext string.
///
/// Implementations must guarantee `encrypt(a) == encrypt(b)` exactly when
/// `a == b` for the lifetime of the instance. No inverse is offered.
pub trait IpCipher: Send + Sync {
    /// Protect `plaintext`, returning a printable token.
    fn encrypt(&self, plaintext: &str) -> Result<String>;
}
