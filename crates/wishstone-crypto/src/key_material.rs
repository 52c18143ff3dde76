//! AES-128 key and IV material.
//!
//! Values come from the `AES_KEY` and `AES_IV` environment variables. Each
//! is first tried as standard Base64; a value that is not valid Base64 is
//! taken as raw UTF-8 and truncated to 16 bytes. Either way the result must
//! be exactly 16 bytes.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{CryptoError, Result};

/// Key size for AES-128 (128 bits = 16 bytes).
pub const KEY_SIZE: usize = 16;

/// CBC initialisation vector size (one AES block = 16 bytes).
pub const IV_SIZE: usize = 16;

/// Environment variable holding the key.
pub const KEY_ENV: &str = "AES_KEY";

/// Environment variable holding the IV.
pub const IV_ENV: &str = "AES_IV";

/// A validated key/IV pair. Wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    key: [u8; KEY_SIZE],
    iv: [u8; IV_SIZE],
}

impl KeyMaterial {
    /// Wrap raw bytes.
    pub fn new(key: [u8; KEY_SIZE], iv: [u8; IV_SIZE]) -> Self {
        Self { key, iv }
    }

    /// Load from `AES_KEY` / `AES_IV`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let key = lookup(KEY_ENV)
            .filter(|v| !v.is_empty())
            .ok_or(CryptoError::MissingKeyMaterial(KEY_ENV))?;
        let iv = lookup(IV_ENV)
            .filter(|v| !v.is_empty())
            .ok_or(CryptoError::MissingKeyMaterial(IV_ENV))?;
        Self::from_encoded(&key, &iv)
    }

    /// Parse a key and IV from their textual encodings.
    pub fn from_encoded(key: &str, iv: &str) -> Result<Self> {
        let key = decode_exact::<KEY_SIZE>("key", key)?;
        let iv = decode_exact::<IV_SIZE>("iv", iv)?;
        Ok(Self { key, iv })
    }

    /// Fresh random material, for operators setting up a deployment.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        let mut iv = [0u8; IV_SIZE];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut key);
        rng.fill_bytes(&mut iv);
        Self { key, iv }
    }

    /// `AES_KEY=...` and `AES_IV=...` lines in Base64.
    pub fn to_env_lines(&self) -> [String; 2] {
        [
            format!("{KEY_ENV}={}", STANDARD.encode(self.key)),
            format!("{IV_ENV}={}", STANDARD.encode(self.iv)),
        ]
    }

    pub fn key(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }

    pub fn iv(&self) -> &[u8; IV_SIZE] {
        &self.iv
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("key", &"<redacted>")
            .field("iv", &"<redacted>")
            .finish()
    }
}

/// Base64 first, raw UTF-8 prefix second, then insist on exactly `N` bytes.
fn decode_exact<const N: usize>(name: &'static str, encoded: &str) -> Result<[u8; N]> {
    let mut bytes = match STANDARD.decode(encoded.trim()) {
        Ok(decoded) => decoded,
        Err(_) => {
            tracing::debug!("{name} is not Base64, using raw bytes");
            encoded.as_bytes().iter().take(N).copied().collect()
        }
    };

    let result = <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| CryptoError::InvalidKeyLength {
        name,
        expected: N,
        actual: bytes.len(),
    });
    bytes.zeroize();
    result
}
