//! AES-128/CBC with PKCS#7 padding and a fixed IV.
//!
//! Output is the standard Base64 encoding of the ciphertext. The same
//! plaintext always encrypts to the same string under one [`KeyMaterial`].

use aes::Aes128;
use base64::{engine::general_purpose::STANDARD, Engine};
use cbc::cipher::{block_padding::Pkcs7, BlockEncryptMut, KeyIvInit};

use crate::{CryptoError, IpCipher, KeyMaterial, Result};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// Encrypt-only AES-128/CBC cipher bound to one key and IV.
#[derive(Debug, Clone)]
pub struct AesCbcCipher {
    material: KeyMaterial,
}

impl AesCbcCipher {
    /// Bind a cipher to validated key material.
    pub fn new(material: KeyMaterial) -> Self {
        Self { material }
    }

    /// Raw ciphertext bytes of `plaintext`.
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        // CBC state is consumed by each message, so a fresh encryptor is built per call.
        let encryptor = Aes128CbcEnc::new_from_slices(self.material.key(), self.material.iv())
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;
        Ok(encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
    }
}

impl IpCipher for AesCbcCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let ciphertext = self.encrypt_bytes(plaintext.as_bytes())?;
        Ok(STANDARD.encode(ciphertext))
    }
}
