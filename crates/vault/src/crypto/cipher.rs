//! AES-256-CBC encryption and decryption of individual string fields.
//!
//! **Failure policy:** decryption never raises. A value that cannot be
//! decrypted — malformed hex, bad block alignment, padding failure, invalid
//! UTF-8 — is returned unchanged as a [`Decrypted::Fallback`]. This is what
//! keeps rows written before encryption was introduced readable: a legacy
//! plaintext value simply falls through. The cost is that genuinely corrupted
//! ciphertext is served as if it were plaintext; callers cannot tell the two
//! apart.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use thiserror::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialisation vector (one AES block).
pub const IV_LEN: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Errors produced when constructing [`CipherKeys`].
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key is the wrong length (must be [`KEY_LEN`] bytes).
    #[error("invalid key length: expected {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    /// The IV is the wrong length (must be [`IV_LEN`] bytes).
    #[error("invalid IV length: expected {IV_LEN} bytes, got {0}")]
    InvalidIvLength(usize),
}

/// Key material for the field cipher: a 256-bit key and a 128-bit IV.
///
/// Constructed once at startup from configuration and moved into
/// [`FieldCipher`]. When this type is dropped, the memory is overwritten with
/// zeroes to minimise the window during which key material lives in RAM.
pub struct CipherKeys {
    key: Box<[u8; KEY_LEN]>,
    iv: [u8; IV_LEN],
}

impl CipherKeys {
    /// Build from fixed-size buffers. Infallible; lengths are enforced by type.
    pub fn new(key: Box<[u8; KEY_LEN]>, iv: [u8; IV_LEN]) -> Self {
        Self { key, iv }
    }

    /// Build from byte slices, validating lengths.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] or
    /// [`CipherError::InvalidIvLength`] if either slice has the wrong length.
    pub fn from_slices(key: &[u8], iv: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength(key.len()));
        }
        if iv.len() != IV_LEN {
            return Err(CipherError::InvalidIvLength(iv.len()));
        }
        let mut key_buf = Box::new([0u8; KEY_LEN]);
        key_buf.copy_from_slice(key);
        let mut iv_buf = [0u8; IV_LEN];
        iv_buf.copy_from_slice(iv);
        Ok(Self {
            key: key_buf,
            iv: iv_buf,
        })
    }
}

impl Drop for CipherKeys {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.key.iter_mut().for_each(|b| *b = 0);
        self.iv.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for CipherKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("CipherKeys([REDACTED])")
    }
}

/// Why a stored value could not be decrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptFailure {
    /// The stored value is not valid hexadecimal.
    #[error("value is not valid hex")]
    InvalidHex,

    /// The decoded bytes are not block-aligned or the padding is invalid —
    /// typically because the value was never encrypted in the first place.
    #[error("ciphertext is not block-aligned or padding is invalid")]
    BadCiphertext,

    /// Decryption succeeded mechanically but did not yield valid UTF-8,
    /// which means the value was encrypted under a different key or IV.
    #[error("decrypted bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Outcome of a best-effort decryption.
///
/// [`Decrypted::Fallback`] carries the stored value unchanged together with
/// the reason decryption failed, so callers and tests can observe that the
/// fallback path was taken before collapsing with [`Decrypted::into_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decrypted {
    /// Decryption succeeded; the recovered plaintext.
    Plaintext(String),
    /// Decryption failed; the stored value is passed through unchanged.
    Fallback {
        /// The stored value, exactly as given.
        original: String,
        /// Why decryption failed.
        reason: DecryptFailure,
    },
}

impl Decrypted {
    /// Collapse to the best-effort text: the plaintext on success, the
    /// original stored value on fallback.
    pub fn into_text(self) -> String {
        match self {
            Decrypted::Plaintext(text) => text,
            Decrypted::Fallback { original, .. } => original,
        }
    }

    /// Returns `true` if decryption fell back to the original value.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Decrypted::Fallback { .. })
    }
}

/// Stateless field cipher: AES-256-CBC with PKCS#7 padding, output as
/// lowercase hex.
///
/// Holds only immutable key material; any number of encrypt/decrypt calls may
/// run concurrently across threads without coordination.
pub struct FieldCipher {
    keys: CipherKeys,
}

impl FieldCipher {
    /// Build a cipher from the given key material.
    pub fn new(keys: CipherKeys) -> Self {
        Self { keys }
    }

    /// Encrypt a plaintext string to lowercase hex.
    ///
    /// Deterministic under the fixed key/IV: the same input always yields the
    /// same output. The empty string encrypts to one full padding block, so
    /// the result is never empty.
    pub fn encrypt(&self, plaintext: &str) -> String {
        let ciphertext = Aes256CbcEnc::new(&(*self.keys.key).into(), &self.keys.iv.into())
            .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        hex::encode(ciphertext)
    }

    /// Decrypt a hex ciphertext back to plaintext, best-effort.
    ///
    /// Never fails: any decode or decryption error yields
    /// [`Decrypted::Fallback`] carrying the input unchanged.
    pub fn decrypt(&self, stored: &str) -> Decrypted {
        let bytes = match hex::decode(stored) {
            Ok(b) => b,
            Err(_) => {
                return Decrypted::Fallback {
                    original: stored.to_owned(),
                    reason: DecryptFailure::InvalidHex,
                }
            }
        };

        let plaintext = match Aes256CbcDec::new(&(*self.keys.key).into(), &self.keys.iv.into())
            .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
        {
            Ok(p) => p,
            Err(_) => {
                return Decrypted::Fallback {
                    original: stored.to_owned(),
                    reason: DecryptFailure::BadCiphertext,
                }
            }
        };

        match String::from_utf8(plaintext) {
            Ok(text) => Decrypted::Plaintext(text),
            Err(_) => Decrypted::Fallback {
                original: stored.to_owned(),
                reason: DecryptFailure::InvalidUtf8,
            },
        }
    }
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldCipher([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> FieldCipher {
        FieldCipher::new(CipherKeys::new(Box::new([0x42u8; KEY_LEN]), [0x24u8; IV_LEN]))
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("Este é um texto super secreto!");
        let decrypted = cipher.decrypt(&encrypted);
        assert_eq!(
            decrypted,
            Decrypted::Plaintext("Este é um texto super secreto!".into())
        );
    }

    #[test]
    fn empty_string_round_trip() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("");
        // PKCS#7 always pads, so even "" produces a full block.
        assert_eq!(encrypted.len(), 32);
        assert_eq!(cipher.decrypt(&encrypted), Decrypted::Plaintext("".into()));
    }

    #[test]
    fn ciphertext_is_lowercase_hex_of_even_length() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("Este é um texto super secreto!");
        assert!(encrypted.len() % 2 == 0);
        assert!(encrypted
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(encrypted, "Este é um texto super secreto!");
    }

    #[test]
    fn encryption_is_deterministic() {
        // Intentional consequence of the fixed key/IV — not a security
        // guarantee, but stored values must be stable across rewrites.
        let cipher = test_cipher();
        assert_eq!(cipher.encrypt("same input"), cipher.encrypt("same input"));
    }

    #[test]
    fn non_identity_for_non_empty_input() {
        let cipher = test_cipher();
        for input in ["a", "0123456789abcdef", "justification text"] {
            assert_ne!(cipher.encrypt(input), input);
        }
    }

    #[test]
    fn garbage_input_falls_back_unchanged() {
        let cipher = test_cipher();
        let outcome = cipher.decrypt("not-a-valid-hex-ciphertext");
        assert_eq!(
            outcome,
            Decrypted::Fallback {
                original: "not-a-valid-hex-ciphertext".into(),
                reason: DecryptFailure::InvalidHex,
            }
        );
        assert!(outcome.is_fallback());
        assert_eq!(outcome.into_text(), "not-a-valid-hex-ciphertext");
    }

    #[test]
    fn legacy_plaintext_that_happens_to_be_hex_falls_back() {
        // "abcd" decodes as hex but is not block-aligned.
        let cipher = test_cipher();
        let outcome = cipher.decrypt("abcd");
        assert_eq!(
            outcome,
            Decrypted::Fallback {
                original: "abcd".into(),
                reason: DecryptFailure::BadCiphertext,
            }
        );
    }

    #[test]
    fn wrong_key_does_not_recover_plaintext() {
        let cipher = test_cipher();
        let other = FieldCipher::new(CipherKeys::new(
            Box::new([0x13u8; KEY_LEN]),
            [0x24u8; IV_LEN],
        ));
        let encrypted = cipher.encrypt("Este é um texto super secreto!");
        match other.decrypt(&encrypted) {
            Decrypted::Plaintext(text) => {
                assert_ne!(text, "Este é um texto super secreto!")
            }
            Decrypted::Fallback { original, .. } => assert_eq!(original, encrypted),
        }
    }

    #[test]
    fn multi_byte_characters_survive() {
        let cipher = test_cipher();
        let input = "avaliação — 評価 — 🎯";
        let encrypted = cipher.encrypt(input);
        assert_eq!(cipher.decrypt(&encrypted), Decrypted::Plaintext(input.into()));
    }

    #[test]
    fn from_slices_validates_lengths() {
        assert!(CipherKeys::from_slices(&[0u8; KEY_LEN], &[0u8; IV_LEN]).is_ok());
        assert!(matches!(
            CipherKeys::from_slices(&[0u8; 16], &[0u8; IV_LEN]),
            Err(CipherError::InvalidKeyLength(16))
        ));
        assert!(matches!(
            CipherKeys::from_slices(&[0u8; KEY_LEN], &[0u8; 8]),
            Err(CipherError::InvalidIvLength(8))
        ));
    }

    #[test]
    fn keys_redacted_in_debug() {
        let keys = CipherKeys::new(Box::new([0xFFu8; KEY_LEN]), [0xEEu8; IV_LEN]);
        assert!(format!("{keys:?}").contains("REDACTED"));
        let cipher = FieldCipher::new(keys);
        assert!(format!("{cipher:?}").contains("REDACTED"));
    }
}
