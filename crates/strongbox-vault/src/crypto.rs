// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM sealing of individual secret strings.
//!
//! Envelope format (stable, stored in the database):
//!
//! ```text
//! base64( nonce[12] || ciphertext[len(plaintext)] || tag[16] )
//! ```
//!
//! Standard base64 alphabet with padding, no associated data. Every call to
//! [`SecretCipher::encrypt`] draws a fresh 96-bit nonce from the system CSPRNG;
//! nonce reuse under one key would be catastrophic for GCM.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use strongbox_core::StrongboxError;
use zeroize::Zeroizing;

/// Key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;
/// Nonce length in bytes, prefixed to every envelope.
pub const NONCE_LEN: usize = 12;
/// Authentication tag length in bytes, suffixed to every envelope.
pub const TAG_LEN: usize = 16;

/// Process-wide cipher holding the immutable vault key.
///
/// Safe to share behind an `Arc`; no method takes `&mut self`.
pub struct SecretCipher {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl std::fmt::Debug for SecretCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretCipher")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl SecretCipher {
    /// Build a cipher from raw key bytes, which must be exactly [`KEY_LEN`] long.
    pub fn new(key: &[u8]) -> Result<Self, StrongboxError> {
        if key.len() != KEY_LEN {
            return Err(StrongboxError::InvalidKey(format!(
                "expected {KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        let unbound = UnboundKey::new(&AES_256_GCM, key)
            .map_err(|_| StrongboxError::InvalidKey("failed to create AES-256-GCM key".into()))?;
        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Build a cipher from the configured base64 key.
    pub fn from_base64(encoded: &str) -> Result<Self, StrongboxError> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| StrongboxError::InvalidKey(format!("key is not valid base64: {e}")))?,
        );
        Self::new(&bytes)
    }

    /// Seal `plaintext` into a fresh envelope.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, StrongboxError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| StrongboxError::Crypto("failed to generate random nonce".into()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut buf = Zeroizing::new(Vec::with_capacity(NONCE_LEN + plaintext.len() + TAG_LEN));
        buf.extend_from_slice(&nonce_bytes);
        buf.extend_from_slice(plaintext.as_bytes());
        let tag = self
            .key
            .seal_in_place_separate_tag(nonce, Aad::empty(), &mut buf[NONCE_LEN..])
            .map_err(|_| StrongboxError::Crypto("AES-256-GCM encryption failed".into()))?;
        buf.extend_from_slice(tag.as_ref());

        Ok(STANDARD.encode(buf.as_slice()))
    }

    /// Open an envelope produced by [`encrypt`](Self::encrypt).
    ///
    /// Malformed encoding, a truncated payload, a failed tag check and
    /// non-UTF-8 plaintext all yield [`StrongboxError::AuthenticationFailed`].
    pub fn decrypt(&self, envelope: &str) -> Result<SecretString, StrongboxError> {
        let payload = STANDARD
            .decode(envelope)
            .map_err(|_| StrongboxError::AuthenticationFailed("envelope is not valid base64".into()))?;
        if payload.len() < NONCE_LEN + TAG_LEN {
            return Err(StrongboxError::AuthenticationFailed(format!(
                "envelope too short: {} bytes",
                payload.len()
            )));
        }

        let (nonce_bytes, sealed) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| StrongboxError::AuthenticationFailed("malformed nonce".into()))?;

        let mut in_out = Zeroizing::new(sealed.to_vec());
        let plaintext = self
            .key
            .open_in_place(nonce, Aad::empty(), in_out.as_mut_slice())
            .map_err(|_| {
                StrongboxError::AuthenticationFailed("wrong key or corrupted data".into())
            })?;
        let text = std::str::from_utf8(plaintext)
            .map_err(|_| StrongboxError::AuthenticationFailed("plaintext is not UTF-8".into()))?;

        Ok(SecretString::from(text.to_owned()))
    }
}

/// Generate a fresh random key, base64-encoded for the configuration file.
pub fn generate_key() -> Result<String, StrongboxError> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    SystemRandom::new()
        .fill(&mut key[..])
        .map_err(|_| StrongboxError::Crypto("failed to generate random key".into()))?;
    Ok(STANDARD.encode(&key[..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use secrecy::ExposeSecret;
    use strongbox_core::ErrorKind;

    fn cipher() -> SecretCipher {
        SecretCipher::from_base64(&generate_key().unwrap()).unwrap()
    }

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = cipher();
        let envelope = cipher.encrypt("p@ss").unwrap();
        assert_eq!(cipher.decrypt(&envelope).unwrap().expose_secret(), "p@ss");
    }

    #[test]
    fn empty_and_unicode_plaintexts_roundtrip() {
        let cipher = cipher();
        for text in ["", "pässwörd ✓", "日本語のパスワード"] {
            let envelope = cipher.encrypt(text).unwrap();
            assert_eq!(cipher.decrypt(&envelope).unwrap().expose_secret(), text);
        }
    }

    #[test]
    fn envelope_has_documented_layout() {
        let cipher = cipher();
        let envelope = cipher.encrypt("hello").unwrap();
        let raw = STANDARD.decode(envelope).unwrap();
        assert_eq!(raw.len(), NONCE_LEN + "hello".len() + TAG_LEN);
    }

    #[test]
    fn same_plaintext_yields_different_envelopes() {
        let cipher = cipher();
        let a = cipher.encrypt("same input twice").unwrap();
        let b = cipher.encrypt("same input twice").unwrap();
        assert_ne!(a, b);
        let nonce_a = &STANDARD.decode(&a).unwrap()[..NONCE_LEN];
        let nonce_b = &STANDARD.decode(&b).unwrap()[..NONCE_LEN];
        assert_ne!(nonce_a, nonce_b);
    }

    #[test]
    fn every_flipped_byte_fails_authentication() {
        let cipher = cipher();
        let raw = STANDARD.decode(cipher.encrypt("do not tamper").unwrap()).unwrap();
        for i in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            let err = cipher.decrypt(&STANDARD.encode(&tampered)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AuthenticationFailed, "byte {i}");
        }
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let envelope = cipher().encrypt("secret data").unwrap();
        let err = cipher().decrypt(&envelope).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
    }

    #[test]
    fn short_or_garbled_envelopes_fail_authentication() {
        let cipher = cipher();
        let short = STANDARD.encode([0u8; NONCE_LEN + TAG_LEN - 1]);
        for envelope in [short.as_str(), "", "not base64 at all!"] {
            let err = cipher.decrypt(envelope).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        }
    }

    #[test]
    fn key_must_be_32_bytes() {
        for len in [0usize, 16, 31, 33, 64] {
            let err = SecretCipher::new(&vec![7u8; len]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidKey);
        }
        let short = STANDARD.encode([1u8; 16]);
        assert_eq!(
            SecretCipher::from_base64(&short).unwrap_err().kind(),
            ErrorKind::InvalidKey
        );
        assert_eq!(
            SecretCipher::from_base64("***").unwrap_err().kind(),
            ErrorKind::InvalidKey
        );
    }

    #[test]
    fn debug_does_not_leak_key() {
        let debug = format!("{:?}", cipher());
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn generated_keys_differ() {
        assert_ne!(generate_key().unwrap(), generate_key().unwrap());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(text in "\\PC{0,64}") {
            let cipher = cipher();
            let envelope = cipher.encrypt(&text).unwrap();
            let decrypted = cipher.decrypt(&envelope).unwrap();
            prop_assert_eq!(decrypted.expose_secret(), text.as_str());
        }

        #[test]
        fn prop_any_bit_flip_is_rejected(text in "\\PC{0,32}", index in any::<prop::sample::Index>(), bit in 0u8..8) {
            let cipher = cipher();
            let mut raw = STANDARD.decode(cipher.encrypt(&text).unwrap()).unwrap();
            let i = index.index(raw.len());
            raw[i] ^= 1 << bit;
            let err = cipher.decrypt(&STANDARD.encode(&raw)).unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::AuthenticationFailed);
        }
    }
}
