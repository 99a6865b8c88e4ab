//! A thin stream wrapper over the RustCrypto implementation of RC4.

use rc4::{KeyInit, StreamCipher};

use crate::error::{CartError, Result, Stage};

/// Alias for the specific configuration of RC4 that cart uses.
pub(crate) type Rc4 = rc4::Rc4<rc4::consts::U16>;

/// Our default passkey for rc4 is the first 8 digits of PI twice.
///
/// This is a published constant: a cart file keyed with it is obfuscated,
/// not confidential.
pub const DEFAULT_RC4_KEY: [u8; 16] = [
    0x03, 0x01, 0x04, 0x01, 0x05, 0x09, 0x02, 0x06,
    0x03, 0x01, 0x04, 0x01, 0x05, 0x09, 0x02, 0x06
];

/// A keyed RC4 keystream that decrypts successive chunks of one logical stream.
///
/// Repeated [decrypt_next](Self::decrypt_next) calls continue where the previous
/// call left off. The header, footer, and payload of a container are unrelated
/// streams, so each gets its own instance.
pub struct Rc4Stream {
    cipher: Rc4,
    stage: Stage,
}

impl Rc4Stream {
    /// Key a fresh keystream for the given stage of the container.
    ///
    /// The key must be exactly 16 bytes.
    pub(crate) fn new(rc4_key: &[u8], stage: Stage) -> Result<Self> {
        Ok(Self {
            cipher: Rc4::new_from_slice(rc4_key)?,
            stage,
        })
    }

    /// Decrypt the next chunk of ciphertext, advancing the keystream.
    ///
    /// The returned buffer is sized to what the cipher actually produced.
    pub(crate) fn decrypt_next(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = vec![0u8; input.len()];
        if self.cipher.apply_keystream_b2b(input, &mut output).is_err() {
            return Err(CartError::cipher_stream(self.stage));
        }
        return Ok(output);
    }
}
