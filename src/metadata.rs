//! Decoding of the encrypted JSON metadata blocks.

use crate::cipher::Rc4Stream;
use crate::error::{CartError, Result, Stage};

/// Alias for a serde mapping cart will accept for metadata.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Decrypt and parse one optional header or footer block.
///
/// Each block is an independent RC4 stream under the container key, so a
/// fresh cipher instance is keyed per call. Decryption is a keystream xor
/// and succeeds on any input; a wrong key shows up here as a JSON parse
/// failure on the garbage plaintext.
pub(crate) fn decode_metadata(ciphertext: &[u8], rc4_key: &[u8], stage: Stage) -> Result<JsonMap> {
    let mut cipher = Rc4Stream::new(rc4_key, stage)?;
    let plain = cipher.decrypt_next(ciphertext)?;
    return serde_json::from_slice(&plain).map_err(|err| CartError::metadata_parse(stage, err));
}

#[cfg(test)]
mod tests {
    use super::{decode_metadata, JsonMap};
    use crate::cipher::{DEFAULT_RC4_KEY, Rc4Stream};
    use crate::error::{CartErrorKind, Stage};

    fn encrypt_json(metadata: &JsonMap, rc4_key: &[u8]) -> Vec<u8> {
        let plain = serde_json::to_vec(metadata).unwrap();
        let mut cipher = Rc4Stream::new(rc4_key, Stage::OptionalHeader).unwrap();
        cipher.decrypt_next(&plain).unwrap()
    }

    #[test]
    fn round_trip() {
        let mut metadata = JsonMap::new();
        metadata.insert("name".to_owned(), serde_json::json!("txtFile1"));
        metadata.insert("entropy".to_owned(), serde_json::json!(5.0));

        let crypt = encrypt_json(&metadata, &DEFAULT_RC4_KEY);
        let decoded = decode_metadata(&crypt, &DEFAULT_RC4_KEY, Stage::OptionalHeader).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn empty_object_is_valid() {
        let crypt = encrypt_json(&JsonMap::new(), &DEFAULT_RC4_KEY);
        let decoded = decode_metadata(&crypt, &DEFAULT_RC4_KEY, Stage::OptionalFooter).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn wrong_key_is_a_parse_error() {
        let mut metadata = JsonMap::new();
        metadata.insert("name".to_owned(), serde_json::json!("txtFile1"));

        let crypt = encrypt_json(&metadata, b"0123456789abcdef");
        let err = decode_metadata(&crypt, &DEFAULT_RC4_KEY, Stage::OptionalFooter).unwrap_err();
        assert!(matches!(err.kind(), CartErrorKind::MetadataParse(Stage::OptionalFooter, _)));
    }
}
