//! Buffer decoding of the cart container.
//!
//! This module also makes public record parsing functions to allow peeking at
//! header or footer data without fully unpacking the payload.

use bytes::Buf;

use crate::cipher::{DEFAULT_RC4_KEY, Rc4Stream};
use crate::error::{CartError, Result, Stage};
use crate::inflate::{DEFAULT_INFLATE_LIMIT, ZlibInflate};
use crate::metadata::{decode_metadata, JsonMap};

// Constants regarding header and footer encoding
pub(crate) const MANDATORY_HEADER_SIZE: usize = 38;
pub(crate) const MANDATORY_FOOTER_SIZE: usize = 8 * 3 + 4;
const HEADER_MAGIC: &[u8; 4] = b"CART";
const FOOTER_MAGIC: &[u8; 4] = b"TARC";

/// The mandatory fixed size record at the start of every container.
///
/// The version and reserved fields are carried through for inspection but the
/// decoder never branches on them. The embedded key field is whatever the
/// packer chose to record (all zeros when the file was carted with a private
/// key); it is exposed but never used to decrypt, the caller decides what key
/// to trust.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartHeader {
    /// Format version recorded by the packer
    pub version: u16,
    /// Reserved field, ignored
    pub reserved: u64,
    /// The key field as recorded on disk
    pub rc4_key: [u8; 16],
    /// Byte count of the encrypted optional header that follows this record
    pub opt_header_len: u64,
}

/// The mandatory fixed size record at the end of every container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartFooter {
    /// Reserved fields, ignored
    pub reserved: [u64; 2],
    /// Byte count of the encrypted optional footer that precedes this record
    pub opt_footer_len: u64,
}

/// Everything recovered from one container.
#[derive(Debug)]
pub struct UnpackedCart {
    /// The mandatory header record
    pub header: CartHeader,
    /// Decrypted optional header metadata, if the container carried any
    pub optional_header: Option<JsonMap>,
    /// Decrypted optional footer metadata, if the container carried any
    pub optional_footer: Option<JsonMap>,
    /// The raw encrypted payload region, as found in the container
    pub encoded_file: Vec<u8>,
    /// The decrypted and inflated file body
    pub decoded_file: Vec<u8>,
    /// The mandatory footer record
    pub footer: CartFooter,
}

/// Parse the mandatory header record from the front of a buffer.
///
/// Only useful to peek at header information without unpacking the entire
/// container.
pub fn read_header(raw: &[u8]) -> Result<CartHeader> {
    if raw.len() < MANDATORY_HEADER_SIZE {
        return Err(CartError::too_small());
    }
    let mut buffer = &raw[0..MANDATORY_HEADER_SIZE];

    if !buffer.starts_with(HEADER_MAGIC) {
        return Err(CartError::header_magic());
    }
    buffer.advance(HEADER_MAGIC.len());

    let version = buffer.get_u16_le();
    let reserved = buffer.get_u64_le();
    let mut rc4_key = [0u8; 16];
    buffer.copy_to_slice(&mut rc4_key);
    let opt_header_len = buffer.get_u64_le();

    return Ok(CartHeader { version, reserved, rc4_key, opt_header_len })
}

/// Parse the mandatory footer record from the tail of a buffer.
pub fn read_footer(raw: &[u8]) -> Result<CartFooter> {
    if raw.len() < MANDATORY_FOOTER_SIZE {
        return Err(CartError::too_small());
    }
    let mut buffer = &raw[raw.len() - MANDATORY_FOOTER_SIZE..];

    if !buffer.starts_with(FOOTER_MAGIC) {
        return Err(CartError::footer_magic());
    }
    buffer.advance(FOOTER_MAGIC.len());

    let reserved = [buffer.get_u64_le(), buffer.get_u64_le()];
    let opt_footer_len = buffer.get_u64_le();

    return Ok(CartFooter { reserved, opt_footer_len })
}

/// Decode function for an in-memory cart container, with the default limit on
/// decompressed payload size.
///
/// When no key override is given the well known default key is used. The key
/// field embedded in the header is never trusted automatically; pass
/// `Some(&header.rc4_key)` explicitly if that is the key you mean to use.
pub fn unpack_buffer(raw: &[u8], rc4_key_override: Option<&[u8]>) -> Result<UnpackedCart> {
    return unpack_buffer_limited(raw, rc4_key_override, DEFAULT_INFLATE_LIMIT)
}

/// Decode function for an in-memory cart container.
///
/// `max_decoded_size` bounds the inflated payload; exceeding it aborts the
/// decode rather than exhausting memory on a decompression bomb.
pub fn unpack_buffer_limited(raw: &[u8], rc4_key_override: Option<&[u8]>,
    max_decoded_size: u64) -> Result<UnpackedCart>
{
    if raw.len() < MANDATORY_HEADER_SIZE + MANDATORY_FOOTER_SIZE {
        return Err(CartError::too_small());
    }
    let rc4_key: &[u8] = match rc4_key_override {
        Some(key) => key,
        None => &DEFAULT_RC4_KEY,
    };

    let header = read_header(raw)?;

    // All region arithmetic stays in u64 with explicit checks, the length
    // fields come straight from the (possibly hostile) input.
    let header_end = MANDATORY_HEADER_SIZE as u64;
    let footer_start = raw.len() as u64 - MANDATORY_FOOTER_SIZE as u64;

    let payload_start = header_end.checked_add(header.opt_header_len)
        .filter(|end| *end <= footer_start)
        .ok_or_else(CartError::malformed_layout)?;

    let mut optional_header = None;
    if header.opt_header_len > 0 {
        let crypt = &raw[MANDATORY_HEADER_SIZE..payload_start as usize];
        optional_header = Some(decode_metadata(crypt, rc4_key, Stage::OptionalHeader)?);
    }

    let footer = read_footer(raw)?;
    let payload_end = footer_start.checked_sub(footer.opt_footer_len)
        .filter(|start| *start >= header_end)
        .ok_or_else(CartError::malformed_layout)?;

    let mut optional_footer = None;
    if footer.opt_footer_len > 0 {
        let crypt = &raw[payload_end as usize..footer_start as usize];
        optional_footer = Some(decode_metadata(crypt, rc4_key, Stage::OptionalFooter)?);
    }

    // The optional header and footer regions must not overlap
    if payload_start > payload_end {
        return Err(CartError::malformed_layout());
    }
    let encoded_file = raw[payload_start as usize..payload_end as usize].to_vec();

    let mut cipher = Rc4Stream::new(rc4_key, Stage::Payload)?;
    let decrypted = cipher.decrypt_next(&encoded_file)?;

    let mut inflate = ZlibInflate::with_limit(max_decoded_size);
    let decoded_file = inflate.inflate_next(&decrypted)?;

    return Ok(UnpackedCart {
        header,
        optional_header,
        optional_footer,
        encoded_file,
        decoded_file,
        footer,
    })
}
