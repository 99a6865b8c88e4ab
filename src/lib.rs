//! Decoder for the CaRT file format, which is used to store/transfer malware
//! and it's associated metadata.
//!
//! A carted file neuters the malware so it cannot be executed and obfuscates
//! it so anti-virus software cannot flag the container as malware. This crate
//! takes such a container apart again: it parses the mandatory records,
//! decrypts the optional JSON metadata blocks, and decrypts and inflates the
//! payload. Producing containers is out of scope.
//!
//! The default RC4 key is a published constant, so unless a file was carted
//! with a private key the format is obfuscation, not encryption.
//!
//! ```rust
//! use uncart::unpack_buffer;
//!
//! fn main() -> Result<(), uncart::CartError> {
//!     // The smallest possible container: mandatory header and footer only,
//!     // no optional metadata, empty payload.
//!     let mut cart = vec![];
//!     cart.extend_from_slice(b"CART");             // header magic
//!     cart.extend_from_slice(&1u16.to_le_bytes()); // version
//!     cart.extend_from_slice(&[0u8; 8]);           // reserved
//!     cart.extend_from_slice(&[0u8; 16]);          // key field (not trusted on decode)
//!     cart.extend_from_slice(&[0u8; 8]);           // optional header length
//!     cart.extend_from_slice(b"TARC");             // footer magic
//!     cart.extend_from_slice(&[0u8; 24]);          // reserved x2, optional footer length
//!
//!     let unpacked = unpack_buffer(&cart, None)?;
//!     assert!(unpacked.decoded_file.is_empty());
//!     assert!(unpacked.optional_header.is_none());
//!     assert!(unpacked.optional_footer.is_none());
//!
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, non_ascii_idents, trivial_numeric_casts,
    unused_crate_dependencies, noop_method_call, single_use_lifetimes, trivial_casts,
    unused_lifetimes, nonstandard_style, variant_size_differences)]
// #![warn(clippy::pedantic)]
#![deny(keyword_idents)]
#![allow(clippy::needless_return)]

mod cipher;
mod metadata;

pub mod error;
pub mod cart;
pub mod inflate;

pub use cart::{read_footer, read_header, unpack_buffer, unpack_buffer_limited,
    CartFooter, CartHeader, UnpackedCart};
pub use cipher::DEFAULT_RC4_KEY;
pub use error::{CartError, CartErrorKind, Stage};
pub use inflate::DEFAULT_INFLATE_LIMIT;
pub use metadata::JsonMap;
