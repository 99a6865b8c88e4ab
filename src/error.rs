//! Error handling structures

/// Lightweight error type that contains only a pointer to more details.
#[derive(Debug)]
pub struct CartError(pub Box<CartErrorKind>);

/// Which part of the container an error was detected in.
///
/// Useful for telling a wrong key apart from structural corruption: a wrong
/// key decrypts cleanly and then fails JSON parsing or inflation on garbage,
/// while a truncated or rewritten file usually fails layout checks first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The encrypted JSON block following the mandatory header
    OptionalHeader,
    /// The encrypted JSON block preceding the mandatory footer
    OptionalFooter,
    /// The encrypted compressed file body
    Payload,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::OptionalHeader => "optional header",
            Stage::OptionalFooter => "optional footer",
            Stage::Payload => "payload",
        })
    }
}

/// Detailed error type that contains cause of error.
#[derive(Debug)]
pub enum CartErrorKind {
    /// Input shorter than the mandatory header plus footer
    TooSmall,
    /// Optional length fields describe a negative or out of bounds payload region
    MalformedLayout,
    /// The mandatory header does not start with the CART magic
    HeaderMagic,
    /// The mandatory footer does not start with the TARC magic
    FooterMagic,
    /// Parameter issue
    Rc4KeyLength,
    /// Likely data corruption issue
    Rc4Stream(Stage),
    /// The decompression engine rejected the payload mid-stream
    Inflate(String),
    /// Decompressed output exceeded the configured ceiling
    InflateLimit(u64),
    /// Decompression completed while payload bytes remained
    TrailingData,
    /// Decrypted optional header or footer is not a valid JSON object
    MetadataParse(Stage, serde_json::Error),
}

impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CartErrorKind::*;
        match self.0.as_ref() {
            TooSmall => f.write_str("Provided CaRT data is not big enough for at least the mandatory header and footer; this is probably not a full CaRT file."),
            MalformedLayout => f.write_str("The optional header or footer length fields do not leave a valid payload region."),
            HeaderMagic => f.write_str("The manditory header data was corrupt."),
            FooterMagic => f.write_str("The manditory footer data was corrupt."),
            Rc4KeyLength => f.write_str("RC4 key must be 16 bytes."),
            Rc4Stream(stage) => f.write_fmt(format_args!("The {stage} stream is corrupted or unreadable.")),
            Inflate(msg) => f.write_fmt(format_args!("Error while inflating: {msg}")),
            InflateLimit(limit) => f.write_fmt(format_args!("Decompressed payload exceeded the {limit} byte limit.")),
            TrailingData => f.write_str("Trailing data was present after zlib decompression completed."),
            MetadataParse(stage, err) => f.write_fmt(format_args!("CaRT {stage} did not parse as valid JSON: {err}")),
        }
    }
}

impl std::error::Error for CartError {}

impl CartError {
    /// Borrow the detailed error kind.
    pub fn kind(&self) -> &CartErrorKind {
        &self.0
    }

    pub(crate) fn too_small() -> Self {
        Self(Box::new(CartErrorKind::TooSmall))
    }
    pub(crate) fn malformed_layout() -> Self {
        Self(Box::new(CartErrorKind::MalformedLayout))
    }
    pub(crate) fn header_magic() -> Self {
        Self(Box::new(CartErrorKind::HeaderMagic))
    }
    pub(crate) fn footer_magic() -> Self {
        Self(Box::new(CartErrorKind::FooterMagic))
    }
    pub(crate) fn cipher_stream(stage: Stage) -> Self {
        Self(Box::new(CartErrorKind::Rc4Stream(stage)))
    }
    pub(crate) fn inflate(err: flate2::DecompressError) -> Self {
        let msg = err.message().unwrap_or("unknown zlib error").to_owned();
        Self(Box::new(CartErrorKind::Inflate(msg)))
    }
    pub(crate) fn inflate_limit(limit: u64) -> Self {
        Self(Box::new(CartErrorKind::InflateLimit(limit)))
    }
    pub(crate) fn trailing_data() -> Self {
        Self(Box::new(CartErrorKind::TrailingData))
    }
    pub(crate) fn metadata_parse(stage: Stage, err: serde_json::Error) -> Self {
        Self(Box::new(CartErrorKind::MetadataParse(stage, err)))
    }
}

impl From<rc4::cipher::InvalidLength> for CartError {
    fn from(_: rc4::cipher::InvalidLength) -> Self { Self(Box::new(CartErrorKind::Rc4KeyLength)) }
}

/// Alias for result that always uses CartError
pub type Result<T> = std::result::Result<T, CartError>;
