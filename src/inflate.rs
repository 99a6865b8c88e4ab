//! Streaming zlib decompression built on the low level flate2 engine.

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{CartError, Result};

/// Working buffer size for one inflate round.
pub(crate) const BLOCK_SIZE: usize = 64 * 1024;

/// Ceiling on decompressed payload size unless the caller raises it.
///
/// A carted file controls its own compression ratio, so an unbounded inflate
/// is a decompression bomb waiting to happen.
pub const DEFAULT_INFLATE_LIMIT: u64 = 4 * 1024 * 1024 * 1024;

/// A single use zlib inflate stream for one container payload.
///
/// Output is accumulated in [BLOCK_SIZE] rounds until the input chunk is
/// exhausted or the deflate stream reports its end. Reaching the end of the
/// stream with input bytes left over means the payload boundary was computed
/// wrong or the container is corrupt, and is a hard error.
pub struct ZlibInflate {
    engine: Decompress,
    max_output: u64,
    finished: bool,
}

impl ZlibInflate {
    /// Create an inflate stream with the default output ceiling.
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_INFLATE_LIMIT)
    }

    /// Create an inflate stream that errors once decompressed output
    /// exceeds `max_output` bytes.
    pub fn with_limit(max_output: u64) -> Self {
        Self {
            // true: the payload carries a zlib header and checksum
            engine: Decompress::new(true),
            max_output,
            finished: false,
        }
    }

    /// Inflate the next chunk of compressed data, returning all output it
    /// produced.
    ///
    /// Once the stream has ended cleanly, further calls with an empty chunk
    /// are a no-op rather than an error; a non-empty chunk after the end is
    /// trailing data.
    pub fn inflate_next(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        if self.finished {
            if input.is_empty() {
                return Ok(vec![]);
            }
            return Err(CartError::trailing_data());
        }

        let mut output = vec![];
        let mut round = vec![0u8; BLOCK_SIZE];
        let mut offset = 0;
        loop {
            let in_before = self.engine.total_in();
            let out_before = self.engine.total_out();
            let status = self.engine
                .decompress(&input[offset..], &mut round, FlushDecompress::Sync)
                .map_err(CartError::inflate)?;
            let consumed = (self.engine.total_in() - in_before) as usize;
            let produced = (self.engine.total_out() - out_before) as usize;
            offset += consumed;
            output.extend_from_slice(&round[0..produced]);

            if output.len() as u64 > self.max_output {
                return Err(CartError::inflate_limit(self.max_output));
            }

            match status {
                Status::StreamEnd => {
                    if offset < input.len() {
                        return Err(CartError::trailing_data());
                    }
                    self.finished = true;
                    return Ok(output);
                }
                // Keep going only while input remains and the last round
                // filled the whole output buffer.
                Status::Ok | Status::BufError => {
                    if offset >= input.len() || produced < round.len() {
                        return Ok(output);
                    }
                }
            }
        }
    }
}

impl Default for ZlibInflate {
    fn default() -> Self {
        Self::new()
    }
}
