use std::io::Read;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_gzip(name: &str, bytes: &[u8]) -> bool {
    name.to_ascii_lowercase().ends_with(".gz") || bytes.starts_with(&GZIP_MAGIC)
}

/// Decodes raw log bytes, inflating gzip archives. Invalid UTF-8 is replaced
/// rather than rejected, server logs are not always clean.
pub fn decode_log_bytes(name: &str, bytes: &[u8]) -> Result<String> {
    if is_gzip(name, bytes) {
        let mut decoder = GzDecoder::new(bytes);
        let mut inflated = Vec::new();
        decoder
            .read_to_end(&mut inflated)
            .with_context(|| format!("failed to inflate {}", name))?;
        return Ok(String::from_utf8_lossy(&inflated).into_owned());
    }
    Ok(String::from_utf8_lossy(bytes).into_owned())
}
