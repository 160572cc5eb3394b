//! Text helpers for field values and diagnostics.

use std::borrow::Cow;
use tracing::debug;

/// Decodes `bytes` as UTF-8, dropping each invalid byte run the decoder reports.
///
/// Every pass removes at least one byte, so the loop ends after at most
/// `bytes.len()` passes. Valid input is borrowed unchanged.
pub fn repair_utf8(bytes: &[u8]) -> Cow<'_, str> {
    let first = match std::str::from_utf8(bytes) {
        Ok(s) => return Cow::Borrowed(s),
        Err(e) => e,
    };

    let mut buf = bytes.to_vec();
    let mut err = first;
    loop {
        let start = err.valid_up_to();
        let end = err.error_len().map_or(buf.len(), |n| start + n);
        debug!(
            start,
            end,
            dropped = %hex_bytes(&buf[start..end]),
            "dropping invalid utf-8 run"
        );
        buf.drain(start..end);
        match String::from_utf8(buf) {
            Ok(s) => return Cow::Owned(s),
            Err(e) => {
                err = e.utf8_error();
                buf = e.into_bytes();
            }
        }
    }
}

/// Decodes a field value: repaired UTF-8 with NUL padding trimmed off.
pub fn decode_field_text(bytes: &[u8]) -> String {
    repair_utf8(bytes).trim_matches('\0').to_owned()
}

/// Formats bytes as dot-separated lowercase hex pairs, e.g. `0a.02`.
pub fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Multi-line hex rendering, 16 bytes per line, each line starting with `prefix`.
pub fn hex_dump(bytes: &[u8], prefix: &str) -> String {
    let mut out = String::new();
    for line in bytes.chunks(16) {
        out.push('\n');
        out.push_str(prefix);
        out.push_str("0x");
        out.push_str(&hex_bytes(line));
    }
    out
}
