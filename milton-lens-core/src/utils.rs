use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use tracing::debug;

/// truncate a string to a maximum number of characters with ellipsis
///
/// the result never exceeds `max_chars`; caps below 3 leave only dots.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars < 3 {
        return ".".repeat(max_chars);
    }

    let keep = max_chars.saturating_sub(3);
    // char based so multi-byte text never splits mid character
    let end_pos = text
        .char_indices()
        .nth(keep)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len());

    format!("{}...", &text[..end_pos])
}

/// collapse runs of whitespace (including newlines) into single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// decode an entry read from disk or stdin
///
/// honours a byte order mark (utf-8 or utf-16), otherwise expects utf-8 and
/// falls back to windows-1252 for files written by older editors.
pub fn decode_entry_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(bytes) {
        let (cow, _encoding_used, _had_errors) = encoding.decode(bytes);
        return cow.into_owned();
    }

    let (cow, had_errors) = UTF_8.decode_without_bom_handling(bytes);
    if !had_errors {
        return cow.into_owned();
    }

    debug!("entry is not valid utf-8, decoding as windows-1252");
    let (cow, _had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    cow.into_owned()
}
