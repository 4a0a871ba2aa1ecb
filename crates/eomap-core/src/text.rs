//! Text payloads: the map name and sign title/message.

/// Reversible byte transform applied to every text field of an EMF file.
///
/// `encode` runs on save and `decode` on load; `decode(encode(b)) == b` must
/// hold for any byte string.
pub trait StringTransform {
    fn encode(&self, bytes: &[u8]) -> Vec<u8>;
    fn decode(&self, bytes: &[u8]) -> Vec<u8>;
}

/// Identity transform: text is stored as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl StringTransform for PlainText {
    fn encode(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }

    fn decode(&self, bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }
}

/// Interpret raw bytes as Latin-1. Every byte maps to exactly one `char`.
pub fn from_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Convert to Latin-1 bytes. Characters outside U+0000..=U+00FF become `?`.
pub fn to_latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(c as u32).unwrap_or(b'?'))
        .collect()
}
