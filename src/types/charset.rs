//! Character encodings a source node may declare.

use serde::Serialize;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Text encoding used to move node content to and from disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum Charset {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Charset {
    /// Byte-order mark for this encoding.
    #[must_use]
    pub fn bom(self) -> &'static [u8] {
        match self {
            Self::Utf8 => UTF8_BOM,
            Self::Utf16Le => UTF16LE_BOM,
            Self::Utf16Be => UTF16BE_BOM,
        }
    }

    /// Sniffs a byte-order mark at the start of `bytes`.
    #[must_use]
    pub fn detect_bom(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(UTF8_BOM) {
            Some(Self::Utf8)
        } else if bytes.starts_with(UTF16LE_BOM) {
            Some(Self::Utf16Le)
        } else if bytes.starts_with(UTF16BE_BOM) {
            Some(Self::Utf16Be)
        } else {
            None
        }
    }

    /// Encodes text, prefixing the byte-order mark when `with_bom` is set.
    #[must_use]
    pub fn encode(self, text: &str, with_bom: bool) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() + 3);
        if with_bom {
            out.extend_from_slice(self.bom());
        }
        match self {
            Self::Utf8 => out.extend_from_slice(text.as_bytes()),
            Self::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_le_bytes())),
            Self::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| out.extend_from_slice(&unit.to_be_bytes())),
        }
        out
    }

    /// Decodes bytes, dropping a leading byte-order mark of this encoding.
    /// Malformed input is replaced rather than rejected.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        let body = bytes.strip_prefix(self.bom()).unwrap_or(bytes);
        match self {
            Self::Utf8 => String::from_utf8_lossy(body).into_owned(),
            Self::Utf16Le => decode_utf16(body, u16::from_le_bytes),
            Self::Utf16Be => decode_utf16(body, u16::from_be_bytes),
        }
    }
}

fn decode_utf16(body: &[u8], to_unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = body
        .chunks(2)
        .map(|pair| match pair {
            [a, b] => to_unit([*a, *b]),
            _ => 0xFFFD,
        })
        .collect();
    String::from_utf16_lossy(&units)
}
